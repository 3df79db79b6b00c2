mod code_sender_tests;
