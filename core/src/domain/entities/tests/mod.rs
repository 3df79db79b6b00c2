mod signup_token_tests;
mod verification_record_tests;
