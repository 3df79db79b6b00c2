mod service_tests;
mod token_tests;
