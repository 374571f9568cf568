mod forms_test;
mod health_test;
mod middleware_test;
mod public_test;
