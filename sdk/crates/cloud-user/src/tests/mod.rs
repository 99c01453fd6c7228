mod session;
mod support;
mod user_data;
mod user_data_property_tests;
