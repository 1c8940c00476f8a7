//! Integration tests

mod config_test;
mod e2e_test;
mod missing_data_test;
mod stochastic_test;
