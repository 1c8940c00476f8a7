//! poly-leadlag: Lead/lag analysis between two prediction-market platforms
//!
//! This library provides the core components for:
//! - Order book metrics and delta/lag preprocessing
//! - Population statistics with explicit missing values
//! - Closed-form OLS for the lag-1 VAR equations
//! - Granger causality F-tests
//! - Per-variable VAR analysis and tier aggregation
//! - CSV datasets and Parquet result storage
//! - Logging and metrics

pub mod book;
pub mod cli;
pub mod config;
pub mod data;
pub mod granger;
pub mod regression;
pub mod series;
pub mod stats;
pub mod telemetry;
pub mod var;
