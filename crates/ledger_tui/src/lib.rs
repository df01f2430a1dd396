//! Terminal dashboard for the income/expense ledger backend.

pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod ui;
