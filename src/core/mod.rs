pub mod action;
pub mod aggregator;
pub mod cancel;
pub mod config;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod violation;
