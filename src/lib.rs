pub mod census;
pub mod config;
pub mod context;
pub mod fetch;
pub mod health;
pub mod indicators;
pub mod infra;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod services;
pub mod spatial;
pub mod stats;
pub mod transit;
