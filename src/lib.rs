pub mod api;
pub mod bot;
pub mod chain;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod vault;
pub mod yields;
