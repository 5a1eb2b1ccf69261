pub mod bot;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod logging;
pub mod market;
pub mod telegram;
pub mod version;
