pub mod config;
pub mod database;
pub mod file_storage;
pub mod logging;
