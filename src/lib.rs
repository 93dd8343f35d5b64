pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod logging;
pub mod report;
pub mod wizard;
pub mod workbook;
