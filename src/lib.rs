pub mod cache;
pub mod config;
pub mod errors;
pub mod export;
pub mod initialization;
pub mod logging;
pub mod manager_gfs;
pub mod models;
pub mod report;
pub mod session;
pub mod statistics;
pub mod views;
pub mod worker;
