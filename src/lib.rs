pub mod api;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod output;
pub mod recurrence;
pub mod stats;
