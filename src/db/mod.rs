pub mod connection;
pub mod migrations;
pub mod settings_repo;
pub mod task_repo;

pub use connection::*;
