pub mod date;
pub mod settings;
pub mod task;

pub use settings::*;
pub use task::*;
