mod app;
pub mod command;
mod logging;

/// Re-exports.
pub use app::{Args, RunCmd};
pub use logging::init_logging;
