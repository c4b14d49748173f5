mod app;
mod config;
mod logging;
mod render;
mod script;

pub use app::run_app;
pub use logging::LogDestination;
pub use render::OutputFormat;
