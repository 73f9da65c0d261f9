mod app;
mod commands;
mod effects;
mod logging;
mod settings;
mod surface;

pub use app::run_app;
