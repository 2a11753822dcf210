mod app;
mod bridge;
mod config;
mod logging;

pub use app::run_app;
