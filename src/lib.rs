// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod game;
pub mod logging;
pub mod queue;
pub mod round;
pub mod runtime;
pub mod scheduler;
pub mod stats;
pub mod store;
pub mod trend;
pub mod ui;
pub mod util;
