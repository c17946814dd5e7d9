//! inkpost library
//!
//! The server is assembled here so the binary stays thin and the HTTP tests
//! can build the same router.

pub mod api;
pub mod app_state;
pub mod bootstrap;
pub mod http;
pub mod init_telemetry;
pub mod services;
pub mod settings;
pub mod stop_flag;
pub mod store;

pub use app_state::AppState;
