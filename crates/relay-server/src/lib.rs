pub mod chat_service;
pub mod config;
pub mod controllers;
pub mod error;
pub mod logging;
pub mod server;
pub mod state;

pub use chat_service::{build_preamble, ChatMode, ChatService};
pub use config::ServerConfig;
pub use error::AppError;
pub use server::{app_config, run_server};
pub use state::AppState;
