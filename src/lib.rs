pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{GeminiClient, TelegramClient};
pub use config::{policy::GreetingPolicy, RunConfig};
pub use crate::core::{engine::RunEngine, selector::GreetingSelector};
pub use utils::error::{BotError, GenerationError, Result};
