#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod toml_config;

pub use toml_config::AssistantConfig;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, LevelFilter, ListTarget, LocalStorage};

#[cfg(feature = "lambda")]
pub use lambda::{LambdaConfig, S3Storage};
