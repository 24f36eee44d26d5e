pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{OpenAiVerifier, SolanaPayout};
pub use config::{AppConfig, CliConfig};
pub use core::{catalog::Catalog, marketplace::Marketplace};
pub use utils::error::{MarketError, Result};
