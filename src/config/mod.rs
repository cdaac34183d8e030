pub mod env;
mod loader;

pub use env::{AppConfig, DirectoryConfig, GeminiConfig};
pub use loader::load_config;
#[cfg(test)]
pub use loader::{DEFAULT_API_BASE, DEFAULT_MODEL};
