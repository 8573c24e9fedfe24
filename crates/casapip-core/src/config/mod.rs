//! casapip configuration layer.
//!
//! All environment reads go through this module; callers use the structured
//! configs instead of `std::env::var`.
//!
//! - `loader`: `env_or`, `env_optional`, `env_bool`, `.env` loading
//! - `schema`: `PathsConfig`, `DownloadConfig`, `ObservabilityConfig`
//! - `env_keys`: key constants

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use loader::{env_bool, env_optional, env_or, env_u64, load_dotenv, load_dotenv_from_dir};
pub use schema::{DownloadConfig, ObservabilityConfig, PathsConfig};
