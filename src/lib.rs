//! GEN Vision: send a prompt and/or an image to Gemini and show the answer.
//!
//! ```no_run
//! use gen_vision::{GeminiClient, GeminiConfig, GenerationRequest, Generator, sanitize};
//!
//! # async fn run() -> gen_vision::Result<()> {
//! let client = GeminiClient::new(GeminiConfig::from_env());
//! let request = GenerationRequest::new().with_prompt("Write a haiku about Rust");
//! let raw = client.generate(&request).await?;
//! println!("{}", sanitize(&raw));
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod sanitize;

#[cfg(feature = "server")]
pub mod server;

#[cfg(test)]
pub(crate) mod test_support;

pub use assets::{load_from_file, load_from_url, AssetFetcher, HttpAssetFetcher, RetryPolicy};
pub use config::{AssetConfig, Config, GeminiConfig};
pub use error::{Result, VisionError};
pub use gemini::{GeminiClient, Generator};
pub use models::*;
pub use sanitize::sanitize;
