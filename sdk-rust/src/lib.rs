mod client_utils;
mod errors;
mod model_provider;
pub mod openai;
mod opentelemetry;
pub mod relay_sdk_test;
mod types;
mod types_ext;

pub use errors::*;
pub use model_provider::ModelProvider;
pub use reqwest::StatusCode;
pub use types::*;
