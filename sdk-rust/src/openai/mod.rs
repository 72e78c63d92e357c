mod api;
mod model;

pub use model::{OpenAIProvider, OpenAIProviderOptions, OPENAI_DEFAULT_BASE_URL};
