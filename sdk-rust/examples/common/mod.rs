use relay_sdk::{
    openai::{OpenAIProvider, OpenAIProviderOptions},
    ModelProvider,
};

pub fn get_provider() -> Box<dyn ModelProvider> {
    Box::new(OpenAIProvider::new(OpenAIProviderOptions {
        api_key: std::env::var("OPENAI_API_KEY")
            .expect("OPENAI_API_KEY environment variable must be set"),
        base_url: std::env::var("OPENAI_BASE_URL").ok(),
        ..Default::default()
    }))
}
