use dotenvy::dotenv;
use relay_sdk::{LanguageModelInput, Message};

mod common;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let provider = common::get_provider();

    let response = provider
        .generate(LanguageModelInput {
            model: "gpt-4o-mini".to_string(),
            messages: vec![
                Message::user("Tell me a story."),
                Message::assistant("Sure! What kind of story would you like to hear?"),
                Message::user("a fairy tale"),
            ],
            max_tokens: Some(300),
            ..Default::default()
        })
        .await
        .unwrap();

    println!("{response:#?}");
}
