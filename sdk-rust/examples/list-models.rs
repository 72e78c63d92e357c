use dotenvy::dotenv;

mod common;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let provider = common::get_provider();

    let models = provider
        .list_models()
        .await
        .expect("provider.list_models failed");

    println!("{} models available via {}", models.len(), provider.provider());
    for model in models {
        println!("- {}", model.id);
    }
}
