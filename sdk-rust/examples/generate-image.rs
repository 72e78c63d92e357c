use dotenvy::dotenv;
use relay_sdk::{ImageGenerationInput, ImageSize};

mod common;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let provider = common::get_provider();

    let response = provider
        .generate_image(
            ImageGenerationInput::new("A sunset over the ocean", ImageSize::Square512)
                .with_model("dall-e-2"),
        )
        .await
        .expect("provider.generate_image failed");

    for image in &response.images {
        println!("{}", image.url);
        if let Some(revised) = &image.revised_prompt {
            println!("  revised prompt: {revised}");
        }
    }
}
