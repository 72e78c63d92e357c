use prompt_relay::{GenerationOutput, ImageSize, Task};
use std::env;

mod common;

#[tokio::main]
async fn main() {
    let prompt = env::args().skip(1).collect::<Vec<_>>().join(" ");
    let size = env::var("IMAGE_SIZE")
        .ok()
        .map(|size| size.parse::<ImageSize>().expect("unsupported IMAGE_SIZE"));

    let mut session = common::start_session().await;
    let result = match size {
        Some(size) => session.run(Task::GenerateImage { prompt, size }).await,
        None => session.generate_image(&prompt).await,
    };

    match result {
        Ok(GenerationOutput::Image {
            url,
            revised_prompt,
        }) => {
            println!("{url}");
            if let Some(revised) = revised_prompt {
                println!("revised prompt: {revised}");
            }
        }
        Ok(other) => println!("{other:?}"),
        Err(error) => eprintln!("warning: {error}"),
    }
}
