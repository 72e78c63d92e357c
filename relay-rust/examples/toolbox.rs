use prompt_relay::{AnalysisKind, Task};
use std::env;

mod common;

const USAGE: &str = "usage: toolbox <summarize|sentiment|key-points|proofread|translate:LANG|answer|complete> <text>";

#[tokio::main]
async fn main() {
    let mut args = env::args().skip(1);
    let (Some(action), text) = (args.next(), args.collect::<Vec<_>>().join(" ")) else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    let analyze = |kind| Task::Analyze {
        text: text.clone(),
        kind,
    };
    let task = match action.as_str() {
        "summarize" => Task::Summarize { text: text.clone() },
        "sentiment" => analyze(AnalysisKind::Sentiment),
        "key-points" => analyze(AnalysisKind::KeyPoints),
        "proofread" => analyze(AnalysisKind::Proofread),
        "answer" => Task::Answer {
            question: text.clone(),
        },
        "complete" => Task::Complete {
            prompt: text.clone(),
        },
        other => match other.strip_prefix("translate:") {
            Some(language) => analyze(AnalysisKind::Translation {
                target_language: language.to_string(),
            }),
            None => {
                eprintln!("{USAGE}");
                std::process::exit(2);
            }
        },
    };

    let mut session = common::start_session().await;
    match session.run(task).await {
        Ok(output) => println!("{}", output.as_text().unwrap_or_default()),
        Err(error) => eprintln!("warning: {error}"),
    }
}
