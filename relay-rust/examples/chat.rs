use prompt_relay::{Conversation, GenerationOutput, Role};
use std::io::{self, BufRead, Write};

mod common;

#[tokio::main]
async fn main() {
    let mut session = common::start_session().await;
    session.set_conversation(Conversation::with_system_prompt(
        "You are a helpful assistant. Keep answers short.",
    ));

    println!("Type a message, /history, /clear or /quit.");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().unwrap();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap() == 0 {
            break;
        }

        match line.trim() {
            "/quit" => break,
            "/clear" => session.clear_conversation(),
            "/history" => {
                for turn in session.conversation().turns() {
                    if turn.role != Role::System {
                        println!("[{}] {}", turn.role, turn.content);
                    }
                }
            }
            message => match session.chat(message).await {
                Ok(GenerationOutput::Text(reply)) => println!("{reply}"),
                Ok(other) => println!("{other:?}"),
                Err(error) => eprintln!("warning: {error}"),
            },
        }
    }
}
