use std::sync::Arc;

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::ai::ChatService;
use crate::catalog::Catalog;
use crate::core::{AppConfig, ChatError};
use crate::openai::{Message, Role};

pub async fn run() -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    let config = AppConfig::from_env()?;
    let catalog = Arc::new(Catalog::load(&config.catalog_path));
    let service = ChatService::from_config(&config, catalog);

    // The history is kept locally the same way the web UI does it
    let mut history: Vec<Message> = Vec::new();

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                match service.respond(&line, &history).await {
                    Ok(resp) => {
                        println!("{}", resp);
                        history.push(Message::new(Role::User, &line));
                        history.push(Message::new(Role::Assistant, &resp));
                    }
                    Err(ChatError::InvalidRequest(_)) => continue,
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
