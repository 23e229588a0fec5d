//! Solace daemon - empathetic response engine.
//!
//! Reads messages line by line on stdin and prints the engine's reply,
//! exercising the full backend-with-fallback path.

use anyhow::Result;
use solace_common::ChatTurn;
use solaced::{config::SolaceConfig, engine::ResponseEngine};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Solace v{} starting", env!("CARGO_PKG_VERSION"));

    let config = SolaceConfig::load_or_default(solaced::config::CONFIG_PATH);
    let engine = ResponseEngine::from_config(&config);
    engine.log_availability().await;

    info!("Ready - type a message, Ctrl-D to exit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut history: Vec<ChatTurn> = Vec::new();

    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let reply = engine.generate(text, &history).await;

        println!();
        println!("{}", reply.response);
        println!();
        println!("tip: {}", reply.coping_tip);
        println!(
            "[{} | confidence {:.2} | sentiment {:+.2}]",
            reply.emotion, reply.confidence, reply.sentiment_score
        );
        println!();

        history.push(ChatTurn::user(text));
        history.push(ChatTurn::assistant(reply.response.clone()));
    }

    info!("Shutting down gracefully");
    Ok(())
}
