//! Simple test for OpenRouterBrain chat completion.
//!
//! Run with: cargo run -p openrouter-brain --example test_chat
//! Or with a custom message: cargo run -p openrouter-brain --example test_chat -- "Your message here"
//!
//! Make sure to set environment variables in .env:
//!   OPENROUTER_API_KEY - OpenRouter API key

use openrouter_brain::{Brain, CompletionRequest, OpenRouterBrain};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let message_text = if args.len() > 1 {
        args[1..].join(" ")
    } else {
        "Салам! Ответь коротко.".to_string()
    };

    println!("Initializing OpenRouterBrain...");
    let brain = OpenRouterBrain::from_env()?;

    println!("Brain initialized: {}", brain.name());
    println!("API URL: {}", brain.config().api_url);
    println!("Model: {}", brain.config().model);
    println!();

    let request = CompletionRequest::new(
        "Ты Мага, дерзкий, но добрый собеседник. Отвечай коротко.",
        &message_text,
        "user:0",
    );

    println!("Sending: \"{}\"", request.user_text);
    println!("Waiting for response...\n");

    let outcome = brain.complete(request).await;

    println!("=== Response ===");
    println!("{}", outcome.text());
    if let Some(kind) = outcome.failure() {
        println!("(fallback: {})", kind.as_str());
    }
    println!("================");

    Ok(())
}
