//! Terminal front end for a running post-spark server.
//!
//! Usage:
//!   cargo run --bin spark -- --api-url http://127.0.0.1:8080
//!   cargo run --bin spark -- --emotion 70 --urgency 30

use anyhow::Result;
use clap::Parser;
use post_spark::client::HttpGenerateApi;
use post_spark::flow::{FlowController, FlowError, Phase};
use post_spark::models::ToneHints;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

#[derive(Parser)]
#[command(name = "spark")]
#[command(about = "Generate a LinkedIn post from an accomplishment", long_about = None)]
struct Cli {
    /// Base URL of the post-spark server
    #[arg(long, env = "POST_SPARK_API_URL", default_value = "http://127.0.0.1:8080")]
    api_url: String,

    /// Emotionality level (0-100)
    #[arg(long)]
    emotion: Option<u32>,

    /// Urgency/FOMO level (0-100)
    #[arg(long)]
    urgency: Option<u32>,
}

type Input = Lines<BufReader<Stdin>>;

async fn prompt_line(input: &mut Input, label: &str) -> Result<Option<String>> {
    println!("{}", label);
    Ok(input.next_line().await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api = HttpGenerateApi::new(&cli.api_url);
    let mut flow = FlowController::new();
    flow.set_tone(ToneHints {
        emotion: cli.emotion.map(Value::from),
        urgency: cli.urgency.map(Value::from),
    });
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    println!("LinkedIn Post Spark ✨ ({})", api.endpoint());
    let mut retrying = false;

    loop {
        match flow.phase() {
            Phase::Topic if retrying => {
                let Some(line) = prompt_line(
                    &mut input,
                    &format!("Press Enter to retry \"{}\", or type a new topic.", flow.topic()),
                )
                .await?
                else {
                    return Ok(());
                };
                if !line.trim().is_empty() {
                    flow.set_topic(line);
                }
                println!("Analyzing...");
            }
            Phase::Topic => {
                let Some(topic) = prompt_line(
                    &mut input,
                    "\nWhat did you accomplish? (e.g. I won the Delhi Industrial Ideathon...)",
                )
                .await?
                else {
                    return Ok(());
                };
                flow.set_topic(topic);
                println!("Analyzing...");
            }
            Phase::Questions if retrying => {
                // Answers are still in the controller
                if prompt_line(&mut input, "Press Enter to retry.").await?.is_none() {
                    return Ok(());
                }
            }
            Phase::Questions => {
                println!("\nTell me a bit more...");
                let questions = flow.questions().to_vec();
                for q in &questions {
                    let Some(answer) = prompt_line(&mut input, &format!("  {}", q)).await? else {
                        return Ok(());
                    };
                    flow.set_answer(q, answer);
                }
                println!("Crafting your post...");
            }
            Phase::Result => {
                println!("\n----- Your Generated Post -----");
                println!("{}", flow.post());
                println!("-------------------------------");
                let Some(choice) = prompt_line(&mut input, "Generate new? [y/N]").await? else {
                    return Ok(());
                };
                if choice.trim().eq_ignore_ascii_case("y") {
                    flow.reset();
                    continue;
                }
                return Ok(());
            }
        }

        match flow.submit(&api).await {
            Ok(_) => {}
            Err(FlowError::EmptyTopic) => println!("Please enter a topic."),
            Err(e) => println!("{}", e),
        }
        retrying = flow.error().is_some();
        if let Some(message) = flow.error() {
            println!("⚠️  {}", message);
            flow.dismiss_error();
        }
    }
}
