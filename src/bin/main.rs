use finance_advisor::{session::Session, AdvisorConfig, FinanceAssistant};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables (RUST_LOG may come from .env too)
    dotenv::dotenv().ok();

    // Initialize tracing (stderr, so replies on stdout stay readable)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AdvisorConfig::from_env()?;
    let assistant = FinanceAssistant::from_config(&config)?;
    let mut session = Session::new(Uuid::new_v4());

    info!(session_id = %session.session_id, "Terminal session started");

    println!("💸 Finance Advisor");
    println!("Your personal finance assistant for stocks, expenses, budgets, and tailored advice.");
    println!("Type 'exit' to quit.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if matches!(message.to_lowercase().as_str(), "exit" | "quit") {
            break;
        }

        match session.handle_message(&assistant, message).await {
            Ok(outcome) => println!("\n{}\n", outcome.reply),
            Err(e) => eprintln!("\n⚠️  {}\n", e),
        }
    }

    info!(
        session_id = %session.session_id,
        messages = session.transcript.message_count(),
        "Terminal session ended"
    );

    Ok(())
}
