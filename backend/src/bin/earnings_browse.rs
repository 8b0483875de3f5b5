//! Terminal browser for the earnings-call dashboard API.

use clap::Parser;
use earnings_dashboard::client::render::render_company;
use earnings_dashboard::client::{BrowseSession, DashboardClient, SessionOutcome};
use earnings_dashboard::models::Direction;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "earnings-browse")]
#[command(about = "Browse earnings-call analyses from the terminal", long_about = None)]
struct Args {
    /// Root URL of the dashboard backend
    #[arg(long, env = "EARNINGS_API_URL", default_value = "http://localhost:5001")]
    api_url: String,

    /// Ticker to open first; defaults to the alphabetically first company
    #[arg(short, long)]
    symbol: Option<String>,
}

/// One line of user input. Navigation commands carry a `:` prefix so every
/// bare word, including one-letter tickers, is a search.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    Move(Direction),
    Search(&'a str),
    Nothing,
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        match line.trim() {
            ":q" | ":quit" => Command::Quit,
            ":n" | ":next" => Command::Move(Direction::Next),
            ":p" | ":prev" | ":previous" => Command::Move(Direction::Previous),
            "" => Command::Nothing,
            term => Command::Search(term),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let session = BrowseSession::new(DashboardClient::new(&args.api_url)?);

    let outcome = match &args.symbol {
        Some(symbol) => session.search(symbol).await,
        None => session.load_first().await,
    };
    show(outcome, "company");

    println!("Commands: :n = next, :p = previous, <ticker> = search, :q = quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Quit => break,
            Command::Move(Direction::Next) => show(session.navigate(Direction::Next).await, "next stock"),
            Command::Move(Direction::Previous) => {
                show(session.navigate(Direction::Previous).await, "previous stock")
            }
            Command::Search(term) => show(session.search(term).await, "results"),
            Command::Nothing => {}
        }
    }

    Ok(())
}

fn show(
    outcome: Result<SessionOutcome, earnings_dashboard::client::ClientError>,
    what: &str,
) {
    match outcome {
        Ok(SessionOutcome::Selected(response)) => println!("\n{}", render_company(&response)),
        Ok(SessionOutcome::NotFound) => println!("No {} found", what),
        Ok(SessionOutcome::Blocked) => println!("No {} available", what),
        Ok(SessionOutcome::Stale) | Ok(SessionOutcome::Cleared) => {}
        Err(e) => eprintln!("Error fetching {}: {}", what, e),
    }
}
