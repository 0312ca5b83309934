use anyhow::Result;
use clap::Parser;
use retweet_analyser::config::{Config, MissingConfig};
use retweet_analyser::feeds::twitter::TwitterClient;
use retweet_analyser::history::{collect_all, filter_records};
use retweet_analyser::plot::PlotController;
use retweet_analyser::ui::{self, App};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "retweet-analyser",
    version,
    about = "Analyse the retweets of twitter users."
)]
struct Cli {
    /// Only plot tweets containing at least one of these words
    #[arg(short, long, num_args = 1.., required = true)]
    keywords: Vec<String>,

    /// Accounts to fetch, with or without the leading @
    #[arg(short, long, num_args = 1.., required = true)]
    users: Vec<String>,

    /// Credentials file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = match Config::load(&path) {
        Ok(config) => config,
        Err(e) if e.downcast_ref::<MissingConfig>().is_some() => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Err(e) => return Err(e),
    };

    let users: Vec<String> = cli
        .users
        .iter()
        .map(|u| u.trim_start_matches('@').to_string())
        .collect();

    let client = TwitterClient::new(config.credentials(), config.twitter.api_base.clone());
    let results = collect_all(&client, &users).await;

    let mut histories = Vec::new();
    let mut failed = Vec::new();
    for (identity, result) in results {
        match result {
            Ok(history) => {
                let records = filter_records(history.records, &cli.keywords);
                eprintln!("{} tweets from @{} match", records.len(), identity);
                histories.push((identity, records));
            }
            Err(e) => failed.push((identity, e)),
        }
    }

    if histories.is_empty() {
        return Err(anyhow::anyhow!(
            "Could not fetch tweets for any of the requested users"
        ));
    }

    let status = ui::failure_status(&failed);
    let app = App::new(
        PlotController::new(&histories),
        ui::chart_title(&cli.keywords),
        status,
    );

    ui::run(app)
}
