//! Retweet Analyser - plot how often a user's tweets were retweeted
//!
//! Fetches each account's timeline page by page, keeps the tweets that
//! mention any of the given keywords and draws retweet counts over time in
//! the terminal. Clicking a point shows the tweet behind it; clicking a
//! legend entry hides or shows that account's series.
//!
//! # Example
//!
//! ```no_run
//! use retweet_analyser::config::Config;
//! use retweet_analyser::feeds::twitter::TwitterClient;
//! use retweet_analyser::history::{collect_history, filter_records};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load(&Config::default_path())?;
//! let client = TwitterClient::new(config.credentials(), None);
//! let history = collect_history(&client, "rustlang").await?;
//! let matching = filter_records(history.records, &["release".to_string()]);
//! println!("{} matching tweets", matching.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod feeds;
pub mod history;
pub mod plot;
pub mod ui;

pub use feeds::{Record, TimelineFetcher};
pub use plot::{AnnotationIndex, PlotController, PlotSurface};
