pub mod config;
pub mod error;
pub mod feed;
pub mod flags;
pub mod http_client;
pub mod ingest;
pub mod kv_redis;
pub mod kv_sqlite;
pub mod report;
pub mod store;
pub mod wagers;

use crate::config::Config;
use crate::feed::{FileFeed, HttpFeed, MatchFeed};
use crate::flags::FlagRenderer;
use crate::store::MatchStore;

pub fn feed_for(config: &Config) -> Box<dyn MatchFeed> {
    match &config.feed_file {
        Some(path) => Box::new(FileFeed { path: path.clone() }),
        None => Box::new(HttpFeed {
            url: config.api_url.clone(),
            timeout_secs: config.timeout_secs,
        }),
    }
}

/// Fetch, ingest, then render the report for `config.match_id`.
pub fn run_snapshot(
    config: &Config,
    store: &mut MatchStore,
    feed: &dyn MatchFeed,
    renderer: &dyn FlagRenderer,
) -> error::Result<String> {
    if !config.skip_ingest {
        let raw = feed.fetch_matches()?;
        ingest::ingest(store, &raw, &config.match_id)?;
    }
    report::render(store, renderer, config)
}
