use anyhow::{Context, Result};
use clap::Parser;

use wc_snapshot::config::{Cli, Config};
use wc_snapshot::flags::ExternalRenderer;
use wc_snapshot::report::RULE;
use wc_snapshot::store::MatchStore;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let config = Config::try_from(cli).context("invalid arguments")?;
    let mut store = MatchStore::open(&config.store_url)
        .with_context(|| format!("unable to open store {}", config.store_url))?;
    let feed = wc_snapshot::feed_for(&config);
    let renderer = ExternalRenderer {
        program: config.renderer.clone(),
    };

    println!("{RULE}");
    let report = wc_snapshot::run_snapshot(&config, &mut store, feed.as_ref(), &renderer)
        .with_context(|| format!("snapshot for match {} failed", config.match_id))?;
    print!("{report}");
    println!("{RULE}");
    Ok(())
}
