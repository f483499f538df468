use std::path::PathBuf;

use clap::Parser;

use crate::error::{Error, Result};
use crate::feed::DEFAULT_MATCHES_URL;
use crate::flags::{DEFAULT_FLAG_WIDTH, DEFAULT_RENDERER};
use crate::http_client::DEFAULT_TIMEOUT_SECS;

pub const DEFAULT_STORE_URL: &str = "redis://127.0.0.1:6379";
pub const DEFAULT_IMAGES_DIR: &str = "images";
pub const DEFAULT_LOCATION_LABEL: &str = "Brasil";

#[derive(Debug, Parser)]
#[command(name = "wc_snapshot")]
#[command(about = "Fetch one World Cup match, cache it and print a terminal report", long_about = None)]
pub struct Cli {
    /// Match ID as reported by the feed (decimal digits)
    pub match_id: String,

    /// Live matches endpoint
    #[arg(long, env = "WC_API_URL", default_value = DEFAULT_MATCHES_URL)]
    pub api_url: String,

    /// Store url: redis://host:port or sqlite:<path>
    #[arg(long = "store", env = "WC_STORE_URL", default_value = DEFAULT_STORE_URL)]
    pub store_url: String,

    /// Directory holding <TEAM>.jpg flag images
    #[arg(long, env = "WC_IMAGES_DIR", default_value = DEFAULT_IMAGES_DIR)]
    pub images_dir: PathBuf,

    /// Character width of each rendered flag
    #[arg(long, env = "WC_FLAG_WIDTH", default_value_t = DEFAULT_FLAG_WIDTH)]
    pub flag_width: u32,

    /// Image-to-text program used for flags
    #[arg(long, env = "WC_FLAG_RENDERER", default_value = DEFAULT_RENDERER)]
    pub renderer: String,

    /// Label printed next to the match date
    #[arg(long = "location", env = "WC_LOCATION_LABEL", default_value = DEFAULT_LOCATION_LABEL)]
    pub location_label: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "WC_HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Read the matches payload from a file instead of the endpoint
    #[arg(long, env = "WC_FEED_FILE")]
    pub feed_file: Option<PathBuf>,

    /// Report from the store without fetching first
    #[arg(long)]
    pub skip_ingest: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub match_id: String,
    pub api_url: String,
    pub store_url: String,
    pub images_dir: PathBuf,
    pub flag_width: u32,
    pub renderer: String,
    pub location_label: String,
    pub timeout_secs: u64,
    pub feed_file: Option<PathBuf>,
    pub skip_ingest: bool,
}

impl Config {
    pub fn for_match(match_id: &str) -> Result<Self> {
        Ok(Self {
            match_id: validate_match_id(match_id)?,
            api_url: DEFAULT_MATCHES_URL.to_string(),
            store_url: DEFAULT_STORE_URL.to_string(),
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
            flag_width: DEFAULT_FLAG_WIDTH,
            renderer: DEFAULT_RENDERER.to_string(),
            location_label: DEFAULT_LOCATION_LABEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            feed_file: None,
            skip_ingest: false,
        })
    }
}

impl TryFrom<Cli> for Config {
    type Error = Error;

    fn try_from(cli: Cli) -> Result<Self> {
        if cli.flag_width == 0 {
            return Err(Error::InvalidInput("flag width must be positive".to_string()));
        }
        Ok(Self {
            match_id: validate_match_id(&cli.match_id)?,
            api_url: cli.api_url,
            store_url: cli.store_url,
            images_dir: cli.images_dir,
            flag_width: cli.flag_width,
            renderer: cli.renderer,
            location_label: cli.location_label,
            timeout_secs: cli.timeout_secs,
            feed_file: cli.feed_file,
            skip_ingest: cli.skip_ingest,
        })
    }
}

pub fn validate_match_id(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidInput(format!(
            "match id must be decimal digits, got {raw:?}"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_id_must_be_digits() {
        assert_eq!(validate_match_id(" 300186501 ").unwrap(), "300186501");
        for raw in ["", "abc", "12a", "-5"] {
            assert!(validate_match_id(raw).is_err());
        }
    }

    #[test]
    fn cli_defaults_fill_config() {
        let cli = Cli::try_parse_from(["wc_snapshot", "300186501"]).unwrap();
        let config = Config::try_from(cli).unwrap();
        assert_eq!(config.match_id, "300186501");
        assert_eq!(config.flag_width, DEFAULT_FLAG_WIDTH);
        assert_eq!(config.images_dir, PathBuf::from("images"));
        assert!(!config.skip_ingest);
    }

    #[test]
    fn cli_overrides() {
        let cli = Cli::try_parse_from([
            "wc_snapshot",
            "7",
            "--store",
            "sqlite:/tmp/wc.sqlite",
            "--flag-width",
            "20",
            "--skip-ingest",
        ])
        .unwrap();
        let config = Config::try_from(cli).unwrap();
        assert_eq!(config.store_url, "sqlite:/tmp/wc.sqlite");
        assert_eq!(config.flag_width, 20);
        assert!(config.skip_ingest);
    }

    #[test]
    fn verbose_stays_on_the_cli() {
        let cli = Cli::try_parse_from(["wc_snapshot", "7", "-v"]).unwrap();
        assert!(cli.verbose);
        let config = Config::try_from(cli).unwrap();
        assert_eq!(config.match_id, "7");
    }

    #[test]
    fn cli_requires_match_id() {
        assert!(Cli::try_parse_from(["wc_snapshot"]).is_err());
    }
}
