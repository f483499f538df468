use std::collections::BTreeMap;
use std::path::PathBuf;

use log::info;

use crate::error::{Error, Result};
use crate::kv_redis::RedisStore;
use crate::kv_sqlite::SqliteStore;

pub const KNOWN_MATCHES_KEY: &str = "matches";

/// The handful of key-value commands the snapshot needs. Every value is text.
pub trait KeyValueStore {
    fn sadd(&mut self, key: &str, member: &str) -> Result<()>;
    fn smembers(&mut self, key: &str) -> Result<Vec<String>>;
    /// Replaces the whole hash at `key`; fields not listed are gone afterwards.
    fn replace_hash(&mut self, key: &str, fields: &[(&str, String)]) -> Result<()>;
    fn hgetall(&mut self, key: &str) -> Result<BTreeMap<String, String>>;
    fn hlen(&mut self, key: &str) -> Result<usize>;
}

pub fn open_store(url: &str) -> Result<Box<dyn KeyValueStore>> {
    if let Some(path) = url.strip_prefix("sqlite:") {
        let path = path.trim();
        if path.is_empty() {
            return Err(Error::InvalidInput("sqlite store url has no path".to_string()));
        }
        let store = if path == ":memory:" {
            SqliteStore::open_in_memory()?
        } else {
            SqliteStore::open(&PathBuf::from(path))?
        };
        info!("opened sqlite store at {path}");
        return Ok(Box::new(store));
    }
    if url.starts_with("redis://") || url.starts_with("rediss://") || url.starts_with("unix://") {
        let store = RedisStore::connect(url)?;
        info!("connected to redis at {url}");
        return Ok(Box::new(store));
    }
    Err(Error::InvalidInput(format!(
        "unsupported store url {url:?} (expected redis://... or sqlite:<path>)"
    )))
}

pub fn match_key(match_id: &str) -> String {
    format!("match:{match_id}")
}

pub fn bets_key(match_id: &str, team: &str) -> String {
    format!("bets:{match_id}:{team}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub match_id: String,
    pub date: String,
    pub city: String,
    pub country: String,
    pub home: String,
    pub away: String,
    pub home_score: u32,
    pub away_score: u32,
    pub finished: bool,
    pub stadium: String,
    pub phase: String,
    pub live: bool,
    pub home_logo: String,
    pub away_logo: String,
}

impl MatchRecord {
    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Date", self.date.clone()),
            ("City", self.city.clone()),
            ("Country", self.country.clone()),
            ("Home", self.home.clone()),
            ("Away", self.away.clone()),
            ("HomeScore", self.home_score.to_string()),
            ("AwayScore", self.away_score.to_string()),
            ("Finished", self.finished.to_string()),
            ("Stadium", self.stadium.clone()),
            ("Phase", self.phase.clone()),
            ("Live", self.live.to_string()),
            ("HomeLogo", self.home_logo.clone()),
            ("AwayLogo", self.away_logo.clone()),
        ]
    }

    /// Builds a record from a hash read back by field name.
    /// `Phase`, `Live` and the logo fields are optional so records written
    /// by older tools still load.
    pub fn from_fields(match_id: &str, fields: &BTreeMap<String, String>) -> Result<Self> {
        let text = |name: &str| -> Result<String> {
            fields.get(name).cloned().ok_or_else(|| {
                Error::MalformedData(format!("match {match_id} is missing field {name}"))
            })
        };
        let score = |name: &str| -> Result<u32> {
            let raw = text(name)?;
            raw.trim().parse::<u32>().map_err(|_| {
                Error::MalformedData(format!("match {match_id} has non-numeric {name} {raw:?}"))
            })
        };
        let flag = |name: &str| -> Result<bool> {
            let raw = text(name)?;
            parse_flag(&raw).ok_or_else(|| {
                Error::MalformedData(format!("match {match_id} has non-boolean {name} {raw:?}"))
            })
        };

        Ok(MatchRecord {
            match_id: match_id.to_string(),
            date: text("Date")?,
            city: text("City")?,
            country: text("Country")?,
            home: text("Home")?,
            away: text("Away")?,
            home_score: score("HomeScore")?,
            away_score: score("AwayScore")?,
            finished: flag("Finished")?,
            stadium: text("Stadium")?,
            phase: fields.get("Phase").cloned().unwrap_or_default(),
            live: fields
                .get("Live")
                .and_then(|raw| parse_flag(raw))
                .unwrap_or(false),
            home_logo: fields.get("HomeLogo").cloned().unwrap_or_default(),
            away_logo: fields.get("AwayLogo").cloned().unwrap_or_default(),
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Match and wager access on top of a raw key-value store.
pub struct MatchStore {
    kv: Box<dyn KeyValueStore>,
}

impl MatchStore {
    pub fn new(kv: Box<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub fn open(url: &str) -> Result<Self> {
        Ok(Self::new(open_store(url)?))
    }

    pub fn kv_mut(&mut self) -> &mut dyn KeyValueStore {
        self.kv.as_mut()
    }

    pub fn upsert_match(&mut self, record: &MatchRecord) -> Result<()> {
        self.kv.sadd(KNOWN_MATCHES_KEY, &record.match_id)?;
        self.kv
            .replace_hash(&match_key(&record.match_id), &record.to_fields())
    }

    pub fn known_match_ids(&mut self) -> Result<Vec<String>> {
        self.kv.smembers(KNOWN_MATCHES_KEY)
    }

    /// Looks the match up through the known-ID set, then reads its hash by name.
    pub fn load_match(&mut self, match_id: &str) -> Result<MatchRecord> {
        let known = self.known_match_ids()?;
        if !known.iter().any(|id| id == match_id) {
            return Err(Error::NotFound {
                match_id: match_id.to_string(),
            });
        }
        let fields = self.kv.hgetall(&match_key(match_id))?;
        if fields.is_empty() {
            return Err(Error::NotFound {
                match_id: match_id.to_string(),
            });
        }
        MatchRecord::from_fields(match_id, &fields)
    }

    pub fn wager_count(&mut self, match_id: &str, team: &str) -> Result<usize> {
        self.kv.hlen(&bets_key(match_id, team))
    }

    pub fn wagers(&mut self, match_id: &str, team: &str) -> Result<BTreeMap<String, String>> {
        self.kv.hgetall(&bets_key(match_id, team))
    }
}
