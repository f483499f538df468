use log::{debug, info, warn};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::store::{MatchRecord, MatchStore};

/// One flat match object from the `data.group` list of the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchEntry {
    pub match_id: i64,
    pub finished: bool,
    pub live: bool,
    pub date: String,
    pub city: String,
    pub country: String,
    pub phase: String,
    pub home: String,
    pub away: String,
    pub home_logo: String,
    pub away_logo: String,
    pub home_goals: i64,
    pub away_goals: i64,
    pub stadium: String,
}

impl MatchEntry {
    pub fn to_record(&self) -> MatchRecord {
        MatchRecord {
            match_id: self.match_id.to_string(),
            date: self.date.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
            home: self.home.clone(),
            away: self.away.clone(),
            home_score: goals(self.match_id, &self.home, self.home_goals),
            away_score: goals(self.match_id, &self.away, self.away_goals),
            finished: self.finished,
            stadium: self.stadium.clone(),
            phase: self.phase.clone(),
            live: self.live,
            home_logo: self.home_logo.clone(),
            away_logo: self.away_logo.clone(),
        }
    }
}

fn goals(match_id: i64, team: &str, raw: i64) -> u32 {
    u32::try_from(raw).unwrap_or_else(|_| {
        warn!("match {match_id}: goal count {raw} for {team} is out of range, storing 0");
        0
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub decoded: usize,
    pub written: usize,
}

/// Decodes the feed envelope without ever failing: bad JSON gives an empty
/// list and each missing or mistyped field falls back to its zero value.
pub fn parse_matches_json(raw: &str) -> Vec<MatchEntry> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Vec::new();
    }
    let root: Value = match serde_json::from_str(trimmed) {
        Ok(root) => root,
        Err(err) => {
            warn!("matches payload is not valid json: {err}");
            return Vec::new();
        }
    };
    let Some(group) = field(&root, "data")
        .and_then(|data| field(data, "group"))
        .and_then(Value::as_array)
    else {
        debug!("matches payload has no data.group list");
        return Vec::new();
    };

    group
        .iter()
        .filter_map(Value::as_object)
        .map(parse_entry)
        .collect()
}

fn parse_entry(obj: &Map<String, Value>) -> MatchEntry {
    MatchEntry {
        match_id: pick_int(obj, "n_MatchID"),
        finished: pick_bool(obj, "b_Finished"),
        live: pick_bool(obj, "b_Live"),
        date: pick_string(obj, "c_Date"),
        city: pick_string(obj, "c_City"),
        country: pick_string(obj, "c_CountryShort"),
        phase: pick_string(obj, "c_Phase_en"),
        home: pick_string(obj, "c_HomeNatioShort"),
        away: pick_string(obj, "c_AwayNatioShort"),
        home_logo: pick_string(obj, "c_HomeLogoImage"),
        away_logo: pick_string(obj, "c_AwayLogoImage"),
        home_goals: pick_int(obj, "n_HomeGoals"),
        away_goals: pick_int(obj, "n_AwayGoals"),
        stadium: pick_string(obj, "c_Stadium"),
    }
}

fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    lookup(value.as_object()?, key)
}

// Exact key first, then the first case-insensitive match.
fn lookup<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).or_else(|| {
        obj.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

fn pick_string(obj: &Map<String, Value>, key: &str) -> String {
    lookup(obj, key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

fn pick_int(obj: &Map<String, Value>, key: &str) -> i64 {
    lookup(obj, key).and_then(Value::as_i64).unwrap_or_default()
}

fn pick_bool(obj: &Map<String, Value>, key: &str) -> bool {
    lookup(obj, key).and_then(Value::as_bool).unwrap_or_default()
}

/// Writes every decoded entry whose ID equals `target_id` into the store.
pub fn ingest(store: &mut MatchStore, raw: &str, target_id: &str) -> Result<IngestSummary> {
    let entries = parse_matches_json(raw);
    let mut summary = IngestSummary {
        decoded: entries.len(),
        written: 0,
    };
    for entry in entries
        .iter()
        .filter(|entry| entry.match_id.to_string() == target_id)
    {
        store.upsert_match(&entry.to_record())?;
        summary.written += 1;
    }
    if summary.written == 0 {
        warn!(
            "match {target_id} not present among {} decoded matches; store left untouched",
            summary.decoded
        );
    } else {
        info!(
            "ingested match {target_id} ({} of {} decoded)",
            summary.written, summary.decoded
        );
    }
    Ok(summary)
}
