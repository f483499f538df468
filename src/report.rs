use crate::config::Config;
use crate::error::Result;
use crate::flags::{FlagRenderer, render_matchup};
use crate::store::{MatchRecord, MatchStore};
use crate::wagers::{self, WagerSummary};

pub const RULE: &str =
    "-------------------------------------------------------------------------------------";

#[derive(Debug, Clone)]
pub struct MatchReport {
    pub record: MatchRecord,
    pub flags: String,
    pub wagers: WagerSummary,
}

/// Reads the match and its wagers back out of the store.
pub fn build_report(
    store: &mut MatchStore,
    renderer: &dyn FlagRenderer,
    config: &Config,
) -> Result<MatchReport> {
    let record = store.load_match(&config.match_id)?;
    let flags = render_matchup(
        renderer,
        &config.images_dir,
        &record.home,
        &record.away,
        config.flag_width,
    );
    let wagers = wagers::summarize(store, &record.match_id, &record.home, &record.away)?;
    Ok(MatchReport {
        record,
        flags,
        wagers,
    })
}

pub fn score_line(team: &str, score: u32) -> String {
    format!("{team}: {score}")
}

pub fn format_report(report: &MatchReport, location_label: &str) -> String {
    let record = &report.record;
    let mut out = String::new();
    out.push_str(&format!("Match: {}\n", record.match_id));
    out.push_str(&format!("Finished: {}\n", record.finished));
    out.push_str(&format!("{} , {}\n", record.date, location_label));
    if !record.stadium.is_empty() || !record.city.is_empty() {
        out.push_str(&format!(
            "{}, {} ({})\n",
            record.stadium, record.city, record.country
        ));
    }
    if !record.phase.is_empty() {
        let status = if record.live { " (LIVE)" } else { "" };
        out.push_str(&format!("{}{status}\n", record.phase));
    }
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&report.flags);
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&score_line(&record.home, record.home_score));
    out.push('\n');
    out.push_str(&score_line(&record.away, record.away_score));
    out.push('\n');
    out.push_str(RULE);
    out.push_str("\n\n");
    out.push_str(&wagers::format_summary(&report.wagers));
    out
}

pub fn render(
    store: &mut MatchStore,
    renderer: &dyn FlagRenderer,
    config: &Config,
) -> Result<String> {
    let report = build_report(store, renderer, config)?;
    Ok(format_report(&report, &config.location_label))
}
