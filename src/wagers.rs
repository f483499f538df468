use crate::error::{Error, Result};
use crate::report::RULE;
use crate::store::MatchStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wager {
    pub bettor: String,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamWagers {
    pub team: String,
    /// Entry count as reported by the store's hash length.
    pub bettors: usize,
    pub wagers: Vec<Wager>,
    pub total: u64,
}

impl TeamWagers {
    pub fn has_bets(&self) -> bool {
        self.bettors > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payout {
    pub pool: u64,
    pub home: u64,
    pub away: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WagerSummary {
    pub home: TeamWagers,
    pub away: TeamWagers,
    pub payout: Option<Payout>,
}

/// Splits the combined pool evenly across each side's bettors.
/// Only computed when both sides have at least one bettor.
pub fn compute_payout(home: &TeamWagers, away: &TeamWagers) -> Result<Option<Payout>> {
    if !home.has_bets() || !away.has_bets() {
        return Ok(None);
    }
    let pool = home.total.checked_add(away.total).ok_or_else(|| {
        Error::MalformedData(format!(
            "combined wager pool for {} and {} overflows",
            home.team, away.team
        ))
    })?;
    Ok(Some(Payout {
        pool,
        home: pool / home.bettors as u64,
        away: pool / away.bettors as u64,
    }))
}

pub fn parse_amount(match_id: &str, team: &str, bettor: &str, raw: &str) -> Result<u64> {
    raw.parse::<u64>().map_err(|_| {
        Error::MalformedData(format!(
            "wager by {bettor} on {team} in match {match_id} is not a whole amount: {raw:?}"
        ))
    })
}

pub fn team_wagers(store: &mut MatchStore, match_id: &str, team: &str) -> Result<TeamWagers> {
    let bettors = store.wager_count(match_id, team)?;
    let mut out = TeamWagers {
        team: team.to_string(),
        bettors,
        wagers: Vec::new(),
        total: 0,
    };
    if bettors == 0 {
        return Ok(out);
    }
    for (bettor, raw) in store.wagers(match_id, team)? {
        let amount = parse_amount(match_id, team, &bettor, &raw)?;
        out.total = out.total.checked_add(amount).ok_or_else(|| {
            Error::MalformedData(format!("wager total for {team} in match {match_id} overflows"))
        })?;
        out.wagers.push(Wager { bettor, amount });
    }
    Ok(out)
}

pub fn summarize(
    store: &mut MatchStore,
    match_id: &str,
    home: &str,
    away: &str,
) -> Result<WagerSummary> {
    let home = team_wagers(store, match_id, home)?;
    let away = team_wagers(store, match_id, away)?;
    let payout = compute_payout(&home, &away)?;
    Ok(WagerSummary { home, away, payout })
}

pub fn format_summary(summary: &WagerSummary) -> String {
    let mut out = String::new();
    for side in [&summary.home, &summary.away] {
        if side.has_bets() {
            out.push_str(&format!("{RULE}\n{} BETS {}\n{RULE}\n", side.team, side.total));
            for wager in &side.wagers {
                out.push_str(&format!("- {} ${}\n", wager.bettor, wager.amount));
            }
            out.push_str(" \n");
        } else {
            out.push_str(&format!("- NO {} BETS\n", side.team));
        }
    }
    match summary.payout {
        Some(payout) => {
            out.push_str(&format!("{RULE}\nPAYOUT INFO\n{RULE}\n"));
            out.push_str(&format!("POOL : {}\n", payout.pool));
            out.push_str(&format!("{} : {}\n", summary.home.team, payout.home));
            out.push_str(&format!("{} : {}\n", summary.away.team, payout.away));
        }
        None => out.push_str("- NO PAYOUT INFO\n\n"),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn side(team: &str, bettors: usize, total: u64) -> TeamWagers {
        TeamWagers {
            team: team.to_string(),
            bettors,
            wagers: Vec::new(),
            total,
        }
    }

    #[test]
    fn pooled_payout_splits_by_bettor_count() {
        let payout = compute_payout(&side("BRA", 2, 100), &side("CRO", 1, 50))
            .unwrap()
            .unwrap();
        assert_eq!(
            payout,
            Payout {
                pool: 150,
                home: 75,
                away: 150
            }
        );
    }

    #[test]
    fn payout_truncates() {
        let payout = compute_payout(&side("BRA", 3, 10), &side("CRO", 2, 0))
            .unwrap()
            .unwrap();
        assert_eq!(payout.home, 3);
        assert_eq!(payout.away, 5);
    }

    #[test]
    fn no_payout_without_both_sides() {
        assert!(
            compute_payout(&side("BRA", 2, 100), &side("CRO", 0, 0))
                .unwrap()
                .is_none()
        );
        assert!(
            compute_payout(&side("BRA", 0, 0), &side("CRO", 1, 5))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn overflowing_pool_is_malformed() {
        let err = compute_payout(&side("BRA", 1, u64::MAX), &side("CRO", 1, 1)).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::MalformedData);
    }

    #[test]
    fn amounts_must_be_whole_numbers() {
        assert_eq!(parse_amount("1", "BRA", "ana", "25").unwrap(), 25);
        for raw in ["ten", "-5", "2.5", " 7", ""] {
            let err = parse_amount("1", "BRA", "ana", raw).unwrap_err();
            assert_eq!(err.kind(), crate::error::ErrorKind::MalformedData);
        }
    }

    #[test]
    fn formats_no_bets_and_no_payout() {
        let summary = WagerSummary {
            home: side("BRA", 0, 0),
            away: side("CRO", 0, 0),
            payout: None,
        };
        let text = format_summary(&summary);
        assert!(text.contains("- NO BRA BETS"));
        assert!(text.contains("- NO CRO BETS"));
        assert!(text.contains("- NO PAYOUT INFO"));
        assert!(!text.contains(RULE));
    }
}
