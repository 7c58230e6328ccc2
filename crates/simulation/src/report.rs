//! Plain-text and CSV renderings of simulation results.

use std::fmt::Write;

use crate::matchup::{BalanceFlag, MatchupResult, SimulationReport};

const RULE: &str = "===================================================";

pub const CSV_HEADER: &str =
    "class,level,monster,severity,complexity,trials,wins,losses,draws,winRate,avgTurns,medianTurns,flag";

/// Human-readable table of a full simulation.
pub fn format_report(report: &SimulationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "  BALANCE REPORT - Monte Carlo Simulation");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "  Trials per matchup: {}", report.config.trials);
    let _ = writeln!(out, "  Total trials: {}", report.total_trials);
    let _ = writeln!(out, "  Overall win rate: {:.1}%", report.overall_win_rate * 100.0);
    let _ = writeln!(out, "  Duration: {}ms", report.elapsed_ms);
    let _ = writeln!(out);
    out.push_str(&format_table(&report.matchups));
    let _ = writeln!(out);
    if report.flagged.is_empty() {
        let _ = writeln!(out, "  All matchups within target range.");
    } else {
        let _ = writeln!(out, "  {} matchup(s) flagged for review", report.flagged.len());
    }
    out.push_str(RULE);
    out
}

/// Matchup rows without the report header, as used for progression sweeps.
pub fn format_table(results: &[MatchupResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  Class    Lvl  vs Monster              | Win%   | Avg Turns | Flag");
    let _ = writeln!(out, "  ------------------------------------+--------+-----------+-----------");
    for m in results {
        let monster = format!("{} (S{})", m.matchup.bug_type, m.matchup.severity);
        let flag = match m.flag {
            BalanceFlag::Ok => "ok".to_owned(),
            other => format!("! {other}"),
        };
        let _ = writeln!(
            out,
            "  {:<8} {:>3}  {:<23} | {:>5.1}% | {:>9.1} | {}",
            m.matchup.class.as_ref(),
            m.matchup.level,
            monster,
            m.win_rate * 100.0,
            m.avg_turns,
            flag
        );
    }
    out
}

/// One header line plus one row per matchup, newline separated.
pub fn format_csv(results: &[MatchupResult]) -> String {
    let mut lines = Vec::with_capacity(results.len() + 1);
    lines.push(CSV_HEADER.to_owned());
    lines.extend(results.iter().map(|m| {
        format!(
            "{},{},{},{},{},{},{},{},{},{:.4},{:.1},{},{}",
            m.matchup.class,
            m.matchup.level,
            m.matchup.bug_type,
            m.matchup.severity,
            m.matchup.complexity,
            m.trials,
            m.victories,
            m.defeats,
            m.draws,
            m.win_rate,
            m.avg_turns,
            m.median_turns,
            m.flag
        )
    }));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimConfig;
    use crate::matchup::Matchup;
    use game_core::{BugType, CharacterClass};

    fn result(flag: BalanceFlag) -> MatchupResult {
        MatchupResult {
            matchup: Matchup::new(CharacterClass::Dps, 30, BugType::OffByOne, 1, 0),
            trials: 10,
            victories: 9,
            defeats: 1,
            draws: 0,
            win_rate: 0.9,
            avg_turns: 3.5,
            median_turns: 3,
            avg_player_hp_remaining: 100.0,
            avg_monster_hp_remaining: 1.0,
            flag,
        }
    }

    #[test]
    fn csv_rows_follow_the_header() {
        let csv = format_csv(&[result(BalanceFlag::TooEasy)]);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        assert_eq!(lines.next(), Some("dps,30,off-by-one,1,0,10,9,1,0,0.9000,3.5,3,too-easy"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn report_mentions_flagged_matchups() {
        let flagged = result(BalanceFlag::TooEasy);
        let report = SimulationReport {
            config: SimConfig::default(),
            matchups: vec![flagged.clone()],
            total_trials: 10,
            overall_win_rate: 0.9,
            flagged: vec![flagged],
            elapsed_ms: 4,
        };
        let text = format_report(&report);
        assert!(text.contains("Overall win rate: 90.0%"));
        assert!(text.contains("! too-easy"));
        assert!(text.contains("1 matchup(s) flagged"));
    }
}
