//! Monte Carlo matchups and suites.

use std::time::Instant;

use game_content::{ContentBundle, create_character, create_monster};
use game_core::{BalanceConfig, BattleEngine, BugType, CharacterClass, RngState};
use serde::Serialize;
use strum::{AsRefStr, Display, IntoEnumIterator};
use tracing::{debug, info, trace};

use crate::battle::{BattleResult, simulate_battle};
use crate::config::SimConfig;
use crate::error::{Result, SimulationError};

/// Share of draws above which a matchup is flagged draw-heavy.
const DRAW_HEAVY_RATIO: f64 = 0.1;

/// Levels swept by [`Harness::run_progression_simulation`] by default.
pub const PROGRESSION_LEVELS: [u32; 7] = [1, 5, 10, 15, 20, 25, 30];
/// Severities swept by default.
pub const PROGRESSION_SEVERITIES: [u8; 5] = [1, 2, 3, 4, 5];

/// One fixed class/level against bug type/severity/complexity pairing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Matchup {
    pub class: CharacterClass,
    pub level: u32,
    pub bug_type: BugType,
    pub severity: u8,
    pub complexity: u32,
}

impl Matchup {
    pub fn new(class: CharacterClass, level: u32, bug_type: BugType, severity: u8, complexity: u32) -> Self {
        Self {
            class,
            level,
            bug_type,
            severity,
            complexity,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum BalanceFlag {
    Ok,
    TooEasy,
    TooHard,
    DrawHeavy,
}

impl BalanceFlag {
    /// Draw share is checked first, then the win-rate band.
    pub fn classify(win_rate: f64, draw_rate: f64, config: &SimConfig) -> Self {
        if draw_rate > DRAW_HEAVY_RATIO {
            Self::DrawHeavy
        } else if win_rate < config.low_win_threshold {
            Self::TooHard
        } else if win_rate > config.high_win_threshold {
            Self::TooEasy
        } else {
            Self::Ok
        }
    }
}

/// Aggregate of every trial of one matchup.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupResult {
    #[serde(flatten)]
    pub matchup: Matchup,
    pub trials: u32,
    pub victories: u32,
    pub defeats: u32,
    pub draws: u32,
    pub win_rate: f64,
    pub avg_turns: f64,
    pub median_turns: u32,
    pub avg_player_hp_remaining: f64,
    pub avg_monster_hp_remaining: f64,
    pub flag: BalanceFlag,
}

impl MatchupResult {
    pub fn is_balanced(&self) -> bool {
        self.flag == BalanceFlag::Ok
    }
}

/// Every class against every bug type at one level and severity.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub config: SimConfig,
    pub matchups: Vec<MatchupResult>,
    pub total_trials: u64,
    pub overall_win_rate: f64,
    pub flagged: Vec<MatchupResult>,
    pub elapsed_ms: u64,
}

/// Runs matchups against one content set.
///
/// The config is validated once, when the harness is built.
#[derive(Debug)]
pub struct Harness<'a> {
    content: &'a ContentBundle,
    config: SimConfig,
}

impl<'a> Harness<'a> {
    pub fn new(content: &'a ContentBundle, config: SimConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { content, config })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    fn balance(&self) -> &BalanceConfig {
        &self.content.balance
    }

    fn check(&self, matchup: &Matchup) -> Result<()> {
        if !(1..=BalanceConfig::MAX_SEVERITY).contains(&matchup.severity) {
            return Err(SimulationError::InvalidSeverity {
                severity: matchup.severity,
            });
        }
        let max = self.balance().characters.max_level;
        if !(1..=max).contains(&matchup.level) {
            return Err(SimulationError::InvalidLevel {
                level: matchup.level,
                max,
            });
        }
        Ok(())
    }

    /// Runs `config.trials` battles. Trial `i` spawns its monster and seeds
    /// its battle from `base_seed + i`.
    pub fn simulate_matchup(&self, matchup: Matchup) -> Result<MatchupResult> {
        self.check(&matchup)?;
        let engine = BattleEngine::new(self.content.env());
        let player = create_character(
            matchup.class,
            &format!("Sim-{}", matchup.class),
            matchup.level,
            &self.content.classes,
            self.balance(),
        );

        let trials = self.config.trials;
        let (mut victories, mut defeats, mut draws) = (0u32, 0u32, 0u32);
        let (mut total_turns, mut total_player_hp, mut total_monster_hp) = (0u64, 0u64, 0u64);
        let mut turn_counts = Vec::with_capacity(trials as usize);

        for i in 0..trials {
            let seed = self.config.trial_seed(i);
            let (monster, _) = create_monster(
                matchup.bug_type,
                matchup.severity,
                matchup.complexity,
                RngState::from_seed(seed),
                self.balance(),
            );
            let outcome = simulate_battle(
                &engine,
                player.clone(),
                monster,
                seed,
                self.config.max_turns,
                self.config.strategy,
            );
            trace!(trial = i, seed, result = %outcome.result, turns = outcome.turns, "trial finished");

            match outcome.result {
                BattleResult::Victory => victories += 1,
                BattleResult::Defeat => defeats += 1,
                BattleResult::Draw => draws += 1,
            }
            total_turns += u64::from(outcome.turns);
            total_player_hp += u64::from(outcome.player_hp_remaining);
            total_monster_hp += u64::from(outcome.monster_hp_remaining);
            turn_counts.push(outcome.turns);
        }

        turn_counts.sort_unstable();
        let n = f64::from(trials);
        let win_rate = f64::from(victories) / n;
        let flag = BalanceFlag::classify(win_rate, f64::from(draws) / n, &self.config);

        debug!(
            class = %matchup.class,
            level = matchup.level,
            monster = %matchup.bug_type,
            severity = matchup.severity,
            win_rate,
            %flag,
            "matchup simulated"
        );

        Ok(MatchupResult {
            matchup,
            trials,
            victories,
            defeats,
            draws,
            win_rate,
            avg_turns: total_turns as f64 / n,
            median_turns: turn_counts.get(turn_counts.len() / 2).copied().unwrap_or(0),
            avg_player_hp_remaining: total_player_hp as f64 / n,
            avg_monster_hp_remaining: total_monster_hp as f64 / n,
            flag,
        })
    }

    /// Every class against every bug type.
    pub fn run_full_simulation(&self, level: u32, severity: u8, complexity: u32) -> Result<SimulationReport> {
        let start = Instant::now();
        let mut matchups = Vec::new();
        for class in CharacterClass::iter() {
            for bug_type in BugType::iter() {
                matchups.push(self.simulate_matchup(Matchup::new(class, level, bug_type, severity, complexity))?);
            }
        }

        let total_trials: u64 = matchups.iter().map(|m| u64::from(m.trials)).sum();
        let total_wins: u64 = matchups.iter().map(|m| u64::from(m.victories)).sum();
        let flagged: Vec<_> = matchups.iter().filter(|m| !m.is_balanced()).cloned().collect();
        let overall_win_rate = if total_trials == 0 {
            0.0
        } else {
            total_wins as f64 / total_trials as f64
        };
        let elapsed_ms = start.elapsed().as_millis() as u64;

        info!(
            level,
            severity,
            complexity,
            total_trials,
            overall_win_rate,
            flagged = flagged.len(),
            elapsed_ms,
            "full simulation complete"
        );

        Ok(SimulationReport {
            config: self.config.clone(),
            matchups,
            total_trials,
            overall_win_rate,
            flagged,
            elapsed_ms,
        })
    }

    /// One class against one bug type over a grid of levels and severities.
    pub fn run_progression_simulation(
        &self,
        class: CharacterClass,
        bug_type: BugType,
        levels: &[u32],
        severities: &[u8],
    ) -> Result<Vec<MatchupResult>> {
        let mut results = Vec::with_capacity(levels.len() * severities.len());
        for &level in levels {
            for &severity in severities {
                results.push(self.simulate_matchup(Matchup::new(class, level, bug_type, severity, 0))?);
            }
        }
        info!(%class, %bug_type, matchups = results.len(), "progression simulation complete");
        Ok(results)
    }
}
