//! Damage tables for a tracked subject.

use std::collections::BTreeMap;

use crate::error::FormulaError;
use crate::state::Tracker;
use crate::stats::{ModifierHypothesis, Stat};

use super::compact::{bucket_by_lethality, combine_hypotheses};
use super::damage::damage_rolls;
use super::modifiers::DamageScenario;
use super::result::{CompactRange, OneShotResult, RangeResult};

/// Which side of the attack the tracked subject is on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    /// The tracked stat is the attacking stat.
    #[default]
    Attacker,
    /// The tracked stat is the defending stat.
    Defender,
}

/// One attack evaluated across every plausible hereditary value of a
/// tracked stat.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageQuery {
    pub stat: Stat,
    pub role: Role,
    /// Level of the tracked subject.
    pub level: u32,
    /// Attacker level when the tracked subject defends. Defaults to `level`.
    pub opponent_level: Option<u32>,
    pub power: u32,
    /// The opponent's (already stage-adjusted) attacking or defending stat.
    pub opponent_stat: u32,
    pub scenario: DamageScenario,
    pub threshold: Option<u32>,
}

impl DamageQuery {
    pub fn new(stat: Stat, level: u32, power: u32, opponent_stat: u32) -> Self {
        Self {
            stat,
            role: Role::Attacker,
            level,
            opponent_level: None,
            power,
            opponent_stat,
            scenario: DamageScenario::default(),
            threshold: None,
        }
    }

    #[must_use]
    pub fn defending(mut self, attacker_level: u32) -> Self {
        self.role = Role::Defender;
        self.opponent_level = Some(attacker_level);
        self
    }

    #[must_use]
    pub fn with_scenario(mut self, scenario: DamageScenario) -> Self {
        self.scenario = scenario;
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Level that enters the damage formula: always the attacker's.
    fn attack_level(&self) -> u32 {
        match self.role {
            Role::Attacker => self.level,
            Role::Defender => self.opponent_level.unwrap_or(self.level),
        }
    }

    /// Builds the damage table.
    ///
    /// # Errors
    ///
    /// Propagates [`FormulaError`] from the damage calculator, e.g. a zero
    /// defending stat.
    pub fn run(&self, tracker: &Tracker) -> Result<DamageReport, FormulaError> {
        let inferred = tracker.infer();
        let generation = tracker.generation();
        let stages = self.scenario.stages(generation);
        let attack_level = self.attack_level();

        let mut per_hypothesis = Vec::new();
        for (hypothesis, runs) in tracker.stat_runs(&inferred, self.stat, self.level) {
            let mut rows = Vec::with_capacity(runs.len());
            for run in runs {
                let (attack, defense) = match self.role {
                    Role::Attacker => (run.value, self.opponent_stat),
                    Role::Defender => (self.opponent_stat, run.value),
                };
                let rolls =
                    damage_rolls(attack_level, self.power, attack, defense, &stages, generation)?;
                rows.push(RangeResult::new(run.ivs, run.value, rolls));
            }
            per_hypothesis.push((hypothesis, rows));
        }

        let compact = combine_hypotheses(&per_hypothesis);
        let lethality = self
            .threshold
            .map(|threshold| bucket_by_lethality(&compact, threshold))
            .unwrap_or_default();

        Ok(DamageReport {
            per_hypothesis: per_hypothesis.into_iter().collect(),
            compact,
            lethality,
        })
    }
}

/// Damage table for one [`DamageQuery`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageReport {
    pub per_hypothesis: BTreeMap<ModifierHypothesis, Vec<RangeResult>>,
    pub compact: Vec<CompactRange>,
    /// Empty unless the query had a threshold.
    pub lethality: BTreeMap<u8, OneShotResult>,
}
