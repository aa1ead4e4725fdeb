//! Per-generation sequencing of damage modifiers.
//!
//! Rounding order differs between generations and the differences matter,
//! so each generation gets its own stage layout instead of one shared list.
//! Generation 3 and generation 9 layouts are the best attested; the others
//! follow the same shape and are provisional.

use crate::error::FormulaError;
use crate::stats::Generation;

/// The three fold stages consumed by [`super::damage_rolls`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierStages {
    /// Applied to the move's power, flooring after each step.
    #[cfg_attr(feature = "serde", serde(default))]
    pub base_power: Vec<f64>,
    /// Applied to the base damage before the random factor.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pre_random: Vec<f64>,
    /// Applied after the random factor.
    #[cfg_attr(feature = "serde", serde(default))]
    pub post_random: Vec<f64>,
}

impl ModifierStages {
    pub fn validate(&self) -> Result<(), FormulaError> {
        let all = self
            .base_power
            .iter()
            .chain(&self.pre_random)
            .chain(&self.post_random);
        for modifier in all {
            if !modifier.is_finite() || *modifier < 0.0 {
                return Err(FormulaError::InvalidModifier(modifier.to_string()));
            }
        }
        Ok(())
    }
}

/// Weather relative to the move's type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Weather {
    #[default]
    Neutral,
    /// Sun on fire moves, rain on water moves.
    Boosting,
    /// Rain on fire moves, sun on water moves.
    Weakening,
}

impl Weather {
    pub const fn multiplier(self) -> f64 {
        match self {
            Weather::Neutral => 1.0,
            Weather::Boosting => 1.5,
            Weather::Weakening => 0.5,
        }
    }
}

/// Battle conditions around one attack.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DamageScenario {
    pub critical: bool,
    pub stab: bool,
    /// Combined type effectiveness, e.g. 0.5, 1, 2, 4.
    pub effectiveness: f64,
    /// The move hits more than one target.
    pub spread: bool,
    /// Reflect or Light Screen is up on the defending side.
    pub screen: bool,
    pub weather: Weather,
    /// The attacker is burned and the move is physical.
    pub burn: bool,
    /// Extra power modifiers (abilities, items), applied first.
    pub base_power_modifiers: Vec<f64>,
    /// Extra damage modifiers applied last.
    pub final_modifiers: Vec<f64>,
}

impl Default for DamageScenario {
    fn default() -> Self {
        Self {
            critical: false,
            stab: false,
            effectiveness: 1.0,
            spread: false,
            screen: false,
            weather: Weather::Neutral,
            burn: false,
            base_power_modifiers: Vec::new(),
            final_modifiers: Vec::new(),
        }
    }
}

/// Critical-hit damage multiplier.
pub const fn critical_multiplier(generation: Generation) -> f64 {
    if generation.number() <= 5 { 2.0 } else { 1.5 }
}

/// Damage multiplier for moves hitting several targets.
pub const fn spread_multiplier(generation: Generation) -> f64 {
    if generation.number() >= 4 { 0.75 } else { 0.5 }
}

const STAB: f64 = 1.5;
const SCREEN: f64 = 0.5;
const BURN: f64 = 0.5;

impl DamageScenario {
    /// Sequences this scenario's modifiers for `generation`.
    ///
    /// ```text
    /// gen 1-3  pre:  burn, screen, spread, weather, crit, stab, type, final
    /// gen 4    pre:  burn, screen, spread, weather
    ///          post: crit, stab, type, final
    /// gen 5+   pre:  spread, weather, crit
    ///          post: stab, type, burn, screen, final
    /// ```
    ///
    /// Burn only exists as a damage modifier from generation 3; earlier
    /// generations halve the attack stat instead, which the caller supplies.
    /// Screens never apply to critical hits.
    pub fn stages(&self, generation: Generation) -> ModifierStages {
        let number = generation.number();
        let mut pre = Vec::new();
        let mut post = Vec::new();

        let burn = self.burn && number >= 3;
        let screen = self.screen && !self.critical;

        if number <= 4 {
            push_if(&mut pre, burn, BURN);
            push_if(&mut pre, screen, SCREEN);
            push_if(&mut pre, self.spread, spread_multiplier(generation));
            push_if(&mut pre, self.weather != Weather::Neutral, self.weather.multiplier());

            let rest = if number <= 3 { &mut pre } else { &mut post };
            push_if(rest, self.critical, critical_multiplier(generation));
            push_if(rest, self.stab, STAB);
            push_if(rest, self.effectiveness != 1.0, self.effectiveness);
            rest.extend_from_slice(&self.final_modifiers);
        } else {
            push_if(&mut pre, self.spread, spread_multiplier(generation));
            push_if(&mut pre, self.weather != Weather::Neutral, self.weather.multiplier());
            push_if(&mut pre, self.critical, critical_multiplier(generation));

            push_if(&mut post, self.stab, STAB);
            push_if(&mut post, self.effectiveness != 1.0, self.effectiveness);
            push_if(&mut post, burn, BURN);
            push_if(&mut post, screen, SCREEN);
            post.extend_from_slice(&self.final_modifiers);
        }

        ModifierStages {
            base_power: self.base_power_modifiers.clone(),
            pre_random: pre,
            post_random: post,
        }
    }
}

fn push_if(stage: &mut Vec<f64>, condition: bool, modifier: f64) {
    if condition {
        stage.push(modifier);
    }
}
