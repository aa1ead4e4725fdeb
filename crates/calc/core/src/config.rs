/// Calculator constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CalcConfig {
    /// Largest edit distance at which an unknown name still gets a
    /// "did you mean" suggestion.
    pub suggestion_distance: usize,

    /// Outcome-set size past which callers should stop printing calc results.
    /// The core never truncates; enforcing this is the caller's job.
    pub max_outcomes: usize,

    /// Fixed critical-hit probability for multi-roll combination, overriding
    /// the per-generation default.
    pub crit_chance_override: Option<f64>,
}

impl CalcConfig {
    // ===== domain constants =====
    /// Largest hereditary value.
    pub const MAX_IV: u32 = 31;
    /// Number of discrete damage rolls.
    pub const ROLL_COUNT: usize = 16;
    /// Lowest random factor, in percent.
    pub const RANDOM_FLOOR: u32 = 85;
    /// Level bounds accepted by the tracker.
    pub const MIN_LEVEL: u32 = 1;
    pub const MAX_LEVEL: u32 = 100;
    /// Largest base stat a species can declare.
    pub const MAX_BASE_STAT: u32 = 255;
    /// Effort caps: stat experience (gen 1-2), effort values, award values.
    pub const MAX_STAT_EXPERIENCE: u32 = 65_535;
    pub const MAX_EFFORT_VALUE: u32 = 255;
    pub const MAX_AWARD_VALUE: u32 = 200;
    /// Deepest nesting either grammar accepts, counting parentheses, unary
    /// signs and chained operators.
    pub const MAX_NESTING: usize = 256;
    /// Roll sets accepted by multi-roll combination.
    pub const MAX_HITS: usize = 8;
    /// Largest effective threshold for the multi-roll sum table.
    pub const MAX_ROLL_THRESHOLD: u32 = 1 << 20;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SUGGESTION_DISTANCE: usize = 3;
    pub const DEFAULT_MAX_OUTCOMES: usize = 4096;

    pub fn new() -> Self {
        Self {
            suggestion_distance: Self::DEFAULT_SUGGESTION_DISTANCE,
            max_outcomes: Self::DEFAULT_MAX_OUTCOMES,
            crit_chance_override: None,
        }
    }

    pub fn with_suggestion_distance(mut self, suggestion_distance: usize) -> Self {
        self.suggestion_distance = suggestion_distance;
        self
    }
}

impl Default for CalcConfig {
    fn default() -> Self {
        Self::new()
    }
}
