//! Difficulty tiers and the generation parameters behind them.
//!
//! The built-in table can be overridden from a TOML file, one table per tier:
//!
//! ```toml
//! max_factor = 10
//!
//! [hard]
//! comparison_denominators = [2, 3, 4, 5, 6, 7, 8, 9, 10, 12]
//! max_value = 1.5
//! grid = [8, 8]
//! fraction_candidates = [[1, 2], [1, 3], [2, 3]]
//! ```
//!
//! Tiers missing from the file keep their defaults. Every tier is checked
//! on load so generation never runs against an empty sampling domain.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::exercise_engine::models::{Fraction, Tier};

/// Tier used when a label is not recognised.
pub const DEFAULT_TIER: Tier = Tier::Medium;

/// Upper bound for multiplication-fact operands.
pub const MAX_FACTOR_LIMIT: u32 = 12;

/// Generation parameters for one tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierParams {
    /// Denominators for the multiple-choice comparison.
    pub comparison_denominators: Vec<u32>,
    /// Largest fraction value the comparison may show.
    pub max_value: f64,
    /// Estimation grid as `[cols, rows]`.
    pub grid: [u32; 2],
    /// `(numerator, denominator)` pairs for the multiplication grid. Each
    /// must be a proper fraction with a denominator of at most
    /// [`MAX_CANDIDATE_DENOMINATOR`].
    pub fraction_candidates: Vec<(u32, u32)>,
}

impl TierParams {
    pub fn cols(&self) -> u32 {
        self.grid[0]
    }

    pub fn rows(&self) -> u32 {
        self.grid[1]
    }

    fn builtin(tier: Tier) -> TierParams {
        match tier {
            Tier::Easy => TierParams {
                comparison_denominators: vec![2, 3, 4],
                max_value: 1.0,
                grid: [4, 4],
                fraction_candidates: vec![(1, 2), (1, 3), (1, 4), (2, 3), (3, 4)],
            },
            Tier::Medium => TierParams {
                comparison_denominators: vec![2, 3, 4, 5, 6, 8],
                max_value: 1.2,
                grid: [6, 6],
                fraction_candidates: vec![(1, 2), (1, 3), (2, 3), (1, 4), (3, 4), (2, 5), (3, 5)],
            },
            Tier::Hard => TierParams {
                comparison_denominators: vec![2, 3, 4, 5, 6, 7, 8, 9, 10, 12],
                max_value: 1.5,
                grid: [8, 8],
                fraction_candidates: vec![
                    (1, 2), (1, 3), (2, 3), (1, 4), (3, 4),
                    (2, 5), (3, 5), (1, 6), (5, 6),
                ],
            },
        }
    }

    /// Check that this tier can drive every generator.
    pub fn validate(&self, tier: &str) -> Result<(), ConfigError> {
        validate_pair_domain(tier, &self.comparison_denominators, self.max_value)?;

        let (cols, rows) = (self.cols(), self.rows());
        if cols == 0 || rows == 0 {
            return Err(ConfigError::EmptyGrid { tier: tier.to_string(), cols, rows });
        }
        if self.fraction_candidates.is_empty() {
            return Err(ConfigError::NoFractionCandidates { tier: tier.to_string() });
        }
        if let Some(&(numer, denom)) = self
            .fraction_candidates
            .iter()
            .find(|&&(n, d)| n == 0 || n >= d || d > MAX_CANDIDATE_DENOMINATOR)
        {
            return Err(ConfigError::InvalidCandidate { tier: tier.to_string(), numer, denom });
        }
        Ok(())
    }
}

/// Upper bound on multiplication candidate denominators.
pub const MAX_CANDIDATE_DENOMINATOR: u32 = 1000;

/// Largest numerator allowed for `denominator`: `min(d - 1, floor(max_value * d))`.
pub fn numerator_bound(denominator: u32, max_value: f64) -> u32 {
    let scaled = (max_value * f64::from(denominator)).floor();
    let cap = if scaled >= 1.0 { scaled as u32 } else { 0 };
    cap.min(denominator.saturating_sub(1))
}

/// Check that a denominator set yields at least two distinct proper fractions.
pub fn validate_pair_domain(tier: &str, denominators: &[u32], max_value: f64) -> Result<(), ConfigError> {
    if denominators.is_empty() {
        return Err(ConfigError::EmptyDenominators { tier: tier.to_string() });
    }
    let mut values = BTreeSet::new();
    for &d in denominators {
        if d < 2 {
            return Err(ConfigError::InvalidDenominator { tier: tier.to_string(), denominator: d });
        }
        let bound = numerator_bound(d, max_value);
        if bound == 0 {
            return Err(ConfigError::EmptyNumeratorRange {
                tier: tier.to_string(),
                denominator: d,
                max_value,
            });
        }
        values.extend((1..=bound).map(|n| Fraction::new(i64::from(n), i64::from(d))));
    }
    if values.len() < 2 {
        return Err(ConfigError::DegeneratePairDomain { tier: tier.to_string() });
    }
    Ok(())
}

/// Read-only mapping from tier to generation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyConfig {
    tiers: BTreeMap<Tier, TierParams>,
    max_factor: u32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        DifficultyConfig {
            tiers: Tier::ALL.iter().map(|&t| (t, TierParams::builtin(t))).collect(),
            max_factor: MAX_FACTOR_LIMIT,
        }
    }
}

/// On-disk shape: optional `max_factor` plus one optional table per tier.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    max_factor: Option<u32>,
    #[serde(flatten)]
    tiers: BTreeMap<String, TierParams>,
}

impl DifficultyConfig {
    /// Parameters for a known tier.
    pub fn params(&self, tier: Tier) -> &TierParams {
        // Every tier is present: the map is filled from `Tier::ALL` and
        // overrides only replace entries.
        &self.tiers[&tier]
    }

    /// Resolve a tier label, falling back to [`DEFAULT_TIER`] when the
    /// label is not recognised.
    pub fn resolve(&self, label: &str) -> (Tier, &TierParams) {
        let tier = Tier::from_label(label).unwrap_or_else(|| {
            tracing::warn!(label, fallback = %DEFAULT_TIER, "unknown difficulty tier, using default");
            DEFAULT_TIER
        });
        (tier, self.params(tier))
    }

    /// Multiplication-fact operand bound, already clamped to `1..=12`.
    pub fn max_factor(&self) -> u32 {
        self.max_factor
    }

    /// Parse overrides from TOML text on top of the built-in table.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        let mut config = DifficultyConfig::default();
        if let Some(max) = file.max_factor {
            config.max_factor = max.clamp(1, MAX_FACTOR_LIMIT);
        }
        for (label, params) in file.tiers {
            let tier = Tier::from_label(&label).ok_or_else(|| ConfigError::UnknownTier(label.clone()))?;
            params.validate(tier.label())?;
            tracing::debug!(%tier, "difficulty tier overridden from configuration");
            config.tiers.insert(tier, params);
        }
        Ok(config)
    }

    /// Load overrides from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded difficulty configuration");
        Ok(config)
    }
}
