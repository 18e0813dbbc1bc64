use crate::consts::{
    DEFAULT_AFFINITY_PAIR_THRESHOLD, DEFAULT_CRITICAL_GAIN_PCT, DEFAULT_GAIN_THRESHOLD_PCT,
    DEFAULT_INERTIA_PENALTY, DEFAULT_MAX_COST_INCREASE_PCT, DEFAULT_MAX_REFINE_ITERATIONS,
    DEFAULT_NEIGHBORHOOD_RADIUS, MAX_NEIGHBORHOOD_RADIUS,
};
use crate::error::{SfResult, SlotForgeError};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub weights: CostWeights,
    #[command(flatten)]
    pub thresholds: Thresholds,
    #[command(flatten)]
    pub search: SearchParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CostWeights {
    /// Weight of the affinity penalty (0 disables affinity)
    #[arg(long, default_value_t = 0.0)]
    pub affinity_weight: f64,

    /// Added to every move of an inertial item
    #[arg(long, default_value_t = DEFAULT_INERTIA_PENALTY)]
    pub inertia_penalty: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            affinity_weight: 0.0,
            inertia_penalty: DEFAULT_INERTIA_PENALTY,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum relocation gain (%) for an item to be worth moving
    #[arg(long, default_value_t = DEFAULT_GAIN_THRESHOLD_PCT)]
    pub gain_threshold_pct: f64,

    /// Share of the available gain the critical moves must reach (%)
    #[arg(long, default_value_t = DEFAULT_CRITICAL_GAIN_PCT)]
    pub critical_gain_pct: f64,

    /// Allowed operational cost growth during affinity refinement (%)
    #[arg(long, default_value_t = DEFAULT_MAX_COST_INCREASE_PCT)]
    pub max_cost_increase_pct: f64,

    #[arg(long, default_value_t = DEFAULT_AFFINITY_PAIR_THRESHOLD)]
    pub affinity_pair_threshold: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            gain_threshold_pct: DEFAULT_GAIN_THRESHOLD_PCT,
            critical_gain_pct: DEFAULT_CRITICAL_GAIN_PCT,
            max_cost_increase_pct: DEFAULT_MAX_COST_INCREASE_PCT,
            affinity_pair_threshold: DEFAULT_AFFINITY_PAIR_THRESHOLD,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchParams {
    #[arg(long, default_value_t = DEFAULT_MAX_REFINE_ITERATIONS)]
    pub max_refine_iterations: usize,

    /// Chebyshev radius of the refinement swap neighbourhood
    #[arg(long, default_value_t = DEFAULT_NEIGHBORHOOD_RADIUS)]
    pub neighborhood_radius: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_refine_iterations: DEFAULT_MAX_REFINE_ITERATIONS,
            neighborhood_radius: DEFAULT_NEIGHBORHOOD_RADIUS,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SfResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SlotForgeError::Config(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlays the values the user typed on the command line; defaults
    /// filled in by clap do not override file values.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(weights.affinity_weight);
        update_if_present!(weights.inertia_penalty);

        update_if_present!(thresholds.gain_threshold_pct);
        update_if_present!(thresholds.critical_gain_pct);
        update_if_present!(thresholds.max_cost_increase_pct);
        update_if_present!(thresholds.affinity_pair_threshold);

        update_if_present!(search.max_refine_iterations);
        update_if_present!(search.neighborhood_radius);
    }

    pub fn validate(&self) -> SfResult<()> {
        let non_negative = [
            ("affinity_weight", self.weights.affinity_weight),
            ("inertia_penalty", self.weights.inertia_penalty),
            ("critical_gain_pct", self.thresholds.critical_gain_pct),
            ("max_cost_increase_pct", self.thresholds.max_cost_increase_pct),
            ("affinity_pair_threshold", self.thresholds.affinity_pair_threshold),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SlotForgeError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if !self.thresholds.gain_threshold_pct.is_finite() {
            return Err(SlotForgeError::Config(
                "gain_threshold_pct must be finite".to_string(),
            ));
        }
        if self.search.neighborhood_radius > MAX_NEIGHBORHOOD_RADIUS {
            return Err(SlotForgeError::Config(format!(
                "neighborhood_radius must be at most {}, got {}",
                MAX_NEIGHBORHOOD_RADIUS, self.search.neighborhood_radius
            )));
        }
        if self.search.max_refine_iterations == 0 {
            return Err(SlotForgeError::Config(
                "max_refine_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
