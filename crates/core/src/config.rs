use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UpkeepError};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_parse<T>(profile: &str, key: &str, current: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match profiled_env_opt(profile, key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Unparseable config value, keeping current");
            current
        }),
        None => current,
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    #[serde(default)]
    pub profile: String,
    #[serde(default)]
    pub rules: RuleConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub training: TrainingConfig,
}

/// Well-known env keys that identify a profile when prefixed.
const PROFILE_MARKER_KEYS: &[&str] = &[
    "TEMP_THRESHOLD",
    "VIBRATION_THRESHOLD",
    "PRESSURE_THRESHOLD",
    "SPLIT_SEED",
];

impl Config {
    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        Self::default().with_env(profile)
    }

    /// Overlay environment variables for `profile` on top of `self` (call `load_dotenv()` first).
    /// When `profile` is set (e.g. `PLANT2`), every key is first looked up as
    /// `{PROFILE}_{KEY}`, falling back to `{KEY}`. Keys that are unset keep their current value.
    pub fn with_env(self, profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            rules: self.rules.with_env_profiled(p),
            risk: self.risk.with_env_profiled(p),
            training: self.training.with_env_profiled(p),
        }
    }

    /// Discover available profiles by scanning env vars for `{PREFIX}_{MARKER_KEY}` patterns.
    /// Always includes "default" (the unprefixed config).
    pub fn available_profiles() -> Vec<String> {
        let mut profiles = std::collections::BTreeSet::new();
        profiles.insert("default".to_string());

        for (key, _) in env::vars() {
            for marker in PROFILE_MARKER_KEYS {
                if let Some(prefix) = key.strip_suffix(&format!("_{}", marker)) {
                    if !prefix.is_empty()
                        && prefix.chars().all(|c| c.is_ascii_uppercase() || c == '_')
                    {
                        profiles.insert(prefix.to_string());
                    }
                }
            }
        }

        profiles.into_iter().collect()
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Check every section. Thresholds may be any finite value; references,
    /// learning rate and iteration budget must be positive.
    pub fn validate(&self) -> Result<()> {
        self.rules.validate()?;
        self.risk.validate()?;
        self.training.validate()
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  rules:     temp>={}, vibration>={}, pressure>={}",
            self.rules.temp_threshold,
            self.rules.vibration_threshold,
            self.rules.pressure_threshold
        );
        tracing::info!(
            "  risk:      temp_ref={}, vibration_ref={}, pressure_ref={}",
            self.risk.temp_reference,
            self.risk.vibration_reference,
            self.risk.pressure_reference
        );
        tracing::info!(
            "  training:  test_fraction={}, seed={}, lr={}, max_iter={}, l2={}",
            self.training.test_fraction,
            self.training.seed,
            self.training.learning_rate,
            self.training.max_iterations,
            self.training.l2_penalty
        );
    }

    /// JSON view of the active configuration.
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "rules": self.rules,
            "risk": self.risk,
            "training": self.training,
        })
    }
}

fn require_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(UpkeepError::InvalidConfig(format!("{name} must be finite, got {value}")))
    }
}

fn require_positive(name: &str, value: f64) -> Result<()> {
    require_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(UpkeepError::InvalidConfig(format!("{name} must be > 0, got {value}")))
    }
}

// ── Rule thresholds ───────────────────────────────────────────

/// Hard alarm thresholds. A reading at or above any one of them triggers maintenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub temp_threshold: f64,
    pub vibration_threshold: f64,
    pub pressure_threshold: f64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            temp_threshold: 90.0,
            vibration_threshold: 0.9,
            pressure_threshold: 40.0,
        }
    }
}

impl RuleConfig {
    fn with_env_profiled(self, p: &str) -> Self {
        Self {
            temp_threshold: profiled_env_parse(p, "TEMP_THRESHOLD", self.temp_threshold),
            vibration_threshold: profiled_env_parse(p, "VIBRATION_THRESHOLD", self.vibration_threshold),
            pressure_threshold: profiled_env_parse(p, "PRESSURE_THRESHOLD", self.pressure_threshold),
        }
    }

    fn validate(&self) -> Result<()> {
        require_finite("temp_threshold", self.temp_threshold)?;
        require_finite("vibration_threshold", self.vibration_threshold)?;
        require_finite("pressure_threshold", self.pressure_threshold)
    }
}

// ── Risk references ───────────────────────────────────────────

/// Per-feature values at which a sub-score saturates at 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub temp_reference: f64,
    pub vibration_reference: f64,
    pub pressure_reference: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            temp_reference: 100.0,
            vibration_reference: 1.0,
            pressure_reference: 50.0,
        }
    }
}

impl RiskConfig {
    fn with_env_profiled(self, p: &str) -> Self {
        Self {
            temp_reference: profiled_env_parse(p, "TEMP_REFERENCE", self.temp_reference),
            vibration_reference: profiled_env_parse(p, "VIBRATION_REFERENCE", self.vibration_reference),
            pressure_reference: profiled_env_parse(p, "PRESSURE_REFERENCE", self.pressure_reference),
        }
    }

    /// Every reference must be finite and positive; sub-scores divide by them.
    pub fn validate(&self) -> Result<()> {
        require_positive("temp_reference", self.temp_reference)?;
        require_positive("vibration_reference", self.vibration_reference)?;
        require_positive("pressure_reference", self.pressure_reference)
    }
}

// ── Training ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Share of records held out for evaluation, in [0, 1).
    pub test_fraction: f64,
    /// Seed for the train/test shuffle.
    pub seed: u64,
    pub learning_rate: f64,
    pub max_iterations: usize,
    /// L2 penalty on the weights (intercept is not penalized).
    pub l2_penalty: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.3,
            seed: 42,
            learning_rate: 0.1,
            max_iterations: 5000,
            l2_penalty: 1.0,
        }
    }
}

impl TrainingConfig {
    fn with_env_profiled(self, p: &str) -> Self {
        Self {
            test_fraction: profiled_env_parse(p, "TEST_FRACTION", self.test_fraction),
            seed: profiled_env_parse(p, "SPLIT_SEED", self.seed),
            learning_rate: profiled_env_parse(p, "LEARNING_RATE", self.learning_rate),
            max_iterations: profiled_env_parse(p, "MAX_ITERATIONS", self.max_iterations),
            l2_penalty: profiled_env_parse(p, "L2_PENALTY", self.l2_penalty),
        }
    }

    fn validate(&self) -> Result<()> {
        require_finite("test_fraction", self.test_fraction)?;
        if !(0.0..1.0).contains(&self.test_fraction) {
            return Err(UpkeepError::InvalidConfig(format!(
                "test_fraction must be in [0, 1), got {}",
                self.test_fraction
            )));
        }
        require_positive("learning_rate", self.learning_rate)?;
        if self.max_iterations == 0 {
            return Err(UpkeepError::InvalidConfig("max_iterations must be > 0".into()));
        }
        require_finite("l2_penalty", self.l2_penalty)?;
        if self.l2_penalty < 0.0 {
            return Err(UpkeepError::InvalidConfig(format!(
                "l2_penalty must be >= 0, got {}",
                self.l2_penalty
            )));
        }
        Ok(())
    }
}
