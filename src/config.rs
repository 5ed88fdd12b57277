//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::series::PERIODS;

/// Top-level scenario configuration parsed from TOML.
///
/// The `[battery]` table has no defaults: capacity and power limits must be
/// stated explicitly in every scenario file. Every other section falls back
/// to the baseline community. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or start from a preset with
/// [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Household count, PV share, and daily energy budgets.
    #[serde(default)]
    pub community: CommunityConfig,
    /// Shared community battery limits (required).
    pub battery: BatteryConfig,
    /// Optional grid draw and cycle limits.
    #[serde(default)]
    pub constraints: ConstraintConfig,
    /// Reporting options.
    #[serde(default)]
    pub report: ReportConfig,
    /// Profile and price sources.
    #[serde(default)]
    pub inputs: InputConfig,
}

/// Household count, PV share, and daily energy budgets.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommunityConfig {
    /// Number of households in the community (must be > 0).
    pub households: usize,
    /// Fraction of households with a PV system (0.0–1.0, rounded up).
    pub pv_ratio: f64,
    /// Daily demand per household (kWh).
    pub demand_per_household_kwh: f64,
    /// Daily PV generation per household with PV (kWh).
    pub generation_per_household_kwh: f64,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            households: 33,
            pv_ratio: 0.0,
            demand_per_household_kwh: 10.96,
            generation_per_household_kwh: 12.05,
        }
    }
}

/// Shared community battery limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BatteryConfig {
    /// Lower state-of-charge bound (kWh).
    pub min_capacity_kwh: f64,
    /// Upper state-of-charge bound (kWh).
    pub max_capacity_kwh: f64,
    /// Maximum energy charged per period (kWh per hour).
    pub max_charge_kw: f64,
    /// Maximum energy discharged per period (kWh per hour).
    pub max_discharge_kw: f64,
    /// State of charge at the start of the first period (kWh).
    pub initial_soc_kwh: f64,
}

impl BatteryConfig {
    /// The community battery of the baseline scenario.
    pub fn baseline() -> Self {
        Self {
            min_capacity_kwh: 0.0,
            max_capacity_kwh: 81.0,
            max_charge_kw: 30.0,
            max_discharge_kw: 30.0,
            initial_soc_kwh: 0.0,
        }
    }
}

/// Optional dispatch constraints; an absent value disables the constraint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConstraintConfig {
    /// Upper bound on grid draw in any single period (kWh per hour).
    pub max_grid_consumption_kw: Option<f64>,
    /// Upper bound on battery cycles over the day.
    pub max_battery_cycles: Option<f64>,
}

/// Reporting options.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Clock hours (0–23) counted as peak periods for peak-reduction metrics.
    pub peak_periods: Vec<usize>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            peak_periods: vec![5, 6, 7, 8, 9, 17, 18, 19, 20, 21],
        }
    }
}

/// Profile and price sources. Missing paths fall back to the built-in
/// synthetic curves.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// CSV table with a `percentage` column for household demand.
    pub demand_profile: Option<PathBuf>,
    /// CSV table with a `percentage` column for PV generation.
    pub generation_profile: Option<PathBuf>,
    /// CSV table with a `mean` column of grid prices.
    pub prices: Option<PathBuf>,
    /// Seed for the synthetic curves.
    pub seed: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            demand_profile: None,
            generation_profile: None,
            prices: None,
            seed: 42,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.max_capacity_kwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// The baseline community: 33 households without PV sharing an 81 kWh battery.
    pub fn baseline() -> Self {
        Self {
            community: CommunityConfig::default(),
            battery: BatteryConfig::baseline(),
            constraints: ConstraintConfig::default(),
            report: ReportConfig::default(),
            inputs: InputConfig::default(),
        }
    }

    /// Half of the households own a PV system.
    pub fn solar_community() -> Self {
        Self {
            community: CommunityConfig {
                pv_ratio: 0.5,
                ..CommunityConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// PV community with grid draw and cycle limits enabled.
    pub fn peak_shaving() -> Self {
        Self {
            community: CommunityConfig {
                pv_ratio: 0.3,
                ..CommunityConfig::default()
            },
            constraints: ConstraintConfig {
                max_grid_consumption_kw: Some(24.0),
                max_battery_cycles: Some(1.5),
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "solar_community", "peak_shaving"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "solar_community" => Ok(Self::solar_community()),
            "peak_shaving" => Ok(Self::peak_shaving()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// Relative input paths are resolved against the scenario file's directory.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        let mut cfg = Self::from_toml_str(&content)?;
        if let Some(dir) = path.parent() {
            cfg.inputs.resolve_relative_to(dir);
        }
        Ok(cfg)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid, contains unknown
    /// fields, or omits a required battery limit.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut check = |ok: bool, field: &str, message: &str| {
            if !ok {
                errors.push(ConfigError::new(field, message));
            }
        };

        let c = &self.community;
        check(c.households > 0, "community.households", "must be > 0");
        check(
            (0.0..=1.0).contains(&c.pv_ratio),
            "community.pv_ratio",
            "must be in [0.0, 1.0]",
        );
        check(
            c.demand_per_household_kwh.is_finite() && c.demand_per_household_kwh >= 0.0,
            "community.demand_per_household_kwh",
            "must be >= 0",
        );
        check(
            c.generation_per_household_kwh.is_finite() && c.generation_per_household_kwh >= 0.0,
            "community.generation_per_household_kwh",
            "must be >= 0",
        );

        let b = &self.battery;
        check(
            b.max_capacity_kwh.is_finite() && b.max_capacity_kwh > 0.0,
            "battery.max_capacity_kwh",
            "must be > 0",
        );
        check(
            b.min_capacity_kwh >= 0.0 && b.min_capacity_kwh <= b.max_capacity_kwh,
            "battery.min_capacity_kwh",
            "must be in [0, battery.max_capacity_kwh]",
        );
        check(
            b.max_charge_kw.is_finite() && b.max_charge_kw >= 0.0,
            "battery.max_charge_kw",
            "must be >= 0",
        );
        check(
            b.max_discharge_kw.is_finite() && b.max_discharge_kw >= 0.0,
            "battery.max_discharge_kw",
            "must be >= 0",
        );
        check(
            b.initial_soc_kwh >= b.min_capacity_kwh && b.initial_soc_kwh <= b.max_capacity_kwh,
            "battery.initial_soc_kwh",
            "must be in [battery.min_capacity_kwh, battery.max_capacity_kwh]",
        );

        let k = &self.constraints;
        if let Some(limit) = k.max_grid_consumption_kw {
            check(
                limit.is_finite() && limit > 0.0,
                "constraints.max_grid_consumption_kw",
                "must be > 0 when set",
            );
        }
        if let Some(cycles) = k.max_battery_cycles {
            check(
                cycles.is_finite() && cycles > 0.0,
                "constraints.max_battery_cycles",
                "must be > 0 when set",
            );
        }

        let peaks = &self.report.peak_periods;
        check(
            peaks.iter().all(|&p| p < PERIODS),
            "report.peak_periods",
            "hours must be in 0..=23",
        );
        let mut sorted = peaks.clone();
        sorted.sort_unstable();
        sorted.dedup();
        check(
            sorted.len() == peaks.len(),
            "report.peak_periods",
            "must not contain duplicates",
        );

        errors
    }

    /// Number of households that carry the PV profile.
    pub fn households_with_pv(&self) -> usize {
        let c = &self.community;
        let n = (c.households as f64 * c.pv_ratio).ceil() as usize;
        n.min(c.households)
    }
}

impl InputConfig {
    fn resolve_relative_to(&mut self, dir: &Path) {
        for path in [
            &mut self.demand_profile,
            &mut self.generation_profile,
            &mut self.prices,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BATTERY_TOML: &str = r#"
[battery]
min_capacity_kwh = 0.0
max_capacity_kwh = 50.0
max_charge_kw = 10.0
max_discharge_kw = 10.0
initial_soc_kwh = 5.0
"#;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let e = ScenarioConfig::from_preset("nonexistent").unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn minimal_toml_uses_community_defaults() {
        let cfg = ScenarioConfig::from_toml_str(BATTERY_TOML).expect("valid TOML");
        assert_eq!(cfg.community.households, 33);
        assert_eq!(cfg.battery.max_capacity_kwh, 50.0);
        assert!(cfg.constraints.max_grid_consumption_kw.is_none());
        assert!(cfg.constraints.max_battery_cycles.is_none());
        assert_eq!(cfg.report.peak_periods.len(), 10);
    }

    #[test]
    fn missing_battery_section_is_rejected() {
        let toml = r#"
[community]
households = 4
"#;
        let err = ScenarioConfig::from_toml_str(toml).unwrap_err();
        assert!(err.message.contains("battery"), "{err}");
    }

    #[test]
    fn missing_battery_limit_is_not_defaulted() {
        let toml = r#"
[battery]
min_capacity_kwh = 0.0
max_capacity_kwh = 50.0
max_discharge_kw = 10.0
initial_soc_kwh = 0.0
"#;
        let err = ScenarioConfig::from_toml_str(toml).unwrap_err();
        assert!(err.message.contains("max_charge_kw"), "{err}");
    }

    #[test]
    fn unknown_field_is_rejected() {
        let toml = format!("{BATTERY_TOML}\n[community]\nbogus_field = true\n");
        assert!(ScenarioConfig::from_toml_str(&toml).is_err());
    }

    #[test]
    fn full_toml_parses() {
        let toml = format!(
            r#"{BATTERY_TOML}
[community]
households = 10
pv_ratio = 0.25
demand_per_household_kwh = 12.0
generation_per_household_kwh = 9.0

[constraints]
max_grid_consumption_kw = 30.0
max_battery_cycles = 1.0

[report]
peak_periods = [17, 18, 19]

[inputs]
prices = "prices.csv"
seed = 7
"#
        );
        let cfg = ScenarioConfig::from_toml_str(&toml).expect("valid TOML");
        assert_eq!(cfg.community.households, 10);
        assert_eq!(cfg.households_with_pv(), 3);
        assert_eq!(cfg.constraints.max_battery_cycles, Some(1.0));
        assert_eq!(cfg.report.peak_periods, vec![17, 18, 19]);
        assert_eq!(cfg.inputs.prices, Some(PathBuf::from("prices.csv")));
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn validation_catches_inverted_capacity_bounds() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.battery.min_capacity_kwh = 100.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.min_capacity_kwh"));
    }

    #[test]
    fn validation_catches_initial_soc_out_of_bounds() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.battery.initial_soc_kwh = 90.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.initial_soc_kwh"));
    }

    #[test]
    fn validation_catches_bad_peak_periods() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.report.peak_periods = vec![5, 5, 24];
        let errors = cfg.validate();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.field == "report.peak_periods")
                .count(),
            2
        );
    }

    #[test]
    fn validation_catches_nonpositive_limits() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.constraints.max_grid_consumption_kw = Some(0.0);
        cfg.constraints.max_battery_cycles = Some(-1.0);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "constraints.max_grid_consumption_kw"));
        assert!(errors.iter().any(|e| e.field == "constraints.max_battery_cycles"));
    }

    #[test]
    fn pv_household_count_rounds_up() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.community.pv_ratio = 0.5;
        assert_eq!(cfg.households_with_pv(), 17);
        cfg.community.pv_ratio = 0.0;
        assert_eq!(cfg.households_with_pv(), 0);
        cfg.community.pv_ratio = 1.0;
        assert_eq!(cfg.households_with_pv(), 33);
    }

    #[test]
    fn relative_input_paths_resolve_against_scenario_dir() {
        let mut inputs = InputConfig {
            prices: Some(PathBuf::from("prices.csv")),
            demand_profile: Some(PathBuf::from("/abs/demand.csv")),
            ..InputConfig::default()
        };
        inputs.resolve_relative_to(Path::new("scenarios"));
        assert_eq!(inputs.prices, Some(PathBuf::from("scenarios/prices.csv")));
        assert_eq!(inputs.demand_profile, Some(PathBuf::from("/abs/demand.csv")));
    }
}
