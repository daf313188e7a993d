use clap::Parser;

use upkeep_core::SensorReading;

/// Predictive maintenance check.
///
/// Trains the maintenance classifier on the built-in history, then combines
/// it with hard threshold rules to decide whether the machine needs service.
#[derive(Parser, Debug)]
#[command(name = "upkeep", version, about = "Rule + model maintenance decision")]
pub struct CliArgs {
    /// Temperature reading
    #[arg(long, default_value_t = 87.0, allow_negative_numbers = true)]
    pub temperature: f64,

    /// Vibration reading
    #[arg(long, default_value_t = 0.7, allow_negative_numbers = true)]
    pub vibration: f64,

    /// Pressure reading
    #[arg(long, default_value_t = 39.0, allow_negative_numbers = true)]
    pub pressure: f64,

    /// Config profile; env keys are looked up as {PROFILE}_{KEY} first
    #[arg(long, env = "UPKEEP_PROFILE")]
    pub profile: Option<String>,

    /// Path to config file (default: ~/.config/upkeep/config.toml)
    #[arg(long)]
    pub config: Option<String>,

    /// Temperature rule threshold override
    #[arg(long, allow_negative_numbers = true)]
    pub temp_threshold: Option<f64>,

    /// Vibration rule threshold override
    #[arg(long, allow_negative_numbers = true)]
    pub vibration_threshold: Option<f64>,

    /// Pressure rule threshold override
    #[arg(long, allow_negative_numbers = true)]
    pub pressure_threshold: Option<f64>,

    /// Emit the evaluation and chart data as JSON
    #[arg(long)]
    pub json: bool,

    /// Include the model fit report
    #[arg(long)]
    pub report: bool,

    /// Print the resolved configuration and exit
    #[arg(long)]
    pub show_config: bool,

    /// List config profiles found in the environment and exit
    #[arg(long)]
    pub list_profiles: bool,
}

impl CliArgs {
    pub fn reading(&self) -> SensorReading {
        SensorReading::new(self.temperature, self.vibration, self.pressure)
    }
}
