use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "elsa-dashboard", version, about = "ELSA survey-wave health dashboard")]
pub struct CliArgs {
    /// Print the aggregated datasets and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless output as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the data service base URL
    #[arg(long = "api-base", value_name = "URL")]
    pub api_base: Option<String>,

    /// Records kept per visit month
    #[arg(long = "sample-size", value_name = "N")]
    pub sample_size: Option<usize>,

    /// Seed the sampler for reproducible output
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// How missing metrics count toward averages (zero or skip)
    #[arg(long = "null-policy", value_name = "POLICY")]
    pub null_policy: Option<String>,

    /// Keep everything (all) or nothing (none) while no wave is selected
    #[arg(long = "empty-selection", value_name = "MODE")]
    pub empty_selection: Option<String>,

    /// Wave selected for the bar chart and scatter plot (repeatable)
    #[arg(long = "wave", value_name = "WAVE")]
    pub waves: Vec<String>,

    /// Wave selected for the map (repeatable)
    #[arg(long = "map-wave", value_name = "WAVE")]
    pub map_waves: Vec<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(base) = &self.api_base {
            std::env::set_var("DASHBOARD_API_BASE", base);
        }
        if let Some(size) = self.sample_size {
            std::env::set_var("DASHBOARD_SAMPLE_SIZE", size.to_string());
        }
        if let Some(seed) = self.seed {
            std::env::set_var("DASHBOARD_SEED", seed.to_string());
        }
        if let Some(policy) = &self.null_policy {
            std::env::set_var("DASHBOARD_NULL_POLICY", policy);
        }
        if let Some(mode) = &self.empty_selection {
            std::env::set_var("DASHBOARD_EMPTY_SELECTION", mode);
        }
    }

    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waves_are_repeatable() {
        let args = CliArgs::parse_from([
            "elsa-dashboard",
            "--headless",
            "--wave",
            "Wave 2",
            "--wave",
            "Wave 4",
            "--map-wave",
            "Wave 7",
            "--seed",
            "11",
        ]);
        assert!(args.headless);
        assert_eq!(args.waves, vec!["Wave 2", "Wave 4"]);
        assert_eq!(args.map_waves, vec!["Wave 7"]);
        assert_eq!(args.seed, Some(11));
        assert_eq!(args.log_filter(), "info");
    }
}
