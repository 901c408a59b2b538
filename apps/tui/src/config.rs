use crate::error::{DashboardError, Result};
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "https://server-1-01nj.onrender.com";
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

/// How a missing metric value counts toward an average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullPolicy {
    /// Missing values count as 0 and stay in the denominator.
    #[default]
    AsZero,
    /// Missing values are left out of both sum and denominator.
    Skip,
}

impl NullPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "zero" | "as-zero" => Some(Self::AsZero),
            "skip" => Some(Self::Skip),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AsZero => "zero",
            Self::Skip => "skip",
        }
    }
}

/// What an empty wave selection keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptySelection {
    #[default]
    ShowAll,
    ShowNone,
}

impl EmptySelection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "all" => Some(Self::ShowAll),
            "none" => Some(Self::ShowNone),
            _ => None,
        }
    }
}

/// Knobs for the sampling and averaging pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorConfig {
    pub sample_size: usize,
    pub null_policy: NullPolicy,
    pub empty_selection: EmptySelection,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            null_policy: NullPolicy::default(),
            empty_selection: EmptySelection::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base: String,
    pub aggregator: AggregatorConfig,
    pub seed: Option<u64>,
    pub log_dir: PathBuf,
}

/// Initializes the application configuration from `.env` and the process
/// environment.
pub fn init_app_config() -> Result<AppConfig> {
    // Load environment variables from .env file
    dotenv().ok();

    let api_base = env::var("DASHBOARD_API_BASE")
        .unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
        .trim_end_matches('/')
        .to_string();
    if api_base.is_empty() {
        return Err(DashboardError::Config(
            "DASHBOARD_API_BASE must not be empty".to_string(),
        ));
    }

    let sample_size = match env::var("DASHBOARD_SAMPLE_SIZE") {
        Ok(raw) => parse_sample_size(&raw)?,
        Err(_) => DEFAULT_SAMPLE_SIZE,
    };

    let null_policy = match env::var("DASHBOARD_NULL_POLICY") {
        Ok(raw) => NullPolicy::parse(&raw).ok_or_else(|| {
            DashboardError::Config(format!("unknown null policy {raw:?} (use zero or skip)"))
        })?,
        Err(_) => NullPolicy::default(),
    };

    let empty_selection = match env::var("DASHBOARD_EMPTY_SELECTION") {
        Ok(raw) => EmptySelection::parse(&raw).ok_or_else(|| {
            DashboardError::Config(format!("unknown empty selection {raw:?} (use all or none)"))
        })?,
        Err(_) => EmptySelection::default(),
    };

    let seed = match env::var("DASHBOARD_SEED") {
        Ok(raw) => Some(
            raw.trim()
                .parse()
                .map_err(|_| DashboardError::Config(format!("seed {raw:?} is not a u64")))?,
        ),
        Err(_) => None,
    };

    Ok(AppConfig {
        api_base,
        aggregator: AggregatorConfig {
            sample_size,
            null_policy,
            empty_selection,
        },
        seed,
        log_dir: get_log_dir(),
    })
}

fn parse_sample_size(raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(DashboardError::Config(format!(
            "sample size {raw:?} must be a positive integer"
        ))),
    }
}

/// Gets the directory the TUI writes its log file into
pub fn get_log_dir() -> PathBuf {
    env::var("DASHBOARD_LOG_DIR").map_or_else(|_| PathBuf::from("./logs"), PathBuf::from)
}
