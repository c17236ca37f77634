use std::path::PathBuf;

use crate::data::pipeline::PipelineSettings;
use crate::view::{ViewError, ViewKind};

/// Environment variable overriding the dataset path.
pub const DATA_PATH_VAR: &str = "CDMX_HOUSING_DATA";
/// Environment variable overriding the local currency code.
pub const LOCAL_CURRENCY_VAR: &str = "CDMX_LOCAL_CURRENCY";
/// Environment variable choosing the view shown at startup, by id or label.
pub const VIEW_VAR: &str = "CDMX_HOUSING_VIEW";

pub const DEFAULT_DATA_PATH: &str = "housing_data_CDMX_v2.csv";

/// Price slider granularity, in local currency.
pub const PRICE_STEP: f64 = 1000.0;

/// Bins of the price histograms.
pub const HISTOGRAM_BINS: usize = 50;

/// Plot size requested by the scatter views.
pub const SCATTER_SIZE: [f32; 2] = [600.0, 700.0];

/// Startup settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_path: PathBuf,
    pub pipeline: PipelineSettings,
    pub initial_view: ViewKind,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            pipeline: PipelineSettings::default(),
            initial_view: ViewKind::ALL[0],
        }
    }
}

impl Settings {
    /// Defaults, overridden by `CDMX_HOUSING_DATA`, `CDMX_LOCAL_CURRENCY` and
    /// `CDMX_HOUSING_VIEW`. An unknown view is an error, never a fallback.
    pub fn from_env() -> Result<Self, ViewError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ViewError> {
        let mut settings = Settings::default();
        if let Some(path) = lookup(DATA_PATH_VAR).filter(|p| !p.trim().is_empty()) {
            settings.data_path = PathBuf::from(path);
        }
        if let Some(code) = lookup(LOCAL_CURRENCY_VAR).filter(|c| !c.trim().is_empty()) {
            settings.pipeline.local_currency = code.trim().to_string();
        }
        if let Some(view) = lookup(VIEW_VAR).filter(|v| !v.trim().is_empty()) {
            settings.initial_view = ViewKind::select(&view)?;
        }
        Ok(settings)
    }
}
