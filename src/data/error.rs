use std::fmt;

use thiserror::Error;

/// Pipeline stage in which a [`DataError`] was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Normalize,
    Prune,
    OutlierFilter,
    Build,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Normalize => "currency normalization",
            Stage::Prune => "column pruning",
            Stage::OutlierFilter => "outlier filter",
            Stage::Build => "table build",
        };
        f.write_str(name)
    }
}

/// Errors raised while turning the raw file into a [`CleanTable`](super::table::CleanTable).
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("missing column '{column}' during {stage}")]
    MissingColumn { column: String, stage: Stage },

    #[error(
        "cannot derive an exchange rate: no listing has a usable local/foreign price pair, \
         but {foreign_rows} listings need conversion"
    )]
    NoExchangeRate { foreign_rows: usize },
}

impl DataError {
    pub fn missing(column: &str, stage: Stage) -> Self {
        DataError::MissingColumn {
            column: column.to_string(),
            stage,
        }
    }
}
