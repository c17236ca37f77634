use super::error::{DataError, Stage};
use super::model::Frame;

/// What [`prune_columns`] does when a listed column is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingColumnPolicy {
    /// Abort with [`DataError::MissingColumn`].
    #[default]
    Fail,
    /// Skip the column and log a warning.
    Ignore,
}

/// Drop `columns` from the frame. Every other column is kept.
///
/// With [`MissingColumnPolicy::Fail`] the schema is checked before anything
/// is removed, so a failing call leaves no partially pruned frame behind.
pub fn prune_columns(
    mut frame: Frame,
    columns: &[&str],
    policy: MissingColumnPolicy,
) -> Result<Frame, DataError> {
    if policy == MissingColumnPolicy::Fail {
        frame.require_columns(columns, Stage::Prune)?;
    }
    for column in columns {
        if !frame.drop_column(column) {
            log::warn!("column '{column}' not present, nothing to prune");
        }
    }
    log::debug!("remaining columns: {:?}", frame.column_names());
    Ok(frame)
}
