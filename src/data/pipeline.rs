use std::path::Path;

use anyhow::{Context, Result};

use super::currency::normalize_currency;
use super::error::DataError;
use super::loader::load_file;
use super::model::Frame;
use super::outlier::remove_outliers;
use super::prune::{prune_columns, MissingColumnPolicy};
use super::schema::{LOCAL_CURRENCY, OUTLIER_COLUMNS, PRUNED_COLUMNS};
use super::table::{CleanTable, PipelineReport};

/// Knobs of the cleaning pipeline. Defaults reproduce the reference cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub local_currency: String,
    pub pruned_columns: Vec<String>,
    /// Applied in this order.
    pub outlier_columns: Vec<String>,
    pub missing_column: MissingColumnPolicy,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            local_currency: LOCAL_CURRENCY.to_string(),
            pruned_columns: PRUNED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            outlier_columns: OUTLIER_COLUMNS.iter().map(|c| c.to_string()).collect(),
            missing_column: MissingColumnPolicy::Fail,
        }
    }
}

/// Normalize currency, prune columns, filter outliers and build the table.
pub fn prepare(frame: Frame, settings: &PipelineSettings) -> Result<CleanTable, DataError> {
    let rows_loaded = frame.len();

    let normalized = normalize_currency(frame, &settings.local_currency)?;

    let pruned: Vec<&str> = settings.pruned_columns.iter().map(String::as_str).collect();
    let frame = prune_columns(normalized.frame, &pruned, settings.missing_column)?;

    let outlier: Vec<&str> = settings.outlier_columns.iter().map(String::as_str).collect();
    let (frame, filter_steps) = remove_outliers(frame, &outlier)?;

    let report = PipelineReport {
        rows_loaded,
        exchange_rate: normalized.rate,
        rows_converted: normalized.converted,
        filter_steps,
        rows_without_price: 0,
    };
    let table = CleanTable::from_frame(frame, report)?;
    log::info!(
        "pipeline done: {rows_loaded} rows loaded, {} listings kept",
        table.len()
    );
    Ok(table)
}

/// Read `path` and run [`prepare`] on it.
pub fn load_and_prepare(path: &Path, settings: &PipelineSettings) -> Result<CleanTable> {
    let frame = load_file(path).with_context(|| format!("loading {}", path.display()))?;
    prepare(frame, settings).with_context(|| format!("cleaning {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::error::Stage;
    use crate::data::schema::*;

    const HEADER: &str = "property_type,places,currency,price,price_per_m2,surface_total_in_m2,\
price_aprox_local_currency,price_aprox_usd,price_usd_per_m2,lat,lon,lat-lon,title";

    fn listing(kind: &str, place: &str, currency: &str, price: f64, area: f64) -> String {
        let per_m2 = price / area;
        let (local, usd) = if currency == "MXN" {
            (price, price / 20.0)
        } else {
            (price * 20.0, price)
        };
        format!(
            "{kind},{place},{currency},{price},{per_m2},{area},{local},{usd},{},19.4,-99.1,\"19.4,-99.1\",x",
            usd / area
        )
    }

    fn write_dataset(rows: &[String]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file
    }

    #[test]
    fn end_to_end_cleaning() {
        let mut rows: Vec<String> = (0..10)
            .map(|i| {
                let area = 80.0 + i as f64 * 5.0;
                listing("apartment", "Benito Juárez", "MXN", area * 30_000.0, area)
            })
            .collect();
        rows.push(listing("house", "Tlalpan", "USD", 150_000.0, 100.0));
        rows.push(listing("house", "Tlalpan", "MXN", 900_000_000.0, 90.0));
        let file = write_dataset(&rows);

        let table = load_and_prepare(file.path(), &PipelineSettings::default()).unwrap();
        let report = table.report();

        assert_eq!(report.rows_loaded, 12);
        assert!((report.exchange_rate.unwrap().rate - 20.0).abs() < 1e-9);
        assert_eq!(report.rows_converted, 1);
        assert_eq!(report.filter_steps.len(), 2);
        assert_eq!(report.filter_steps[0].column, PRICE_PER_M2);
        assert_eq!(
            report.filter_steps[0].rows_after,
            report.filter_steps[1].rows_before
        );

        for pruned in PRUNED_COLUMNS {
            assert!(!table.column_names().iter().any(|c| c == pruned));
        }
        assert!(table.column_names().iter().any(|c| c == "title"));
        assert!(table.listings().iter().all(|l| l.price < 900_000_000.0));

        let converted = table
            .listings()
            .iter()
            .find(|l| l.property_type == "house")
            .unwrap();
        assert!((converted.price - 3_000_000.0).abs() < 1e-6);
        assert!((converted.price_per_m2 - 30_000.0).abs() < 1e-6);
    }

    #[test]
    fn missing_price_markers_count_as_missing_in_any_currency() {
        let mut rows: Vec<String> = (0..8)
            .map(|i| {
                let area = 80.0 + i as f64 * 5.0;
                listing("apartment", "Coyoacán", "MXN", area * 30_000.0, area)
            })
            .collect();
        rows.push("house,Tlalpan,USD,N/A,1500,100,3000000,150000,1500,19.4,-99.1,\"19.4,-99.1\",x".into());
        rows.push("house,Tlalpan,MXN,NA,30000,100,3000000,150000,1500,19.4,-99.1,\"19.4,-99.1\",x".into());
        let file = write_dataset(&rows);

        let table = load_and_prepare(file.path(), &PipelineSettings::default()).unwrap();
        let report = table.report();

        assert_eq!(report.rows_loaded, 10);
        assert_eq!(report.rows_converted, 1);
        assert_eq!(report.rows_without_price, 2);
        assert_eq!(table.len(), 8);
        assert!(table.listings().iter().all(|l| l.place == "Coyoacán"));
    }

    #[test]
    fn schema_errors_abort_with_the_column_named() {
        let frame = Frame::from_rows(
            INPUT_COLUMNS
                .iter()
                .filter(|c| **c != LAT_LON)
                .map(|c| c.to_string())
                .collect(),
            vec![],
        );
        let err = prepare(frame, &PipelineSettings::default()).unwrap_err();
        assert_eq!(err, DataError::missing(LAT_LON, Stage::Prune));
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = load_and_prepare(Path::new("no_such_file.csv"), &PipelineSettings::default())
            .unwrap_err();
        assert!(format!("{err:#}").contains("no_such_file.csv"));
    }
}
