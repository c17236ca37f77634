use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::{DataError, Stage};
use super::model::{Cell, Frame};
use super::schema::INPUT_COLUMNS;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a listings file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the listing columns (the reference format)
/// * `.parquet` – flat columns with the same names, as written by Pandas or Polars
///
/// Every column in [`INPUT_COLUMNS`] must be present.
pub fn load_file(path: &Path) -> Result<Frame> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let frame = match ext.as_str() {
        "csv" => load_csv(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };
    log::debug!(
        "loaded {} rows, columns {:?} from {}",
        frame.len(),
        frame.column_names(),
        path.display()
    );
    Ok(frame)
}

fn check_input_columns(headers: &[String]) -> Result<(), DataError> {
    match INPUT_COLUMNS
        .iter()
        .find(|col| !headers.iter().any(|h| h == *col))
    {
        Some(missing) => Err(DataError::missing(missing, Stage::Load)),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Frame> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    check_input_columns(&headers)?;

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok(Frame::from_rows(headers, rows))
}

/// Markers read as a missing value, the same set pandas uses by default.
const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn guess_cell_type(s: &str) -> Cell {
    let s = s.trim();
    if NULL_MARKERS.contains(&s) {
        return Cell::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Cell::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Cell::Float(f);
    }
    if s == "true" || s == "false" {
        return Cell::Bool(s == "true");
    }
    Cell::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

fn load_parquet(path: &Path) -> Result<Frame> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening parquet file {}", path.display()))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    check_input_columns(&headers)?;

    let reader = builder.build().context("building parquet reader")?;
    let mut rows: Vec<Vec<Cell>> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            rows.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| extract_cell(col, row))
                    .collect(),
            );
        }
    }

    Ok(Frame::from_rows(headers, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Null;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map_or(Cell::Null, |s| Cell::Text(s.value(row).to_string())),
        DataType::LargeUtf8 => Cell::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map_or(Cell::Null, |a| Cell::Integer(a.value(row) as i64)),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map_or(Cell::Null, |a| Cell::Integer(a.value(row))),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map_or(Cell::Null, |a| Cell::Float(a.value(row) as f64)),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map_or(Cell::Null, |a| Cell::Float(a.value(row))),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map_or(Cell::Null, |a| Cell::Bool(a.value(row))),
        other => {
            log::warn!("unsupported parquet column type {other:?}, reading as null");
            Cell::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::schema::*;

    const HEADER: &str = "property_type,places,currency,price,price_per_m2,surface_total_in_m2,\
price_aprox_local_currency,price_aprox_usd,price_usd_per_m2,lat,lon,lat-lon";

    fn write_csv(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{body}").unwrap();
        file
    }

    #[test]
    fn loads_csv_with_typed_cells() {
        let file = write_csv(&format!(
            "{HEADER}\napartment,Benito Juárez,MXN,2500000,25000.5,100,2500000,125000,1250,19.37,-99.16,\"19.37,-99.16\"\n\
             house,Coyoacán,USD,300000,,200,6000000,300000,,,,\n"
        ));
        let frame = load_file(file.path()).unwrap();

        assert_eq!(frame.len(), 2);
        assert_eq!(frame.column_names().len(), INPUT_COLUMNS.len());
        let first = &frame.records()[0];
        assert_eq!(first.text(PLACES), Some("Benito Juárez"));
        assert_eq!(first.get(PRICE), Some(&Cell::Integer(2_500_000)));
        assert_eq!(first.number(PRICE_PER_M2), Some(25000.5));
        assert_eq!(first.text(LAT_LON), Some("19.37,-99.16"));
        assert_eq!(frame.records()[1].get(PRICE_PER_M2), Some(&Cell::Null));
    }

    #[test]
    fn missing_input_column_is_named() {
        let file = write_csv("property_type,places,price\nhouse,Tlalpan,1\n");
        let err = load_file(file.path()).unwrap_err();
        let data_err = err.downcast_ref::<DataError>().unwrap();
        assert_eq!(data_err, &DataError::missing(CURRENCY, Stage::Load));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("opening CSV"));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("listings.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn guesses_cell_types_like_pandas() {
        assert_eq!(guess_cell_type(""), Cell::Null);
        assert_eq!(guess_cell_type("NaN"), Cell::Null);
        for marker in ["NA", "N/A", "null", "None", "-nan", "<NA>", " #N/A "] {
            assert_eq!(guess_cell_type(marker), Cell::Null, "{marker}");
        }
        assert_eq!(guess_cell_type("Nada"), Cell::Text("Nada".into()));
        assert_eq!(guess_cell_type("42"), Cell::Integer(42));
        assert_eq!(guess_cell_type("4.5"), Cell::Float(4.5));
        assert_eq!(guess_cell_type("true"), Cell::Bool(true));
        assert_eq!(guess_cell_type("MXN"), Cell::Text("MXN".into()));
    }

    #[test]
    fn loads_parquet_listings() {
        let text_cols = [PROPERTY_TYPE, PLACES, CURRENCY, LAT_LON];
        let fields: Vec<Field> = INPUT_COLUMNS
            .iter()
            .map(|name| {
                let dtype = if text_cols.contains(name) {
                    DataType::Utf8
                } else {
                    DataType::Float64
                };
                Field::new(*name, dtype, true)
            })
            .collect();
        let schema = Arc::new(Schema::new(fields));
        let columns: Vec<Arc<dyn Array>> = INPUT_COLUMNS
            .iter()
            .map(|name| -> Arc<dyn Array> {
                if text_cols.contains(name) {
                    Arc::new(StringArray::from(vec![Some("x"), None]))
                } else {
                    Arc::new(Float64Array::from(vec![Some(1.5), None]))
                }
            })
            .collect();
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let file = tempfile::Builder::new()
            .suffix(".parquet")
            .tempfile()
            .unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let frame = load_file(file.path()).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.records()[0].number(PRICE), Some(1.5));
        assert_eq!(frame.records()[0].text(PLACES), Some("x"));
        assert_eq!(frame.records()[1].get(PRICE), Some(&Cell::Null));
    }
}
