use super::error::{DataError, Stage};
use super::model::{Cell, Frame, Record};
use super::schema::{CURRENCY, PRICE, PRICE_LOCAL, PRICE_PER_M2, PRICE_USD};

/// Exchange rate implied by the paired local/foreign price columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeRate {
    /// Local currency units per foreign unit.
    pub rate: f64,
    /// Rows that contributed a ratio.
    pub samples: usize,
    /// Rows left out because the pair was missing, zero or non-finite.
    pub skipped: usize,
}

/// Mean of `local / foreign` over rows with a usable pair.
///
/// Returns `Ok(None)` when no row yields a finite ratio.
pub fn exchange_rate(frame: &Frame) -> Result<Option<ExchangeRate>, DataError> {
    frame.require_columns(&[PRICE_LOCAL, PRICE_USD], Stage::Normalize)?;

    let mut sum = 0.0;
    let mut samples = 0;
    for record in frame.records() {
        if let Some(ratio) = pair_ratio(record) {
            sum += ratio;
            samples += 1;
        }
    }
    let skipped = frame.len() - samples;

    if samples == 0 {
        return Ok(None);
    }
    Ok(Some(ExchangeRate {
        rate: sum / samples as f64,
        samples,
        skipped,
    }))
}

fn pair_ratio(record: &Record) -> Option<f64> {
    let local = record.number(PRICE_LOCAL)?;
    let foreign = record.number(PRICE_USD)?;
    let ratio = local / foreign;
    (foreign != 0.0 && ratio.is_finite()).then_some(ratio)
}

/// Result of [`normalize_currency`].
#[derive(Debug, Clone)]
pub struct Normalized {
    pub frame: Frame,
    pub rate: Option<ExchangeRate>,
    /// Rows whose prices were multiplied by the rate.
    pub converted: usize,
}

/// Express `price` and `price_per_m2` in `local_currency` for every row.
///
/// Rows flagged with any other currency (or no flag at all) are multiplied
/// by the derived exchange rate. Local rows are left untouched.
pub fn normalize_currency(mut frame: Frame, local_currency: &str) -> Result<Normalized, DataError> {
    frame.require_columns(&[CURRENCY, PRICE, PRICE_PER_M2], Stage::Normalize)?;
    let rate = exchange_rate(&frame)?;

    let foreign_rows = frame
        .records()
        .iter()
        .filter(|r| !is_local(r, local_currency))
        .count();
    if foreign_rows == 0 {
        return Ok(Normalized {
            frame,
            rate,
            converted: 0,
        });
    }
    let Some(found) = rate else {
        return Err(DataError::NoExchangeRate { foreign_rows });
    };

    for record in frame.records_mut().iter_mut() {
        if is_local(record, local_currency) {
            continue;
        }
        scale(record, PRICE, found.rate);
        scale(record, PRICE_PER_M2, found.rate);
    }

    log::info!(
        "exchange rate {:.4} from {} rows ({} skipped), converted {foreign_rows} rows to {local_currency}",
        found.rate,
        found.samples,
        found.skipped
    );
    if found.skipped > 0 {
        log::warn!(
            "{} rows had no usable {PRICE_LOCAL}/{PRICE_USD} pair and were left out of the rate",
            found.skipped
        );
    }

    Ok(Normalized {
        frame,
        rate,
        converted: foreign_rows,
    })
}

fn is_local(record: &Record, local_currency: &str) -> bool {
    record.text(CURRENCY) == Some(local_currency)
}

/// Values that are not numbers stay as they are, exactly like on local rows;
/// later stages treat them as missing.
fn scale(record: &mut Record, column: &str, rate: f64) {
    if let Some(v) = record.number(column) {
        record.set(column, Cell::Float(v * rate));
    }
}
