use std::collections::BTreeSet;

use super::currency::ExchangeRate;
use super::error::{DataError, Stage};
use super::model::{Frame, Record};
use super::outlier::FilterStep;
use super::schema::{PLACES, PRICE, PRICE_PER_M2, PROPERTY_TYPE, SURFACE_TOTAL};

/// Label shown for a listing without a category value.
pub const MISSING_LABEL: &str = "Sin dato";

// ---------------------------------------------------------------------------
// Listing – one cleaned row
// ---------------------------------------------------------------------------

/// A listing after cleaning. Prices are in local currency.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub property_type: String,
    pub place: String,
    pub price: f64,
    pub price_per_m2: f64,
    pub surface_total_m2: f64,
}

impl Listing {
    fn from_record(record: &Record) -> Option<Self> {
        let label = |column: &str| {
            record
                .get(column)
                .filter(|c| !c.is_null())
                .map_or_else(|| MISSING_LABEL.to_string(), |c| c.to_string())
        };
        Some(Listing {
            property_type: label(PROPERTY_TYPE),
            place: label(PLACES),
            price: record.number(PRICE)?,
            price_per_m2: record.number(PRICE_PER_M2)?,
            surface_total_m2: record.number(SURFACE_TOTAL)?,
        })
    }
}

// ---------------------------------------------------------------------------
// PipelineReport – what the cleaning did
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineReport {
    pub rows_loaded: usize,
    pub exchange_rate: Option<ExchangeRate>,
    pub rows_converted: usize,
    pub filter_steps: Vec<FilterStep>,
    /// Rows that survived filtering but lack a numeric price.
    pub rows_without_price: usize,
}

// ---------------------------------------------------------------------------
// CleanTable – the immutable result of the pipeline
// ---------------------------------------------------------------------------

/// The cleaned listings. Built once, then only read.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanTable {
    listings: Vec<Listing>,
    column_names: Vec<String>,
    report: PipelineReport,
}

impl CleanTable {
    /// Turn the final frame into typed listings.
    pub fn from_frame(frame: Frame, mut report: PipelineReport) -> Result<Self, DataError> {
        frame.require_columns(
            &[PROPERTY_TYPE, PLACES, PRICE, PRICE_PER_M2, SURFACE_TOTAL],
            Stage::Build,
        )?;

        let listings: Vec<Listing> = frame
            .records()
            .iter()
            .filter_map(Listing::from_record)
            .collect();
        report.rows_without_price = frame.len() - listings.len();
        if report.rows_without_price > 0 {
            log::warn!(
                "{} listings have no price and are left out",
                report.rows_without_price
            );
        }

        Ok(CleanTable {
            listings,
            column_names: frame.column_names().to_vec(),
            report,
        })
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn report(&self) -> &PipelineReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Observed `(min, max)` price, `None` for an empty table.
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        self.listings.iter().map(|l| l.price).fold(None, |acc, p| {
            Some(match acc {
                None => (p, p),
                Some((lo, hi)) => (f64::min(lo, p), f64::max(hi, p)),
            })
        })
    }

    pub fn property_types(&self) -> BTreeSet<String> {
        self.listings
            .iter()
            .map(|l| l.property_type.clone())
            .collect()
    }

    pub fn places(&self) -> BTreeSet<String> {
        self.listings.iter().map(|l| l.place.clone()).collect()
    }
}
