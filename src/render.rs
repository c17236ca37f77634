use std::collections::BTreeMap;

use crate::chart::{CategoryMean, ChartData, ChartSpec, FieldBinding, GroupedValue};
use crate::config::{HISTOGRAM_BINS, SCATTER_SIZE};
use crate::data::schema::{PLACES, PRICE, PRICE_PER_M2, PROPERTY_TYPE, SURFACE_TOTAL};
use crate::data::table::{CleanTable, Listing};
use crate::view::{ViewError, ViewKind};

const PRICE_AXIS: FieldBinding = FieldBinding::new(PRICE, "Precio (MXN)");
const MEAN_PRICE_AXIS: FieldBinding = FieldBinding::new("mean_price", "Precio Promedio (MXN)");
const COUNT_AXIS: FieldBinding = FieldBinding::new("count", "Cantidad de Propiedades");
const TYPE_AXIS: FieldBinding = FieldBinding::new(PROPERTY_TYPE, "Tipo de Vivienda");
const PLACE_AXIS: FieldBinding = FieldBinding::new(PLACES, "Delegación");
const SURFACE_AXIS: FieldBinding = FieldBinding::new(SURFACE_TOTAL, "Superficie Total (m²)");
const PRICE_PER_M2_AXIS: FieldBinding =
    FieldBinding::new(PRICE_PER_M2, "Precio por Metro Cuadrado (MXN)");

// ---------------------------------------------------------------------------
// PriceRange – the slider interval
// ---------------------------------------------------------------------------

/// Inclusive price interval with `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    low: f64,
    high: f64,
}

impl PriceRange {
    /// Rejects inverted or non-finite intervals.
    pub fn new(low: f64, high: f64) -> Result<Self, ViewError> {
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(ViewError::InvalidRange { low, high });
        }
        Ok(Self { low, high })
    }

    /// The table's observed price range, `None` when it is empty.
    pub fn full(table: &CleanTable) -> Option<Self> {
        table
            .price_bounds()
            .map(|(low, high)| Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.low && price <= self.high
    }

    /// Pull both ends inside `bounds`.
    pub fn clamp_to(self, bounds: PriceRange) -> Self {
        let low = self.low.clamp(bounds.low, bounds.high);
        let high = self.high.clamp(bounds.low, bounds.high);
        Self { low, high }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Build the chart for `view` from the cleaned table.
///
/// `range` only affects the histogram views; `None` means the full observed
/// price range. A range reaching outside the observed prices is clamped.
pub fn render(view: ViewKind, table: &CleanTable, range: Option<PriceRange>) -> ChartSpec {
    let title = format!("{} en CDMX", view.label());
    match view {
        ViewKind::PriceByTypeHistogram => {
            price_histogram(title, table, range, TYPE_AXIS, |l| &l.property_type)
        }
        ViewKind::MeanPriceByType => mean_price_bars(title, table, TYPE_AXIS, |l| &l.property_type),
        ViewKind::MeanPriceByPlace => mean_price_bars(title, table, PLACE_AXIS, |l| &l.place),
        ViewKind::PriceByPlaceHistogram => {
            price_histogram(title, table, range, PLACE_AXIS, |l| &l.place)
        }
        ViewKind::SurfaceVsPrice => scatter(title, table, PRICE_AXIS, |l| l.price),
        ViewKind::SurfaceVsPricePerM2 => {
            scatter(title, table, PRICE_PER_M2_AXIS, |l| l.price_per_m2)
        }
    }
}

fn price_histogram(
    title: String,
    table: &CleanTable,
    range: Option<PriceRange>,
    color: FieldBinding,
    group: impl Fn(&Listing) -> &String,
) -> ChartSpec {
    let full = PriceRange::full(table);
    let range = match (range, full) {
        (Some(r), Some(bounds)) => Some(r.clamp_to(bounds)),
        _ => full,
    };
    let values = table
        .listings()
        .iter()
        .filter(|l| range.is_some_and(|r| r.contains(l.price)))
        .map(|l| GroupedValue {
            group: group(l).clone(),
            value: l.price,
        })
        .collect();

    ChartSpec {
        title,
        x: PRICE_AXIS,
        y: COUNT_AXIS,
        color: Some(color),
        data: ChartData::Histogram {
            values,
            bins: HISTOGRAM_BINS,
            range: range.map(|r| [r.low, r.high]),
        },
        size: None,
    }
}

/// Mean price per category, in ascending category order.
pub fn group_mean_price(
    table: &CleanTable,
    group: impl Fn(&Listing) -> &String,
) -> Vec<CategoryMean> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for listing in table.listings() {
        let entry = sums.entry(group(listing).as_str()).or_default();
        entry.0 += listing.price;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(category, (sum, count))| CategoryMean {
            category: category.to_string(),
            mean: sum / count as f64,
            count,
        })
        .collect()
}

fn mean_price_bars(
    title: String,
    table: &CleanTable,
    category: FieldBinding,
    group: impl Fn(&Listing) -> &String,
) -> ChartSpec {
    ChartSpec {
        title,
        x: category,
        y: MEAN_PRICE_AXIS,
        color: None,
        data: ChartData::Bar {
            bars: group_mean_price(table, group),
        },
        size: None,
    }
}

fn scatter(
    title: String,
    table: &CleanTable,
    y: FieldBinding,
    y_value: impl Fn(&Listing) -> f64,
) -> ChartSpec {
    let points = table
        .listings()
        .iter()
        .map(|l| [l.surface_total_m2, y_value(l)])
        .collect();
    ChartSpec {
        title,
        x: SURFACE_AXIS,
        y,
        color: None,
        data: ChartData::Scatter { points },
        size: Some(SCATTER_SIZE),
    }
}
