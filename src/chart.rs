use std::collections::BTreeMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Declarative chart description handed to the plotting surface
// ---------------------------------------------------------------------------

/// An internal field name and the label shown for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldBinding {
    pub field: &'static str,
    pub label: &'static str,
}

impl FieldBinding {
    pub const fn new(field: &'static str, label: &'static str) -> Self {
        Self { field, label }
    }
}

/// One histogram observation and the group it is coloured by.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedValue {
    pub group: String,
    pub value: f64,
}

/// One bar of an aggregation view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMean {
    pub category: String,
    pub mean: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartData {
    Histogram {
        values: Vec<GroupedValue>,
        bins: usize,
        /// Displayed x range; the selected price interval.
        range: Option<[f64; 2]>,
    },
    Bar {
        bars: Vec<CategoryMean>,
    },
    Scatter {
        points: Vec<[f64; 2]>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x: FieldBinding,
    pub y: FieldBinding,
    /// Colour split and legend title.
    pub color: Option<FieldBinding>,
    pub data: ChartData,
    /// Fixed plot size in pixels.
    pub size: Option<[f32; 2]>,
}

impl ChartSpec {
    /// Number of data points carried by the chart.
    pub fn point_count(&self) -> usize {
        match &self.data {
            ChartData::Histogram { values, .. } => values.len(),
            ChartData::Bar { bars } => bars.len(),
            ChartData::Scatter { points } => points.len(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ---------------------------------------------------------------------------
// Histogram binning
// ---------------------------------------------------------------------------

/// One histogram bin with a count per colour group.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub counts: BTreeMap<String, usize>,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// Split `[lo, hi]` into `bins` equal bins and count values per group.
/// The last bin is closed on the right; values outside the range are ignored.
pub fn histogram_bins(values: &[GroupedValue], range: [f64; 2], bins: usize) -> Vec<HistogramBin> {
    let [lo, hi] = range;
    if bins == 0 || lo.is_nan() || hi.is_nan() || lo > hi {
        return Vec::new();
    }
    let bins = if hi == lo { 1 } else { bins };
    let width = if hi == lo { 1.0 } else { (hi - lo) / bins as f64 };

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: lo + i as f64 * width,
            end: if i + 1 == bins { hi.max(lo + width) } else { lo + (i + 1) as f64 * width },
            counts: BTreeMap::new(),
        })
        .collect();

    for v in values.iter().filter(|v| v.value >= lo && v.value <= hi) {
        let idx = (((v.value - lo) / width) as usize).min(bins - 1);
        *out[idx].counts.entry(v.group.clone()).or_default() += 1;
    }
    out
}

/// `$1,234,567` style rendering of a currency amount, rounded to units.
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gv(group: &str, value: f64) -> GroupedValue {
        GroupedValue {
            group: group.into(),
            value,
        }
    }

    #[test]
    fn bins_count_per_group() {
        let values = [gv("a", 0.0), gv("a", 4.9), gv("b", 5.0), gv("b", 10.0), gv("b", 11.0)];
        let bins = histogram_bins(&values, [0.0, 10.0], 2);

        assert_eq!(bins.len(), 2);
        assert_eq!((bins[0].start, bins[0].end), (0.0, 5.0));
        assert_eq!(bins[0].counts.get("a"), Some(&2));
        assert_eq!(bins[1].counts.get("b"), Some(&2));
        let counted: usize = bins.iter().flat_map(|b| b.counts.values()).sum();
        assert_eq!(counted, 4);
        assert_eq!(bins[1].center(), 7.5);
    }

    #[test]
    fn degenerate_range_is_one_bin() {
        let bins = histogram_bins(&[gv("a", 3.0), gv("a", 4.0)], [3.0, 3.0], 50);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].counts.get("a"), Some(&1));
        assert!(histogram_bins(&[], [4.0, 3.0], 50).is_empty());
        assert!(histogram_bins(&[gv("a", 1.0)], [f64::NAN, 3.0], 50).is_empty());
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.0), "$999");
        assert_eq!(format_currency(1000.0), "$1,000");
        assert_eq!(format_currency(2_500_000.4), "$2,500,000");
        assert_eq!(format_currency(-12_345.0), "-$12,345");
    }

    #[test]
    fn json_description_is_tagged_by_kind() {
        let spec = ChartSpec {
            title: "t".into(),
            x: FieldBinding::new("price", "Precio (MXN)"),
            y: FieldBinding::new("count", "Cantidad de Propiedades"),
            color: None,
            data: ChartData::Scatter {
                points: vec![[1.0, 2.0]],
            },
            size: None,
        };
        let json: serde_json::Value = serde_json::from_str(&spec.to_json().unwrap()).unwrap();
        assert_eq!(json["data"]["kind"], "scatter");
        assert_eq!(json["x"]["label"], "Precio (MXN)");
    }
}
