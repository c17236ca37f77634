use std::path::Path;

use crate::chart::ChartSpec;
use crate::color::ColorMap;
use crate::config::Settings;
use crate::data::pipeline::load_and_prepare;
use crate::data::table::CleanTable;
use crate::render::{render, PriceRange};
use crate::view::{ViewError, ViewKind};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Cleaned listings. Replaced wholesale on reload, never edited.
    pub table: CleanTable,

    pub settings: Settings,

    /// Currently selected view.
    pub view: ViewKind,

    /// Slider interval of the histogram views.
    pub price_range: Option<PriceRange>,

    /// Chart for the current selection, rebuilt on every interaction.
    pub chart: ChartSpec,

    /// Colours of the current chart's colour split.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(table: CleanTable, settings: Settings) -> Self {
        let view = settings.initial_view;
        let price_range = PriceRange::full(&table);
        let chart = render(view, &table, price_range);
        let color_map = color_map_for(view, &table);
        Self {
            table,
            settings,
            view,
            price_range,
            chart,
            color_map,
            status_message: None,
        }
    }

    /// Re-render the current view from the table.
    pub fn refresh(&mut self) {
        self.chart = render(self.view, &self.table, self.price_range);
        self.color_map = color_map_for(self.view, &self.table);
    }

    /// Switch view. The price range starts over at the full observed range.
    pub fn select_view(&mut self, view: ViewKind) {
        self.view = view;
        self.price_range = PriceRange::full(&self.table);
        self.refresh();
    }

    /// Apply a slider interval. Invalid intervals are rejected and leave the
    /// current range in place.
    pub fn set_price_range(&mut self, low: f64, high: f64) -> Result<(), ViewError> {
        let range = PriceRange::new(low, high).inspect_err(|e| {
            log::warn!("rejected price range: {e}");
        })?;
        self.price_range = Some(match PriceRange::full(&self.table) {
            Some(bounds) => range.clamp_to(bounds),
            None => range,
        });
        self.refresh();
        Ok(())
    }

    /// Swap in a freshly cleaned table.
    pub fn set_table(&mut self, table: CleanTable) {
        self.table = table;
        self.price_range = PriceRange::full(&self.table);
        self.status_message = None;
        self.refresh();
    }

    /// Run the full pipeline on `path`. On failure the current table stays.
    pub fn reload(&mut self, path: &Path) {
        match load_and_prepare(path, &self.settings.pipeline) {
            Ok(table) => {
                log::info!("reloaded {} listings from {}", table.len(), path.display());
                self.settings.data_path = path.to_path_buf();
                self.set_table(table);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn color_map_for(view: ViewKind, table: &CleanTable) -> Option<ColorMap> {
    match view {
        ViewKind::PriceByTypeHistogram => Some(ColorMap::new(&table.property_types())),
        ViewKind::PriceByPlaceHistogram => Some(ColorMap::new(&table.places())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartData;
    use crate::data::model::{Cell, Frame};
    use crate::data::schema::*;
    use crate::data::table::PipelineReport;

    fn table(prices: &[f64]) -> CleanTable {
        let frame = Frame::from_rows(
            [PROPERTY_TYPE, PLACES, PRICE, PRICE_PER_M2, SURFACE_TOTAL]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            prices
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    vec![
                        Cell::Text(if i % 2 == 0 { "house" } else { "apartment" }.into()),
                        Cell::Text("Tlalpan".into()),
                        Cell::Float(*p),
                        Cell::Float(p / 100.0),
                        Cell::Float(100.0),
                    ]
                })
                .collect(),
        );
        CleanTable::from_frame(frame, PipelineReport::default()).unwrap()
    }

    fn state() -> AppState {
        AppState::new(table(&[1_000.0, 2_000.0, 3_000.0, 4_000.0]), Settings::default())
    }

    #[test]
    fn starts_on_the_first_view_with_the_full_range() {
        let state = state();
        assert_eq!(state.view, ViewKind::PriceByTypeHistogram);
        assert_eq!(state.price_range, PriceRange::new(1_000.0, 4_000.0).ok());
        assert_eq!(state.chart.point_count(), 4);
        assert!(state.color_map.is_some());
    }

    #[test]
    fn narrowing_the_range_rerenders() {
        let mut state = state();
        state.set_price_range(1_500.0, 3_000.0).unwrap();
        assert_eq!(state.chart.point_count(), 2);
    }

    #[test]
    fn invalid_range_keeps_the_previous_one() {
        let mut state = state();
        state.set_price_range(2_000.0, 4_000.0).unwrap();
        let err = state.set_price_range(3_000.0, 1_000.0).unwrap_err();
        assert!(matches!(err, ViewError::InvalidRange { .. }));
        assert_eq!(state.price_range, PriceRange::new(2_000.0, 4_000.0).ok());
        assert_eq!(state.chart.point_count(), 3);
    }

    #[test]
    fn switching_view_resets_the_range() {
        let mut state = state();
        state.set_price_range(1_000.0, 1_000.0).unwrap();
        state.select_view(ViewKind::PriceByPlaceHistogram);
        assert_eq!(state.chart.point_count(), 4);

        state.select_view(ViewKind::MeanPriceByType);
        assert!(matches!(state.chart.data, ChartData::Bar { .. }));
        assert!(state.color_map.is_none());
    }

    #[test]
    fn starts_on_the_configured_view() {
        let settings = Settings {
            initial_view: ViewKind::SurfaceVsPricePerM2,
            ..Settings::default()
        };
        let state = AppState::new(table(&[1_000.0, 2_000.0]), settings);
        assert_eq!(state.view, ViewKind::SurfaceVsPricePerM2);
        assert!(matches!(state.chart.data, ChartData::Scatter { .. }));
        assert!(state.color_map.is_none());
    }

    #[test]
    fn failed_reload_keeps_the_table() {
        let mut state = state();
        state.reload(Path::new("missing.csv"));
        assert_eq!(state.table.len(), 4);
        assert!(state.status_message.is_some());
    }

    #[test]
    fn new_table_resets_range_and_status() {
        let mut state = state();
        state.status_message = Some("Error".into());
        state.set_table(table(&[10.0, 20.0]));
        assert_eq!(state.price_range, PriceRange::new(10.0, 20.0).ok());
        assert!(state.status_message.is_none());
        assert_eq!(state.chart.point_count(), 2);
    }
}
