use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::chart::format_currency;
use crate::config::PRICE_STEP;
use crate::render::PriceRange;
use crate::state::AppState;
use crate::view::ViewKind;

// ---------------------------------------------------------------------------
// Left side panel – view menu and price range
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Gráficos");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.label("Selecciona el gráfico que deseas ver:");
            let mut selected = state.view;
            for view in ViewKind::ALL {
                ui.radio_value(&mut selected, view, view.label());
            }
            if selected != state.view {
                log::debug!("view {} selected", selected.id());
                state.select_view(selected);
            }

            if state.view.uses_price_range() {
                ui.separator();
                price_range_controls(ui, state);
            }

            ui.separator();
            cleaning_summary(ui, state);
        });
}

fn price_range_controls(ui: &mut Ui, state: &mut AppState) {
    let (Some(bounds), Some(current)) = (PriceRange::full(&state.table), state.price_range) else {
        ui.label("Sin precios para filtrar.");
        return;
    };

    ui.strong("Selecciona el rango de precios (MXN)");
    let mut low = current.low();
    let mut high = current.high();
    let span = bounds.low()..=bounds.high();

    let low_changed = ui
        .add(
            egui::Slider::new(&mut low, span.clone())
                .step_by(PRICE_STEP)
                .custom_formatter(|v, _| format_currency(v))
                .text("mínimo"),
        )
        .changed();
    let high_changed = ui
        .add(
            egui::Slider::new(&mut high, span)
                .step_by(PRICE_STEP)
                .custom_formatter(|v, _| format_currency(v))
                .text("máximo"),
        )
        .changed();

    // Keep the pair ordered by dragging the other end along.
    if low_changed && low > high {
        high = low;
    }
    if high_changed && high < low {
        low = high;
    }
    if low_changed || high_changed {
        if let Err(e) = state.set_price_range(low, high) {
            state.status_message = Some(format!("Error: {e}"));
        }
    }

    if ui.small_button("Rango completo").clicked() {
        state.select_view(state.view);
    }
}

fn cleaning_summary(ui: &mut Ui, state: &AppState) {
    let report = state.table.report();
    egui::CollapsingHeader::new(RichText::new("Limpieza de datos").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.label(format!("Filas leídas: {}", report.rows_loaded));
            match &report.exchange_rate {
                Some(rate) => ui.label(format!(
                    "Tipo de cambio: {:.4} ({} filas, {} descartadas)",
                    rate.rate, rate.samples, rate.skipped
                )),
                None => ui.label("Tipo de cambio: sin datos"),
            };
            ui.label(format!("Filas convertidas: {}", report.rows_converted));
            for step in &report.filter_steps {
                let bounds = step.bounds.map_or_else(
                    || "sin límites".to_string(),
                    |b| format!("[{:.2}, {:.2}]", b.lower, b.upper),
                );
                ui.label(format!(
                    "{}: {bounds}, {} → {} filas",
                    step.column, step.rows_before, step.rows_after
                ));
            }
            if report.rows_without_price > 0 {
                ui.label(format!("Sin precio: {}", report.rows_without_price));
            }
            ui.label(format!("Columnas: {}", state.table.column_names().join(", ")));
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Archivo", |ui: &mut Ui| {
            if ui.button("Abrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!("{} propiedades", state.table.len()));
        if let Some(rate) = &state.table.report().exchange_rate {
            ui.label(format!(
                "1 USD = {:.2} {}",
                rate.rate, state.settings.pipeline.local_currency
            ));
        }

        ui.separator();

        if ui.button("Copiar gráfico (JSON)").clicked() {
            match state.chart.to_json() {
                Ok(json) => ui.ctx().copy_text(json),
                Err(e) => {
                    log::error!("Failed to serialize chart: {e}");
                    state.status_message = Some(format!("Error: {e}"));
                }
            }
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Abrir datos de viviendas")
        .add_filter("Archivos soportados", &["csv", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.reload(&path);
    }
}
