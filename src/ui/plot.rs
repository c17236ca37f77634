use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Plot, Points};

use crate::chart::{
    format_currency, histogram_bins, CategoryMean, ChartData, ChartSpec, GroupedValue,
};
use crate::color::ColorMap;
use crate::state::AppState;

const BAR_COLOR: Color32 = Color32::from_rgb(99, 110, 250);

// ---------------------------------------------------------------------------
// Chart (central panel)
// ---------------------------------------------------------------------------

/// Render the current chart in the central panel.
pub fn chart_view(ui: &mut Ui, state: &AppState) {
    let chart = &state.chart;
    ui.heading(state.view.label());
    ui.label(RichText::new(&chart.title).weak());

    if chart.point_count() == 0 {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No hay propiedades para mostrar.");
        });
        return;
    }

    match &chart.data {
        ChartData::Histogram {
            values,
            bins,
            range,
        } => histogram(ui, chart, values, *bins, *range, state.color_map.as_ref()),
        ChartData::Bar { bars } => {
            bar_chart(ui, chart, bars);
            means_table(ui, chart, bars);
        }
        ChartData::Scatter { points } => scatter(ui, chart, points),
    }
}

fn histogram(
    ui: &mut Ui,
    chart: &ChartSpec,
    values: &[GroupedValue],
    bins: usize,
    range: Option<[f64; 2]>,
    color_map: Option<&ColorMap>,
) {
    let Some([lo, hi]) = range else {
        return;
    };
    let bins = histogram_bins(values, [lo, hi], bins);
    let width = bins.first().map_or(1.0, |b| b.end - b.start);

    let fallback;
    let color_map = match color_map {
        Some(cm) => cm,
        None => {
            fallback = ColorMap::new(&values.iter().map(|v| v.group.clone()).collect());
            &fallback
        }
    };

    // One chart per group, each stacked on the ones before it.
    let mut charts: Vec<BarChart> = Vec::new();
    for (group, color) in color_map.entries() {
        let bars: Vec<Bar> = bins
            .iter()
            .map(|b| {
                let count = b.counts.get(group).copied().unwrap_or(0);
                Bar::new(b.center(), count as f64).width(width)
            })
            .collect();
        if bars.iter().all(|b| b.value == 0.0) {
            continue;
        }
        let stacked = {
            let below: Vec<&BarChart> = charts.iter().collect();
            BarChart::new(bars).name(group).color(color).stack_on(&below)
        };
        charts.push(stacked);
    }

    if let Some(legend) = chart.color {
        ui.label(RichText::new(legend.label).strong());
    }
    Plot::new("price_histogram")
        .legend(Legend::default())
        .x_axis_label(chart.x.label)
        .y_axis_label(chart.y.label)
        .x_axis_formatter(|mark, _| format_currency(mark.value))
        .include_x(lo)
        .include_x(hi)
        .include_y(0.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for bar_chart in charts {
                plot_ui.bar_chart(bar_chart);
            }
        });
}

fn bar_chart(ui: &mut Ui, chart: &ChartSpec, bars: &[CategoryMean]) {
    let names: Vec<String> = bars.iter().map(|b| b.category.clone()).collect();
    let plot_bars: Vec<Bar> = bars
        .iter()
        .enumerate()
        .map(|(i, b)| Bar::new(i as f64, b.mean).width(0.7).name(&b.category))
        .collect();
    let bar_chart = BarChart::new(plot_bars)
        .color(BAR_COLOR)
        .name(chart.y.label);

    Plot::new("mean_price_bars")
        .height(ui.available_height() * 0.65)
        .x_axis_label(chart.x.label)
        .y_axis_label(chart.y.label)
        .x_axis_formatter(move |mark, _| {
            let idx = mark.value.round();
            if idx < 0.0 || (mark.value - idx).abs() > 1e-6 {
                return String::new();
            }
            names.get(idx as usize).cloned().unwrap_or_default()
        })
        .y_axis_formatter(|mark, _| format_currency(mark.value))
        .include_y(0.0)
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(bar_chart);
        });
}

fn means_table(ui: &mut Ui, chart: &ChartSpec, bars: &[CategoryMean]) {
    ui.separator();
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(160.0))
        .column(Column::auto().at_least(140.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong(chart.x.label);
            });
            header.col(|ui| {
                ui.strong(chart.y.label);
            });
            header.col(|ui| {
                ui.strong("Propiedades");
            });
        })
        .body(|mut body| {
            for bar in bars {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&bar.category);
                    });
                    row.col(|ui| {
                        ui.label(format_currency(bar.mean));
                    });
                    row.col(|ui| {
                        ui.label(bar.count.to_string());
                    });
                });
            }
        });
}

fn scatter(ui: &mut Ui, chart: &ChartSpec, points: &[[f64; 2]]) {
    let series = Points::new(points.to_vec())
        .radius(2.5)
        .color(BAR_COLOR)
        .name(chart.y.label);

    let mut plot = Plot::new("surface_scatter")
        .x_axis_label(chart.x.label)
        .y_axis_label(chart.y.label)
        .y_axis_formatter(|mark, _| format_currency(mark.value))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    if let Some([w, h]) = chart.size {
        plot = plot.width(w).height(h);
    }
    plot.show(ui, |plot_ui| {
        plot_ui.points(series);
    });
}
