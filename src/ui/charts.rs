use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Line chart – one connected series per country
// ---------------------------------------------------------------------------

pub fn line_chart(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        empty_hint(ui);
        return;
    }

    let y_label = state.selection.indicator.clone().unwrap_or_default();

    Plot::new("line_chart")
        .legend(Legend::default())
        .x_axis_label("year")
        .y_axis_label(y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &state.views.line {
                let points: PlotPoints = series.points.clone().into();
                let line = Line::new(points)
                    .name(&series.country)
                    .color(state.country_colors.get(&series.country))
                    .width(2.0);
                plot_ui.line(line);
            }
        });
}

// ---------------------------------------------------------------------------
// Bar chart – the same relation, grouped bars per year
// ---------------------------------------------------------------------------

pub fn bar_chart(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        empty_hint(ui);
        return;
    }

    let y_label = state.selection.indicator.clone().unwrap_or_default();
    let n_series = state.views.bar.len().max(1);
    // Bars for one year share a 0.8-wide group, one slot per country.
    let bar_width = 0.8 / n_series as f64;

    Plot::new("bar_chart")
        .legend(Legend::default())
        .x_axis_label("year")
        .y_axis_label(y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (i, series) in state.views.bar.iter().enumerate() {
                let offset = (i as f64 - (n_series as f64 - 1.0) / 2.0) * bar_width;
                let color = state.country_colors.get(&series.country);
                let bars: Vec<Bar> = series
                    .points
                    .iter()
                    .map(|p| Bar::new(p[0] + offset, p[1]).width(bar_width).fill(color))
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).color(color).name(&series.country));
            }
        });
}

fn empty_hint(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading("Open a dataset to view charts  (File → Open…)");
    });
}
