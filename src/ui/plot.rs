use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, HLine, Legend, Line, LineStyle, Plot, PlotPoints};

use crate::color::{generate_palette, indicator_color};
use crate::data::model::Indicator;
use crate::data::summary::CoordinatorRollup;
use crate::state::{PerformanceState, PerformanceView};
use crate::text::NGramEntry;

// ---------------------------------------------------------------------------
// Weekly evolution (performance tab)
// ---------------------------------------------------------------------------

/// One line per operator/machine pair plus the overall mean as a dashed rule.
pub fn evolution_plot(ui: &mut Ui, perf: &PerformanceState, view: &PerformanceView) {
    let indicator = view.spec.indicator;
    let mean = view.summary.headline.mean;

    Plot::new("evolution_plot")
        .legend(Legend::default())
        .height(320.0)
        .x_axis_label("Week")
        .y_axis_label(indicator.meta().display_name)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &view.series {
                let color = perf
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(&series.operator))
                    .unwrap_or(Color32::LIGHT_BLUE);

                let points: PlotPoints = series
                    .points
                    .iter()
                    .map(|&(week, value)| [f64::from(week), value])
                    .collect();

                let line = Line::new(points)
                    .name(format!("{} - {}", series.operator, series.machine))
                    .color(color)
                    .width(2.0);

                plot_ui.line(line);
            }

            plot_ui.hline(
                HLine::new(mean)
                    .name(format!("Promedio General: {mean:.2}"))
                    .color(Color32::RED)
                    .style(LineStyle::dashed_loose()),
            );
        });
}

// ---------------------------------------------------------------------------
// Coordinator comparison
// ---------------------------------------------------------------------------

/// Mean per coordinator with a ±1 standard deviation whisker.
pub fn coordinator_chart(ui: &mut Ui, rollup: &[CoordinatorRollup]) {
    let palette = generate_palette(rollup.len());
    let bars: Vec<Bar> = rollup
        .iter()
        .zip(palette)
        .enumerate()
        .map(|(i, (row, color))| {
            Bar::new(i as f64, row.mean)
                .name(&row.coordinator)
                .fill(color)
        })
        .collect();

    Plot::new("coordinator_chart")
        .legend(Legend::default())
        .height(260.0)
        .y_axis_label("Promedio")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Promedio").width(0.6));
            for (i, row) in rollup.iter().enumerate() {
                let x = i as f64;
                let whisker = PlotPoints::new(vec![
                    [x, row.mean - row.stddev],
                    [x, row.mean + row.stddev],
                ]);
                plot_ui.line(Line::new(whisker).color(Color32::DARK_GRAY).width(1.5));
            }
        });
}

// ---------------------------------------------------------------------------
// N-gram frequencies (survey tab)
// ---------------------------------------------------------------------------

/// Horizontal bars, most frequent on top.
pub fn ngram_chart(ui: &mut Ui, id: &str, entries: &[NGramEntry], color: Color32) {
    let n = entries.len();
    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| Bar::new((n - i) as f64, entry.frequency as f64).name(entry.text()))
        .collect();

    Plot::new(id)
        .height(300.0)
        .x_axis_label("Frecuencia")
        .show_axes([true, false])
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().color(color));
        });
}

/// Chart colour for an n-gram size, reusing the indicator palette.
pub fn ngram_color(n: usize) -> Color32 {
    let cycle = [Indicator::StrategicPr, Indicator::RejectRate, Indicator::Updt, Indicator::Mtbf];
    indicator_color(cycle[n % cycle.len()])
}
