use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot};

use crate::outlier::stats;
use crate::outlier::{ColumnReport, Summary};

const BEFORE_COLOR: Color32 = Color32::LIGHT_BLUE;
const AFTER_COLOR: Color32 = Color32::from_rgb(80, 180, 90);
const HISTOGRAM_BINS: usize = 30;

// ---------------------------------------------------------------------------
// Histogram / box statistics
// ---------------------------------------------------------------------------

/// One histogram bin: `[start, start + width)`, the last bin closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub width: f64,
    pub count: usize,
}

/// Equal-width histogram of the non-missing values.
pub fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    let lo = stats::min(values);
    let hi = stats::max(values);
    if bins == 0 || lo.is_nan() {
        return Vec::new();
    }
    if lo == hi {
        return vec![Bin {
            start: lo - 0.5,
            width: 1.0,
            count: stats::count(values),
        }];
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in values.iter().filter(|v| !v.is_nan()) {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: lo + i as f64 * width,
            width,
            count,
        })
        .collect()
}

/// Tukey box: whiskers reach the most extreme values inside 1.5 IQR.
pub fn box_spread(values: &[f64], summary: &Summary) -> BoxSpread {
    let iqr = summary.q75 - summary.q25;
    let lower_fence = summary.q25 - 1.5 * iqr;
    let upper_fence = summary.q75 + 1.5 * iqr;
    let inside: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| *v >= lower_fence && *v <= upper_fence)
        .collect();
    BoxSpread::new(
        stats::min(&inside),
        summary.q25,
        summary.median,
        summary.q75,
        stats::max(&inside),
    )
}

// ---------------------------------------------------------------------------
// Per-column plots
// ---------------------------------------------------------------------------

fn histogram_chart(values: &[f64], name: &str, color: Color32) -> BarChart {
    let bars = histogram(values, HISTOGRAM_BINS)
        .into_iter()
        .map(|bin| Bar::new(bin.start + bin.width / 2.0, bin.count as f64).width(bin.width))
        .collect();
    BarChart::new(bars).name(name).color(color)
}

/// Distribution before and after cleaning, side by side.
pub fn distribution_plots(ui: &mut Ui, report: &ColumnReport) {
    ui.columns(2, |cols| {
        let [left, right] = cols else {
            return;
        };
        for (ui, values, title, color) in [
            (left, &report.before_values, "before", BEFORE_COLOR),
            (right, &report.after_values, "after", AFTER_COLOR),
        ] {
            ui.label(format!("Distribution {title} cleaning"));
            Plot::new(format!("hist_{}_{title}", report.column))
                .height(180.0)
                .allow_scroll(false)
                .y_axis_label("count")
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(histogram_chart(values, title, color));
                });
        }
    });
}

/// Box-plot comparison of the original and cleaned column.
pub fn box_plot(ui: &mut Ui, report: &ColumnReport) {
    let boxes = vec![
        BoxElem::new(0.0, box_spread(&report.before_values, &report.before))
            .name("original")
            .fill(BEFORE_COLOR.gamma_multiply(0.4))
            .stroke((1.5, BEFORE_COLOR)),
        BoxElem::new(1.0, box_spread(&report.after_values, &report.after))
            .name("cleaned")
            .fill(AFTER_COLOR.gamma_multiply(0.4))
            .stroke((1.5, AFTER_COLOR)),
    ];

    Plot::new(format!("box_{}", report.column))
        .height(220.0)
        .legend(Legend::default())
        .allow_scroll(false)
        .show_x(false)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(boxes).name(&report.column));
        });
}
