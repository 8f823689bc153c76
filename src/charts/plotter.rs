//! Chart Plotter Module
//! Geographic scatter maps and monthly trend lines using egui_plot.

use crate::data::MonthLabel;
use crate::stats::{MapPoint, MapSummary, MonthlySeries};
use egui::{Color32, RichText};
use egui_plot::{Line, Plot, PlotPoints, Points};

/// Viridis colour stops, low to high.
pub const VIRIDIS: [Color32; 9] = [
    Color32::from_rgb(68, 1, 84),
    Color32::from_rgb(72, 40, 120),
    Color32::from_rgb(62, 73, 137),
    Color32::from_rgb(49, 104, 142),
    Color32::from_rgb(38, 130, 142),
    Color32::from_rgb(31, 158, 137),
    Color32::from_rgb(53, 183, 121),
    Color32::from_rgb(110, 206, 88),
    Color32::from_rgb(253, 231, 37),
];

/// Trend line colour
pub const LINE_COLOR: Color32 = Color32::from_rgb(99, 110, 250);

/// Number of colour bins used to draw a scatter map.
const COLOR_BINS: usize = 24;

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Position of `value` within `[min, max]`, clamped to `[0, 1]`.
    /// A degenerate range maps everything to the middle.
    pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
        if !(max > min) {
            return 0.5;
        }
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    }

    /// Viridis colour at `t` in `[0, 1]`.
    pub fn viridis(t: f64) -> Color32 {
        let t = t.clamp(0.0, 1.0);
        let scaled = t * (VIRIDIS.len() - 1) as f64;
        let idx = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
        let frac = (scaled - idx as f64) as f32;

        let a = VIRIDIS[idx];
        let b = VIRIDIS[idx + 1];
        let lerp = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * frac).round() as u8;
        Color32::from_rgb(lerp(a.r(), b.r()), lerp(a.g(), b.g()), lerp(a.b(), b.b()))
    }

    /// Group map points into colour bins so each bin is drawn once.
    ///
    /// Returns (colour, [longitude, latitude] points) for non-empty bins.
    pub fn bin_points(summary: &MapSummary, bins: usize) -> Vec<(Color32, Vec<[f64; 2]>)> {
        let bins = bins.max(1);
        let mut binned: Vec<Vec<[f64; 2]>> = vec![Vec::new(); bins];

        for p in &summary.points {
            let t = Self::normalize(p.value, summary.min, summary.max);
            let idx = ((t * bins as f64) as usize).min(bins - 1);
            binned[idx].push([p.longitude, p.latitude]);
        }

        binned
            .into_iter()
            .enumerate()
            .filter(|(_, pts)| !pts.is_empty())
            .map(|(idx, pts)| {
                let t = if bins > 1 {
                    idx as f64 / (bins - 1) as f64
                } else {
                    0.5
                };
                (Self::viridis(t), pts)
            })
            .collect()
    }

    /// Value of the map point closest to (`longitude`, `latitude`).
    pub fn nearest_value(points: &[MapPoint], longitude: f64, latitude: f64) -> Option<f64> {
        points
            .iter()
            .map(|p| {
                let d = (p.longitude - longitude).powi(2) + (p.latitude - latitude).powi(2);
                (d, p.value)
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, value)| value)
    }

    /// Draw a geographic scatter (longitude x latitude) coloured by value.
    pub fn draw_scatter_map(ui: &mut egui::Ui, id: &str, summary: &MapSummary, height: f32) {
        ui.label(RichText::new(summary.title()).size(14.0).strong());
        ui.add_space(4.0);

        let bins = Self::bin_points(summary, COLOR_BINS);
        let points = summary.points.clone();

        Plot::new(id)
            .height(height)
            .data_aspect(1.0)
            .x_axis_label("Longitude")
            .y_axis_label("Latitude")
            .label_formatter(move |_name, value| {
                match Self::nearest_value(&points, value.x, value.y) {
                    Some(tonnes) => format!(
                        "lon {:.3}\nlat {:.3}\n{:.2} tonnes",
                        value.x, value.y, tonnes
                    ),
                    None => format!("lon {:.3}\nlat {:.3}", value.x, value.y),
                }
            })
            .show(ui, |plot_ui| {
                for (color, pts) in bins {
                    plot_ui.points(
                        Points::new(PlotPoints::from(pts))
                            .radius(4.0)
                            .filled(true)
                            .color(color),
                    );
                }
            });

        ui.add_space(4.0);
        Self::draw_color_bar(ui, summary.min, summary.midpoint(), summary.max);
    }

    /// Horizontal Viridis colour bar with min, midpoint and max labels.
    pub fn draw_color_bar(ui: &mut egui::Ui, min: f64, mid: f64, max: f64) {
        ui.label(RichText::new("Methane in Tonnes ").size(12.0));

        let width = ui.available_width().min(360.0);
        let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 14.0), egui::Sense::hover());
        let steps = 64;
        for i in 0..steps {
            let x0 = rect.left() + rect.width() * i as f32 / steps as f32;
            let x1 = rect.left() + rect.width() * (i + 1) as f32 / steps as f32;
            let segment = egui::Rect::from_min_max(egui::pos2(x0, rect.top()), egui::pos2(x1, rect.bottom()));
            ui.painter()
                .rect_filled(segment, 0.0, Self::viridis(i as f64 / (steps - 1) as f64));
        }

        ui.horizontal(|ui| {
            ui.set_width(width);
            ui.label(RichText::new(format!("{:.2}", min)).size(11.0));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new(format!("{:.2}", max)).size(11.0));
                ui.add_space((width / 2.0 - 60.0).max(0.0));
                ui.label(RichText::new(format!("{:.2}", mid)).size(11.0));
            });
        });
    }

    /// Split a series into line runs, breaking at months whose mean is NaN.
    ///
    /// Points are (month number, mean). Months without a column are not in
    /// the series at all, so their neighbours stay joined.
    pub fn line_segments(series: &MonthlySeries) -> Vec<Vec<[f64; 2]>> {
        let mut segments = Vec::new();
        let mut current: Vec<[f64; 2]> = Vec::new();

        for p in &series.points {
            if p.mean.is_nan() {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                continue;
            }
            current.push([p.month.month() as f64, p.mean]);
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    /// Draw a monthly mean line chart; all-missing months break the line.
    pub fn draw_monthly_line(ui: &mut egui::Ui, id: &str, title: &str, series: &MonthlySeries, height: f32) {
        ui.label(RichText::new(title).size(14.0).strong());
        ui.add_space(4.0);

        if series.is_empty() {
            ui.label(
                RichText::new(format!("No monthly data for {}", series.year))
                    .color(Color32::GRAY),
            );
            return;
        }

        let segments = Self::line_segments(series);
        let year = series.year;

        Plot::new(id)
            .height(height)
            .x_axis_label("Month")
            .y_axis_label("Mean Methane Concentration")
            .include_x(1.0)
            .include_x(12.0)
            .allow_scroll(false)
            .x_axis_formatter(move |mark, _range| {
                let month = mark.value.round();
                if (mark.value - month).abs() < 1e-6 && (1.0..=12.0).contains(&month) {
                    MonthLabel::new(year, month as u32)
                        .map(|m| m.label())
                        .unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for segment in segments {
                    plot_ui.line(
                        Line::new(PlotPoints::from(segment.clone()))
                            .color(LINE_COLOR)
                            .width(2.0)
                            .name("Mean_Methane"),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from(segment))
                            .radius(3.0)
                            .color(LINE_COLOR),
                    );
                }
            });
    }
}
