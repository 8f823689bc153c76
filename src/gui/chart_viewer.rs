//! Chart Viewer Widget
//! Central scrollable panel with the district/state maps and monthly trends.

use crate::charts::ChartPlotter;
use crate::dashboard::DashboardView;
use crate::data::DateResolution;
use egui::{Color32, RichText, ScrollArea};

const CHART_SPACING: f32 = 15.0;
const MAP_HEIGHT: f32 = 380.0;
const LINE_HEIGHT: f32 = 260.0;
const CARD_BORDER: Color32 = Color32::from_rgb(100, 149, 237);

/// Displays the most recent dashboard view.
#[derive(Default)]
pub struct ChartViewer {
    view: Option<DashboardView>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.view = None;
    }

    pub fn set_view(&mut self, view: DashboardView) {
        self.view = Some(view);
    }

    /// Draw the maps side by side with the trend lines below them
    pub fn show(&self, ui: &mut egui::Ui) {
        let Some(view) = &self.view else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(
                    RichText::new(format!("Selected district: {}", view.selection.sheet_name))
                        .size(18.0)
                        .strong(),
                );
                ui.label(
                    RichText::new(format!(
                        "{} · {} rows in district, {} rows in state",
                        view.selection.file_name, view.district_rows, view.region_rows
                    ))
                    .size(12.0)
                    .color(Color32::GRAY),
                );
                if let (true, Some(active)) = (view.date.is_fallback(), &view.active_date) {
                    ui.label(
                        RichText::new(format!("Maps show {} instead of the selected month", active))
                            .size(12.0)
                            .color(Color32::from_rgb(255, 193, 7)),
                    );
                }
                ui.add_space(CHART_SPACING);

                match (&view.district_map, &view.region_map) {
                    (Some(district), Some(region)) => {
                        ui.columns(2, |cols| {
                            Self::card(&mut cols[0], |ui| {
                                ChartPlotter::draw_scatter_map(ui, "district_map", district, MAP_HEIGHT);
                            });
                            Self::card(&mut cols[1], |ui| {
                                ChartPlotter::draw_scatter_map(ui, "region_map", region, MAP_HEIGHT);
                            });
                        });
                    }
                    _ => {
                        Self::card(ui, |ui| {
                            let requested = match &view.date {
                                DateResolution::Fallback { requested, .. } => {
                                    requested.as_str()
                                }
                                DateResolution::Found(label) => label.as_str(),
                            };
                            ui.label(
                                RichText::new(format!(
                                    "⚠ {} is not available for {}. Please select another date.",
                                    requested, view.selection.sheet_name
                                ))
                                .size(14.0)
                                .color(Color32::from_rgb(220, 53, 69)),
                            );
                        });
                    }
                }

                ui.add_space(CHART_SPACING);

                Self::card(ui, |ui| {
                    ChartPlotter::draw_monthly_line(
                        ui,
                        "district_trend",
                        &view.district_trend_title(),
                        &view.district_series,
                        LINE_HEIGHT,
                    );
                });

                ui.add_space(CHART_SPACING);

                Self::card(ui, |ui| {
                    ChartPlotter::draw_monthly_line(
                        ui,
                        "region_trend",
                        &view.region_trend_title(),
                        &view.region_series,
                        LINE_HEIGHT,
                    );
                });
            });
    }

    fn card(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(2.0, CARD_BORDER))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                add_contents(ui);
            });
    }
}
