//! Control Panel Widget
//! Left side panel with the results folder, selection and date controls.

use crate::config::DashboardConfig;
use crate::dashboard::DashboardRequest;
use crate::data::MonthLabel;
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// Current user choices
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UserSettings {
    pub region: String,
    pub file_index: usize,
    pub sheet: Option<String>,
    pub year: i32,
    pub month: u32,
    /// Only set after the user picks from the offered dates.
    pub fallback_date: Option<String>,
}

/// Left side control panel.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub results_dir: PathBuf,
    pub regions: Vec<String>,
    pub files: Vec<String>,
    pub sheets: Vec<String>,
    pub fallback_dates: Vec<String>,
    pub status: String,
    config: DashboardConfig,
}

impl ControlPanel {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            settings: UserSettings {
                year: config.first_month.year(),
                month: config.first_month.month(),
                ..UserSettings::default()
            },
            results_dir: config.results_dir.clone(),
            regions: Vec::new(),
            files: Vec::new(),
            sheets: Vec::new(),
            fallback_dates: Vec::new(),
            status: "Ready".to_string(),
            config: config.clone(),
        }
    }

    /// Keep the current region if it still exists, otherwise take the first.
    pub fn update_regions(&mut self, regions: Vec<String>) {
        if !regions.contains(&self.settings.region) {
            self.settings.region = regions.first().cloned().unwrap_or_default();
            self.settings.file_index = 0;
            self.settings.sheet = None;
            self.settings.fallback_date = None;
        }
        self.regions = regions;
    }

    pub fn update_files(&mut self, files: Vec<String>) {
        if self.settings.file_index >= files.len() {
            self.settings.file_index = 0;
        }
        self.files = files;
    }

    /// Keep the current sheet if the workbook still has it, otherwise the first.
    pub fn update_sheets(&mut self, sheets: Vec<String>) {
        let keep = self
            .settings
            .sheet
            .as_ref()
            .is_some_and(|s| sheets.contains(s));
        if !keep {
            self.settings.sheet = sheets.first().cloned();
        }
        self.sheets = sheets;
    }

    pub fn update_fallback_dates(&mut self, dates: Vec<String>) {
        if let Some(choice) = &self.settings.fallback_date {
            if !dates.contains(choice) {
                self.settings.fallback_date = None;
            }
        }
        self.fallback_dates = dates;
    }

    /// The chosen month, clamped to the configured range.
    pub fn month(&self) -> MonthLabel {
        let month = MonthLabel::new(self.settings.year, self.settings.month)
            .unwrap_or(MonthLabel::january(self.settings.year));
        self.config.clamp(month)
    }

    /// Select a new year/month; any earlier fallback pick no longer applies.
    pub fn select_month(&mut self, year: i32, month: u32) {
        let label = MonthLabel::new(year, month).unwrap_or(MonthLabel::january(year));
        let label = self.config.clamp(label);
        self.settings.year = label.year();
        self.settings.month = label.month();
        self.clear_fallback();
    }

    pub fn select_region(&mut self, region: &str) {
        self.settings.region = region.to_string();
        self.settings.file_index = 0;
        self.settings.sheet = None;
        self.clear_fallback();
    }

    pub fn select_file(&mut self, index: usize) {
        self.settings.file_index = index;
        self.settings.sheet = None;
        self.clear_fallback();
    }

    pub fn select_sheet(&mut self, sheet: &str) {
        self.settings.sheet = Some(sheet.to_string());
        self.clear_fallback();
    }

    fn clear_fallback(&mut self) {
        self.settings.fallback_date = None;
        self.fallback_dates.clear();
    }

    /// Request for the dashboard pipeline, `None` until a region is known.
    pub fn request(&self) -> Option<DashboardRequest> {
        if self.settings.region.is_empty() {
            return None;
        }
        Some(DashboardRequest {
            region: self.settings.region.clone(),
            file_index: self.settings.file_index,
            sheet: self.settings.sheet.clone(),
            month: self.month(),
            fallback_date: self.settings.fallback_date.clone(),
        })
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🛰 Methane Emission")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Calculation Dashboard")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Results Folder Section =====
        ui.label(RichText::new("📁 Results Folder").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self.results_dir.display().to_string();
                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.regions.is_empty() {
                            Color32::GRAY
                        } else {
                            Color32::WHITE
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseResults;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Selection Section =====
        ui.label(RichText::new("🗺 Location").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 90.0;
        let combo_width = 170.0;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Region:"));
            let mut picked = None;
            ComboBox::from_id_salt("region")
                .width(combo_width)
                .selected_text(&self.settings.region)
                .show_ui(ui, |ui| {
                    for region in &self.regions {
                        if ui
                            .selectable_label(self.settings.region == *region, region)
                            .clicked()
                            && self.settings.region != *region
                        {
                            picked = Some(region.clone());
                        }
                    }
                });
            if let Some(region) = picked {
                self.select_region(&region);
                action = ControlPanelAction::RegionChanged;
            }
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Select State:"));
            let selected = self
                .files
                .get(self.settings.file_index)
                .cloned()
                .unwrap_or_default();
            let mut picked = None;
            ComboBox::from_id_salt("state_file")
                .width(combo_width)
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for (idx, name) in self.files.iter().enumerate() {
                        if ui
                            .selectable_label(self.settings.file_index == idx, name)
                            .clicked()
                            && self.settings.file_index != idx
                        {
                            picked = Some(idx);
                        }
                    }
                });
            if let Some(idx) = picked {
                self.select_file(idx);
                action = ControlPanelAction::FileChanged;
            }
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("District:"));
            let selected = self.settings.sheet.clone().unwrap_or_default();
            let mut picked = None;
            ComboBox::from_id_salt("district_sheet")
                .width(combo_width)
                .selected_text(&selected)
                .show_ui(ui, |ui| {
                    for sheet in &self.sheets {
                        if ui.selectable_label(selected == *sheet, sheet).clicked()
                            && selected != *sheet
                        {
                            picked = Some(sheet.clone());
                        }
                    }
                });
            if let Some(sheet) = picked {
                self.select_sheet(&sheet);
                action = ControlPanelAction::SheetChanged;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Date Section =====
        ui.label(RichText::new("📅 Start month and year").size(14.0).strong());
        ui.add_space(8.0);

        let mut date_pick: Option<(i32, u32)> = None;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Year:"));
            ComboBox::from_id_salt("year")
                .width(combo_width)
                .selected_text(self.settings.year.to_string())
                .show_ui(ui, |ui| {
                    for year in self.config.years() {
                        if ui
                            .selectable_label(self.settings.year == year, year.to_string())
                            .clicked()
                            && self.settings.year != year
                        {
                            date_pick = Some((year, self.settings.month));
                        }
                    }
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Month:"));
            ComboBox::from_id_salt("month")
                .width(combo_width)
                .selected_text(self.month().month_name())
                .show_ui(ui, |ui| {
                    for month in self.config.months_in(self.settings.year) {
                        let Some(label) = MonthLabel::new(self.settings.year, month) else {
                            continue;
                        };
                        if ui
                            .selectable_label(self.settings.month == month, label.month_name())
                            .clicked()
                            && self.settings.month != month
                        {
                            date_pick = Some((self.settings.year, month));
                        }
                    }
                });
        });

        if let Some((year, month)) = date_pick {
            self.select_month(year, month);
            action = ControlPanelAction::DateChanged;
        }

        // Only offered when the chosen month is missing from the sheet
        if !self.fallback_dates.is_empty() {
            ui.add_space(8.0);
            ui.label(
                RichText::new("Please select another date")
                    .size(12.0)
                    .color(Color32::from_rgb(220, 53, 69)),
            );
            ui.add_space(4.0);

            let selected = self
                .settings
                .fallback_date
                .clone()
                .unwrap_or_else(|| "Select date".to_string());
            let mut picked = None;
            ComboBox::from_id_salt("fallback_date")
                .width(label_width + combo_width)
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for date in &self.fallback_dates {
                        let is_selected = self.settings.fallback_date.as_ref() == Some(date);
                        if ui.selectable_label(is_selected, date).clicked() && !is_selected {
                            picked = Some(date.clone());
                        }
                    }
                });
            if let Some(date) = picked {
                self.settings.fallback_date = Some(date);
                action = ControlPanelAction::FallbackChanged;
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.label(RichText::new("ℹ Status").size(14.0).strong());
        ui.add_space(5.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Showing") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseResults,
    RegionChanged,
    FileChanged,
    SheetChanged,
    DateChanged,
    FallbackChanged,
}
