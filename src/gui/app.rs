//! Methane Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::config::DashboardConfig;
use crate::dashboard::build_view;
use crate::data::{Catalog, SelectionResolver};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::fmt::Display;
use tracing::{info, warn};

/// Main application window.
pub struct MethaneApp {
    config: DashboardConfig,
    catalog: Catalog,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl MethaneApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let catalog = Catalog::scan(&config.results_dir);
        let mut app = Self {
            control_panel: ControlPanel::new(&config),
            chart_viewer: ChartViewer::new(),
            catalog,
            config,
        };
        app.handle_catalog_changed();
        app
    }

    /// Let the user point the dashboard at another results folder
    fn handle_browse_results(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_directory(&self.config.results_dir)
            .pick_folder()
        {
            info!(path = %path.display(), "Results folder selected");
            self.config.results_dir = path;
            self.catalog = Catalog::scan(&self.config.results_dir);
            self.handle_catalog_changed();
        }
    }

    fn handle_catalog_changed(&mut self) {
        self.control_panel.results_dir = self.catalog.root().to_path_buf();
        self.control_panel.update_regions(self.catalog.regions());

        if let Err(e) = self.catalog.first_region().map(|_| ()) {
            self.control_panel.update_files(Vec::new());
            self.control_panel.update_sheets(Vec::new());
            self.show_error(e);
            return;
        }

        self.handle_region_changed();
    }

    fn handle_region_changed(&mut self) {
        let names = SelectionResolver::new(&self.catalog)
            .display_names(&self.control_panel.settings.region);
        match names {
            Ok(names) => {
                self.control_panel.update_files(names);
                self.handle_file_changed();
            }
            Err(e) => self.show_error(e),
        }
    }

    fn handle_file_changed(&mut self) {
        let settings = &self.control_panel.settings;
        let sheets =
            SelectionResolver::new(&self.catalog).sheets(&settings.region, settings.file_index);
        match sheets {
            Ok(sheets) => {
                self.control_panel.update_sheets(sheets);
                self.refresh();
            }
            Err(e) => self.show_error(e),
        }
    }

    /// Recompute everything for the current selection
    fn refresh(&mut self) {
        let Some(request) = self.control_panel.request() else {
            return;
        };

        match build_view(&self.catalog, &request) {
            Ok(view) => {
                self.control_panel
                    .update_fallback_dates(view.fallback_dates().to_vec());
                let status = match &view.active_date {
                    Some(date) => format!("Showing {} for {}", date, view.selection.sheet_name),
                    None => "Please select another date".to_string(),
                };
                self.control_panel.set_status(&status);
                self.chart_viewer.set_view(view);
            }
            Err(e) => self.show_error(e),
        }
    }

    fn show_error(&mut self, error: impl Display) {
        warn!(error = %error, "Dashboard update failed");
        self.chart_viewer.clear();
        self.control_panel.set_status(&format!("Error: {}", error));
    }
}

impl eframe::App for MethaneApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseResults => self.handle_browse_results(),
                        ControlPanelAction::RegionChanged => self.handle_region_changed(),
                        ControlPanelAction::FileChanged => self.handle_file_changed(),
                        ControlPanelAction::SheetChanged
                        | ControlPanelAction::DateChanged
                        | ControlPanelAction::FallbackChanged => self.refresh(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
