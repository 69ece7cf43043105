//! Salesboard Main Application
//! Owns all view state and wires panel actions to loader, analyzer, exporter.

use crate::charts::{ChartKind, ChartStyle};
use crate::data::{AgeGroupShare, Aggregation, CsvImporter, SalesAnalyzer};
use crate::gui::{DashboardAction, DashboardPanel, HomeAction, HomePanel};
use crate::xlsx::XlsxExporter;
use polars::prelude::DataFrame;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Home,
    Dashboard,
}

/// Grouping dimensions offered on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Category,
    Country,
    AgeGroup,
}

impl GroupBy {
    pub const ALL: [GroupBy; 3] = [GroupBy::Category, GroupBy::Country, GroupBy::AgeGroup];

    pub fn label(self) -> &'static str {
        match self {
            GroupBy::Category => "Category",
            GroupBy::Country => "Country",
            GroupBy::AgeGroup => "Age Group",
        }
    }

    pub fn style(self) -> ChartStyle {
        match self {
            GroupBy::Category => ChartStyle::category(),
            GroupBy::Country => ChartStyle::country(),
            GroupBy::AgeGroup => ChartStyle::age_group(),
        }
    }
}

/// The application's view state: no data until the first successful import,
/// then a dataset plus the aggregation derived from the current selections.
pub struct ViewState {
    pub df: Option<DataFrame>,
    pub aggregation: Option<Aggregation>,
    pub group_by: GroupBy,
    pub chart_kind: ChartKind,
    pub total_revenue: f64,
    pub warning: Option<String>,
    pub last_export: Option<PathBuf>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            df: None,
            aggregation: None,
            group_by: GroupBy::Category,
            chart_kind: ChartKind::Pie,
            total_revenue: 0.0,
            warning: None,
            last_export: None,
        }
    }
}

impl ViewState {
    pub fn has_data(&self) -> bool {
        self.df.is_some()
    }
}

/// Main application window.
pub struct SalesboardApp {
    tab: Tab,
    state: ViewState,
    home: HomePanel,
    dashboard: DashboardPanel,
}

impl SalesboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            tab: Tab::Home,
            state: ViewState::default(),
            home: HomePanel::default(),
            dashboard: DashboardPanel::default(),
        }
    }

    /// Handle CSV file selection. A failed import leaves all prior state
    /// untouched and only updates the status line.
    fn handle_import(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        match CsvImporter::load(&path) {
            Ok(df) => {
                let rows = df.height();
                log::info!("imported {} rows from {}", rows, path.display());

                self.state.df = Some(df);
                self.state.last_export = None;
                self.dashboard.export_feedback = None;
                self.refresh_aggregation();

                self.home.status =
                    format!("Successfully loaded {} rows from {}", rows, path.display());
                self.tab = Tab::Dashboard;
            }
            Err(e) => {
                log::error!("CSV import failed: {e}");
                self.home.status = format!("Failed to load CSV: {e}");
            }
        }
    }

    /// Recompute the grand total and the aggregation for the current
    /// dimension. Age grouping on a dataset without an age column keeps the
    /// data but clears the aggregation, which also disables export.
    fn refresh_aggregation(&mut self) {
        let Some(df) = &self.state.df else {
            return;
        };

        self.state.warning = None;
        self.state.total_revenue = match SalesAnalyzer::total_revenue(df) {
            Ok(total) => total,
            Err(e) => {
                log::error!("total revenue failed: {e}");
                self.state.aggregation = None;
                self.state.warning = Some(e.to_string());
                return;
            }
        };

        let result = match self.state.group_by {
            GroupBy::Category => SalesAnalyzer::revenue_by_category(df).map(Some),
            GroupBy::Country => SalesAnalyzer::revenue_by_country(df).map(Some),
            GroupBy::AgeGroup => {
                SalesAnalyzer::revenue_by_age_group(df).map(|share| match share {
                    AgeGroupShare::Available(aggregation) => Some(aggregation),
                    AgeGroupShare::Unavailable => None,
                })
            }
        };

        match result {
            Ok(Some(aggregation)) => {
                log::debug!(
                    "aggregated {} groups {}",
                    aggregation.len(),
                    self.state.group_by.style().title_suffix
                );
                self.state.aggregation = Some(aggregation);
            }
            Ok(None) => {
                log::warn!("age grouping requested but the dataset has no age column");
                self.state.aggregation = None;
                self.state.warning = Some("Column 'Customer_Age' not found!".to_string());
            }
            Err(e) => {
                log::error!("aggregation failed: {e}");
                self.state.aggregation = None;
                self.state.warning = Some(e.to_string());
            }
        }
    }

    /// Ask for a destination and export the current aggregation.
    fn handle_export(&mut self) {
        let Some(aggregation) = self.state.aggregation.clone() else {
            return;
        };
        if aggregation.is_empty() {
            return;
        }

        let Some(path) = rfd::FileDialog::new()
            .add_filter("Excel files", &["xlsx"])
            .set_file_name("sales_analysis.xlsx")
            .save_file()
        else {
            return;
        };

        let outcome = XlsxExporter::save(&aggregation, &path);
        if outcome.success {
            log::info!("exported {} groups to {}", aggregation.len(), path.display());
            self.state.last_export = Some(path);
        } else {
            log::error!("export failed: {}", outcome.message);
            self.state.last_export = None;
        }
        self.dashboard.export_feedback = Some(outcome);
    }

    fn handle_open_export(&mut self) {
        if let Some(path) = &self.state.last_export {
            if let Err(e) = open::that(path) {
                log::warn!("failed to open {}: {e}", path.display());
            }
        }
    }
}

impl eframe::App for SalesboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.tab, Tab::Home, "Home & Data");
                ui.add_enabled_ui(self.state.has_data(), |ui| {
                    ui.selectable_value(&mut self.tab, Tab::Dashboard, "Sales Analysis");
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            Tab::Home => {
                let action = self.home.show(ui, self.state.df.as_ref());
                match action {
                    HomeAction::ImportCsv => self.handle_import(),
                    HomeAction::None => {}
                }
            }
            Tab::Dashboard => {
                let action = self.dashboard.show(ui, &self.state);
                match action {
                    DashboardAction::GroupByChanged(dimension) => {
                        self.state.group_by = dimension;
                        self.refresh_aggregation();
                    }
                    DashboardAction::ChartKindChanged(kind) => {
                        self.state.chart_kind = kind;
                        self.refresh_aggregation();
                    }
                    DashboardAction::Export => self.handle_export(),
                    DashboardAction::OpenExport => self.handle_open_export(),
                    DashboardAction::None => {}
                }
            }
        });
    }
}
