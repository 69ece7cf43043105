//! Dashboard Panel
//! KPI header, grouping and chart-kind selectors, chart region, and export.

use crate::charts::{format_currency, ChartKind, ChartPlotter};
use crate::gui::app::{GroupBy, ViewState};
use crate::xlsx::ExportOutcome;
use egui::{Color32, ComboBox, RichText};

/// Actions triggered from the dashboard panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAction {
    None,
    GroupByChanged(GroupBy),
    ChartKindChanged(ChartKind),
    Export,
    OpenExport,
}

/// Analysis view. All data lives in [`ViewState`]; the panel only keeps the
/// feedback of the last export attempt.
#[derive(Default)]
pub struct DashboardPanel {
    pub export_feedback: Option<ExportOutcome>,
}

impl DashboardPanel {
    pub fn show(&mut self, ui: &mut egui::Ui, state: &ViewState) -> DashboardAction {
        let mut action = DashboardAction::None;

        ui.horizontal(|ui| {
            ui.label(
                RichText::new(format!(
                    "Total Revenue: {}",
                    format_currency(state.total_revenue)
                ))
                .size(15.0)
                .strong(),
            );

            ui.add_space(20.0);
            ui.label("Group by:");
            ComboBox::from_id_salt("group_by")
                .width(110.0)
                .selected_text(state.group_by.label())
                .show_ui(ui, |ui| {
                    for dimension in GroupBy::ALL {
                        if ui
                            .selectable_label(state.group_by == dimension, dimension.label())
                            .clicked()
                        {
                            action = DashboardAction::GroupByChanged(dimension);
                        }
                    }
                });

            ui.add_space(10.0);
            ui.label("Chart Type:");
            ComboBox::from_id_salt("chart_kind")
                .width(110.0)
                .selected_text(state.chart_kind.label())
                .show_ui(ui, |ui| {
                    for kind in ChartKind::ALL {
                        if ui
                            .selectable_label(state.chart_kind == kind, kind.label())
                            .clicked()
                        {
                            action = DashboardAction::ChartKindChanged(kind);
                        }
                    }
                });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let exportable = state
                    .aggregation
                    .as_ref()
                    .is_some_and(|aggregation| !aggregation.is_empty());
                if ui
                    .add_enabled(exportable, egui::Button::new("Export to Excel"))
                    .clicked()
                {
                    action = DashboardAction::Export;
                }
            });
        });

        if let Some(warning) = &state.warning {
            ui.add_space(4.0);
            ui.label(RichText::new(warning).color(Color32::from_rgb(255, 152, 0)));
        }

        if let Some(outcome) = &self.export_feedback {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let color = if outcome.success {
                    Color32::from_rgb(40, 167, 69)
                } else {
                    Color32::from_rgb(220, 53, 69)
                };
                ui.label(RichText::new(&outcome.message).size(11.0).color(color));

                if outcome.success
                    && state.last_export.is_some()
                    && ui.small_button("Open").clicked()
                {
                    action = DashboardAction::OpenExport;
                }
            });
        }

        ui.add_space(6.0);
        ui.separator();
        ui.add_space(10.0);

        match &state.aggregation {
            Some(aggregation) => {
                ChartPlotter::draw(ui, aggregation, state.chart_kind, &state.group_by.style());
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No Data").size(20.0).color(Color32::GRAY));
                });
            }
        }

        action
    }
}
