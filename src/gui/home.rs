//! Home Panel
//! Data ingestion view: CSV import, row-limit control, and a table preview.

use egui::{Color32, ComboBox, RichText, ScrollArea};
use polars::prelude::*;

const CELL_WIDTH: f32 = 120.0;
const ROW_HEIGHT: f32 = 20.0;

/// How many rows of the preview table to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLimit {
    Ten,
    Hundred,
    All,
}

impl RowLimit {
    pub const ALL: [RowLimit; 3] = [RowLimit::Ten, RowLimit::Hundred, RowLimit::All];

    pub fn label(self) -> &'static str {
        match self {
            RowLimit::Ten => "10",
            RowLimit::Hundred => "100",
            RowLimit::All => "All",
        }
    }

    fn limit(self) -> Option<usize> {
        match self {
            RowLimit::Ten => Some(10),
            RowLimit::Hundred => Some(100),
            RowLimit::All => None,
        }
    }
}

/// Actions triggered from the home panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeAction {
    None,
    ImportCsv,
}

/// Import view with a virtualized preview of the loaded dataset.
pub struct HomePanel {
    pub row_limit: RowLimit,
    pub status: String,
}

impl Default for HomePanel {
    fn default() -> Self {
        Self {
            row_limit: RowLimit::Hundred,
            status: "Ready to load data...".to_string(),
        }
    }
}

impl HomePanel {
    pub fn show(&mut self, ui: &mut egui::Ui, df: Option<&DataFrame>) -> HomeAction {
        let mut action = HomeAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(10.0);
            ui.label(RichText::new("Sales Data Dashboard").size(24.0).strong());
            ui.label(
                RichText::new("Import your CSV file to generate charts and analyze revenue.")
                    .size(12.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);

        ui.horizontal(|ui| {
            if ui
                .button(RichText::new("📂 Import CSV Data").size(14.0))
                .clicked()
            {
                action = HomeAction::ImportCsv;
            }

            ui.add_space(20.0);
            ui.label("Show rows:");
            ComboBox::from_id_salt("row_limit")
                .width(70.0)
                .selected_text(self.row_limit.label())
                .show_ui(ui, |ui| {
                    for limit in RowLimit::ALL {
                        if ui
                            .selectable_label(self.row_limit == limit, limit.label())
                            .clicked()
                        {
                            self.row_limit = limit;
                        }
                    }
                });
        });

        ui.add_space(5.0);
        let status_color = if self.status.contains("Failed") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        ui.add_space(5.0);
        ui.separator();

        match df {
            Some(df) => self.draw_table(ui, df),
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No Data").size(20.0).color(Color32::GRAY));
                });
            }
        }

        action
    }

    /// Virtualized table over the DataFrame, sliced to the row limit.
    fn draw_table(&self, ui: &mut egui::Ui, df: &DataFrame) {
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let total_rows = match self.row_limit.limit() {
            Some(limit) => df.height().min(limit),
            None => df.height(),
        };

        ui.horizontal(|ui| {
            for column in &columns {
                ui.add_sized(
                    [CELL_WIDTH, ROW_HEIGHT],
                    egui::Label::new(RichText::new(column).strong()).truncate(),
                );
            }
        });
        ui.separator();

        let series = df.get_columns();
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show_rows(ui, ROW_HEIGHT, total_rows, |ui, row_range| {
                for row in row_range {
                    ui.horizontal(|ui| {
                        for column in series {
                            let text = column
                                .get(row)
                                .map(|value| {
                                    if value.is_null() {
                                        String::new()
                                    } else {
                                        value.to_string().trim_matches('"').to_string()
                                    }
                                })
                                .unwrap_or_default();
                            ui.add_sized(
                                [CELL_WIDTH, ROW_HEIGHT],
                                egui::Label::new(RichText::new(text).size(11.0)).truncate(),
                            );
                        }
                    });
                }
            });
    }
}
