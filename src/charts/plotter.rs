//! Chart Plotter Module
//! Renders revenue aggregations as pie or bar charts on the egui surface.

use crate::data::Aggregation;
use egui::epaint::TextShape;
use egui::{Align2, Color32, FontId, Pos2, RichText, Sense, Stroke, Vec2};
use egui_plot::{Bar, BarChart, Plot, PlotPoint, PlotTransform, Text};

/// Slice color palette for pie charts.
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(91, 155, 213),  // Blue
    Color32::from_rgb(237, 125, 49),  // Orange
    Color32::from_rgb(112, 173, 71),  // Green
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

/// First slice starts here, sweeping counter-clockwise.
const PIE_START_ANGLE_DEG: f32 = 140.0;

/// Supported chart kinds. A closed enum: there is no unrecognized kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Pie,
    Bar,
}

impl ChartKind {
    pub const ALL: [ChartKind; 2] = [ChartKind::Pie, ChartKind::Bar];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Pie => "Pie Chart",
            ChartKind::Bar => "Bar Chart",
        }
    }
}

/// Presentation parameters for one grouping dimension.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub title_suffix: &'static str,
    pub bar_color: Color32,
    pub x_label_rotation: f32,
}

impl ChartStyle {
    pub fn category() -> Self {
        Self {
            title_suffix: "by Product Category",
            bar_color: Color32::from_rgb(135, 206, 235), // sky blue
            x_label_rotation: 45.0,
        }
    }

    pub fn country() -> Self {
        Self {
            title_suffix: "by Country",
            bar_color: Color32::from_rgb(76, 175, 80),
            x_label_rotation: 45.0,
        }
    }

    pub fn age_group() -> Self {
        Self {
            title_suffix: "by Age Group",
            bar_color: Color32::from_rgb(255, 152, 0),
            x_label_rotation: 0.0,
        }
    }
}

/// Draws aggregations into the dashboard chart region.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Render the aggregation with the requested kind and style, replacing
    /// whatever the region showed last frame.
    pub fn draw(ui: &mut egui::Ui, aggregation: &Aggregation, kind: ChartKind, style: &ChartStyle) {
        match kind {
            ChartKind::Pie => Self::draw_pie(ui, aggregation, style),
            ChartKind::Bar => Self::draw_bar(ui, aggregation, style),
        }
    }

    /// Proportional slices with group labels outside the rim and one-decimal
    /// percentage labels inside. A zero or negative total draws nothing.
    fn draw_pie(ui: &mut egui::Ui, aggregation: &Aggregation, style: &ChartStyle) {
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(format!("Revenue Share {}", style.title_suffix))
                    .size(16.0)
                    .strong(),
            );
        });
        ui.add_space(8.0);

        let total = aggregation.total();
        let side = ui
            .available_width()
            .min(ui.available_height())
            .clamp(260.0, 520.0);
        let text_color = ui.visuals().text_color();

        ui.vertical_centered(|ui| {
            let (response, painter) = ui.allocate_painter(Vec2::splat(side), Sense::hover());
            if total <= 0.0 {
                return;
            }

            let center = response.rect.center();
            let radius = side * 0.5 - 45.0; // leave room for rim labels

            let mut angle = PIE_START_ANGLE_DEG.to_radians();
            for (idx, (label, value)) in aggregation.entries().iter().enumerate() {
                let fraction = (value / total) as f32;
                let sweep = fraction * std::f32::consts::TAU;

                if *value > 0.0 {
                    let color = PALETTE[idx % PALETTE.len()];

                    // Triangle fan: sectors wider than 180 degrees are not
                    // convex, thin triangles always are.
                    let steps = ((sweep / 0.05).ceil() as usize).max(1);
                    let step = sweep / steps as f32;
                    for s in 0..steps {
                        let a0 = angle + s as f32 * step;
                        let a1 = a0 + step;
                        painter.add(egui::Shape::convex_polygon(
                            vec![
                                center,
                                Self::rim_point(center, radius, a0),
                                Self::rim_point(center, radius, a1),
                            ],
                            color,
                            Stroke::NONE,
                        ));
                    }

                    let mid = angle + sweep * 0.5;
                    painter.text(
                        Self::rim_point(center, radius + 24.0, mid),
                        Align2::CENTER_CENTER,
                        label,
                        FontId::proportional(12.0),
                        text_color,
                    );
                    painter.text(
                        Self::rim_point(center, radius * 0.62, mid),
                        Align2::CENTER_CENTER,
                        format!("{:.1}%", fraction * 100.0),
                        FontId::proportional(11.0),
                        Color32::BLACK,
                    );
                }

                angle += sweep;
            }
        });
    }

    /// One bar per group with the absolute currency value annotated above it
    /// and x-axis labels rotated by the style angle.
    fn draw_bar(ui: &mut egui::Ui, aggregation: &Aggregation, style: &ChartStyle) {
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(format!("Revenue Amount {}", style.title_suffix))
                    .size(16.0)
                    .strong(),
            );
        });
        ui.add_space(4.0);

        let entries = aggregation.entries();
        let labels: Vec<String> = entries.iter().map(|(l, _)| l.clone()).collect();
        let rotation = style.x_label_rotation;
        let text_color = ui.visuals().text_color();

        let bars: Vec<Bar> = entries
            .iter()
            .enumerate()
            .map(|(i, (label, value))| {
                Bar::new(i as f64, *value)
                    .width(0.6)
                    .fill(style.bar_color)
                    .name(label)
            })
            .collect();

        let max_value = entries.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);

        let axis_labels = labels.clone();
        let inline_labels = rotation == 0.0;
        let response = Plot::new("revenue_bar")
            .height(360.0)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .y_axis_label("Revenue ($)")
            .include_y(0.0)
            .include_y(max_value * 1.15) // headroom for annotations
            .x_axis_formatter(move |mark, _range| {
                let rounded = mark.value.round();
                if !inline_labels || rounded < 0.0 || (mark.value - rounded).abs() > 1e-6 {
                    return String::new();
                }
                axis_labels.get(rounded as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));

                for (i, (_, value)) in entries.iter().enumerate() {
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(i as f64, *value),
                            RichText::new(format_currency(*value)).size(10.0),
                        )
                        .anchor(Align2::CENTER_BOTTOM)
                        .color(text_color),
                    );
                }
            });

        if rotation != 0.0 {
            Self::draw_rotated_labels(ui, &labels, &response.transform, rotation, text_color);
        }
    }

    /// Angled x-axis labels painted in a strip under the plot, since the plot
    /// widget itself only renders horizontal tick text.
    fn draw_rotated_labels(
        ui: &mut egui::Ui,
        labels: &[String],
        transform: &PlotTransform,
        rotation_deg: f32,
        color: Color32,
    ) {
        let font = FontId::proportional(11.0);
        let galleys: Vec<_> = labels
            .iter()
            .map(|label| ui.painter().layout_no_wrap(label.clone(), font.clone(), color))
            .collect();

        let angle = -rotation_deg.to_radians();
        let widest = galleys.iter().map(|g| g.size().x).fold(0.0f32, f32::max);
        let strip_height = widest * angle.sin().abs() + 18.0;

        let (rect, _) =
            ui.allocate_exact_size(Vec2::new(ui.available_width(), strip_height), Sense::hover());
        let painter = ui.painter_at(rect);
        let dir = Vec2::angled(angle);

        for (i, galley) in galleys.into_iter().enumerate() {
            let tick_x = transform
                .position_from_point(&PlotPoint::new(i as f64, 0.0))
                .x;
            // Anchor the end of the label at its tick so the text slants up
            // toward the bar it belongs to.
            let pos = Pos2::new(tick_x, rect.top() + 2.0) - dir * galley.size().x;
            painter.add(TextShape::new(pos, galley, color).with_angle(angle));
        }
    }

    fn rim_point(center: Pos2, radius: f32, angle: f32) -> Pos2 {
        // Screen y grows downward; negate sin for counter-clockwise sweep.
        Pos2::new(
            center.x + radius * angle.cos(),
            center.y - radius * angle.sin(),
        )
    }
}

/// Currency label: dollar sign, thousands separators, no decimals.
pub fn format_currency(value: f64) -> String {
    let negative = value < 0.0;
    let digits = (value.abs().round() as u64).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("${}{}", if negative { "-" } else { "" }, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(950.0), "$950");
        assert_eq!(format_currency(1234.0), "$1,234");
        assert_eq!(format_currency(1_234_567.6), "$1,234,568");
    }

    #[test]
    fn currency_keeps_sign() {
        assert_eq!(format_currency(-100.4), "$-100");
    }

    #[test]
    fn chart_kind_labels() {
        assert_eq!(ChartKind::Pie.label(), "Pie Chart");
        assert_eq!(ChartKind::Bar.label(), "Bar Chart");
    }
}
