use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::PI;

use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{
    uniform_grid_spacer, Bar, BarChart, Legend, Line, LineStyle, Plot, PlotPoint, PlotUi, Points,
    Text, VLine,
};
use serde_json::Value as JsonValue;

use crate::chart::compose::SIZE_RANGE;
use crate::chart::spec::{ChartSpec, Encoding, FieldDef, FieldType, MarkKind};
use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// ChartSpec renderer (egui_plot)
// ---------------------------------------------------------------------------

/// Draw a chart specification. Column-faceted charts become one plot per
/// facet value, laid out side by side and sharing the x categories.
pub fn chart(ui: &mut Ui, id: &str, spec: &ChartSpec, colors: &ColorMap) {
    let units = spec.units();
    let height = spec
        .height
        .or_else(|| units.iter().find_map(|u| u.height))
        .unwrap_or(300) as f32;
    let axis = OrdinalAxis::from_units(&units);

    let faceted = units
        .iter()
        .find(|u| encoding(u).is_some_and(|e| e.column.is_some()));

    match faceted {
        Some(unit) => faceted_plots(ui, id, unit, height, axis, colors),
        None => layered_plot(ui, id, &units, height, axis, colors),
    }
}

fn faceted_plots(
    ui: &mut Ui,
    id: &str,
    unit: &ChartSpec,
    height: f32,
    axis: Option<OrdinalAxis>,
    colors: &ColorMap,
) {
    let Some(column) = encoding(unit).and_then(|e| e.column.as_ref()) else {
        return;
    };
    let facets: BTreeSet<String> = rows(unit)
        .iter()
        .filter_map(|row| field_value(row, Some(column)).map(label))
        .collect();

    if facets.is_empty() {
        ui.label("No data for the current selection.");
        return;
    }

    ui.columns(facets.len(), |cols: &mut [Ui]| {
        for (col_ui, facet) in cols.iter_mut().zip(&facets) {
            col_ui.vertical_centered(|ui: &mut Ui| {
                ui.strong(facet.as_str());
            });

            let mut sub = unit.clone();
            if let Some(data) = sub.data.as_mut() {
                data.values
                    .retain(|row| field_value(row, Some(column)).map(label).as_ref() == Some(facet));
            }
            layered_plot(
                col_ui,
                &format!("{id}_{facet}"),
                &[&sub],
                height,
                axis.clone(),
                colors,
            );
        }
    });
}

fn layered_plot(
    ui: &mut Ui,
    id: &str,
    units: &[&ChartSpec],
    height: f32,
    axis: Option<OrdinalAxis>,
    colors: &ColorMap,
) {
    let (x_title, y_title) = axis_titles(units);
    let hover = hover_points(units, axis.as_ref());

    let mut plot = Plot::new(id)
        .height(height)
        .legend(Legend::default())
        .x_axis_label(x_title)
        .y_axis_label(y_title)
        .label_formatter(move |_name, point| hover_text(&hover, point));

    if let Some(ordinal) = axis.clone() {
        plot = plot
            .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
            .x_axis_formatter(move |mark, _range| {
                ordinal.label_at(mark.value).unwrap_or_default().to_string()
            });
    }

    plot.show(ui, |plot_ui| {
        for unit in units {
            draw_unit(plot_ui, unit, axis.as_ref(), colors);
        }
    });
}

fn draw_unit(plot_ui: &mut PlotUi, unit: &ChartSpec, axis: Option<&OrdinalAxis>, colors: &ColorMap) {
    let (Some(mark), Some(enc)) = (unit.mark.as_ref(), encoding(unit)) else {
        return;
    };

    match mark.kind {
        MarkKind::Line => {
            for (name, (color, mut pts)) in series(unit, axis, colors) {
                pts.sort_by(|a, b| a[0].total_cmp(&b[0]));
                plot_ui.line(Line::new(pts.clone()).name(&name).color(color).width(2.0));
                if mark.point == Some(true) {
                    plot_ui.points(Points::new(pts).name(&name).color(color).radius(3.5));
                }
            }
        }
        MarkKind::Rule => {
            let dash = mark
                .stroke_dash
                .as_ref()
                .and_then(|d| d.first())
                .copied()
                .unwrap_or(4) as f32;
            for row in rows(unit) {
                let Some(x) = enc.x.as_ref().and_then(|d| x_of(d, row, axis)) else {
                    continue;
                };
                plot_ui.vline(
                    VLine::new(x)
                        .color(row_color(unit, row, colors))
                        .style(LineStyle::Dashed { length: dash })
                        .width(1.5),
                );
            }
        }
        MarkKind::Text => {
            let top = plot_ui.plot_bounds().max()[1];
            // dx is in pixels; nudge by a fraction of one category instead.
            let nudge = f64::from(mark.dx.unwrap_or(0)) * 0.01;
            for row in rows(unit) {
                let Some(x) = enc.x.as_ref().and_then(|d| x_of(d, row, axis)) else {
                    continue;
                };
                let Some(text) = field_value(row, enc.text.as_ref()).map(label) else {
                    continue;
                };
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(x + nudge, top),
                        RichText::new(text).color(row_color(unit, row, colors)),
                    )
                    .anchor(Align2::LEFT_TOP),
                );
            }
        }
        MarkKind::Bar => {
            let groups = series(unit, axis, colors);
            let n = groups.len().max(1) as f64;
            let width = 0.8 / n;
            for (i, (name, (color, pts))) in groups.into_iter().enumerate() {
                let offset = (i as f64 - (n - 1.0) / 2.0) * width;
                let bars = pts
                    .iter()
                    .map(|p| Bar::new(p[0] + offset, p[1]).width(width).fill(color))
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).color(color).name(name));
            }
        }
        MarkKind::Circle => {
            let size_def = enc.size.as_ref();
            let range = size_def
                .and_then(|d| d.scale.as_ref())
                .map(|s| s.range)
                .unwrap_or(SIZE_RANGE);
            let max_size = rows(unit)
                .iter()
                .filter_map(|r| field_value(r, size_def).and_then(JsonValue::as_f64))
                .fold(0.0, f64::max);
            let opacity = mark.opacity.unwrap_or(1.0) as f32;

            for row in rows(unit) {
                let Some(pos) = position(enc, row, axis) else {
                    continue;
                };
                // Linear size scale from zero; values are marker areas.
                let area = match field_value(row, size_def).and_then(JsonValue::as_f64) {
                    Some(v) if max_size > 0.0 => range[0] + v / max_size * (range[1] - range[0]),
                    _ => range[0],
                };
                plot_ui.points(
                    Points::new(vec![pos])
                        .radius((area / PI).sqrt() as f32)
                        .color(row_color(unit, row, colors).gamma_multiply(opacity))
                        .name(series_name(enc, row)),
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Ordinal x axis: categories placed at 0, 1, 2, …
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct OrdinalAxis {
    labels: Vec<String>,
}

impl OrdinalAxis {
    /// Union of the ordinal x values of all layers, numbers sorted numerically.
    fn from_units(units: &[&ChartSpec]) -> Option<Self> {
        let mut values: Vec<&JsonValue> = Vec::new();
        let mut ordinal = false;

        for unit in units {
            let Some(x) = encoding(unit).and_then(|e| e.x.as_ref()) else {
                continue;
            };
            if x.kind != FieldType::Ordinal {
                continue;
            }
            ordinal = true;
            values.extend(rows(unit).iter().filter_map(|r| field_value(r, Some(x))));
        }
        if !ordinal {
            return None;
        }

        values.sort_by(|a, b| match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => label(a).cmp(&label(b)),
        });
        let mut labels: Vec<String> = values.into_iter().map(label).collect();
        labels.dedup();

        Some(Self { labels })
    }

    fn position(&self, value: &JsonValue) -> Option<f64> {
        let l = label(value);
        self.labels.iter().position(|x| *x == l).map(|i| i as f64)
    }

    fn label_at(&self, x: f64) -> Option<&str> {
        if x < 0.0 || (x - x.round()).abs() > 1e-6 {
            return None;
        }
        self.labels.get(x.round() as usize).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Hover tooltips
// ---------------------------------------------------------------------------

struct HoverPoint {
    pos: [f64; 2],
    text: String,
}

fn hover_points(units: &[&ChartSpec], axis: Option<&OrdinalAxis>) -> Vec<HoverPoint> {
    let mut points = Vec::new();
    for unit in units {
        let Some(enc) = encoding(unit) else {
            continue;
        };
        if enc.tooltip.is_empty() {
            continue;
        }
        for row in rows(unit) {
            let Some(pos) = position(enc, row, axis) else {
                continue;
            };
            let text = enc
                .tooltip
                .iter()
                .map(|d| {
                    let value = field_value(row, Some(d)).map(label);
                    format!("{}: {}", d.field, value.as_deref().unwrap_or("N/A"))
                })
                .collect::<Vec<_>>()
                .join("\n");
            points.push(HoverPoint { pos, text });
        }
    }
    points
}

/// Tooltip of the nearest data point, or plain coordinates when none is close.
fn hover_text(points: &[HoverPoint], at: &PlotPoint) -> String {
    let span = |axis: usize| {
        let (lo, hi) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.pos[axis]), hi.max(p.pos[axis]))
        });
        if hi > lo {
            hi - lo
        } else {
            1.0
        }
    };
    let (sx, sy) = (span(0), span(1));

    points
        .iter()
        .map(|p| {
            let dx = (p.pos[0] - at.x) / sx;
            let dy = (p.pos[1] - at.y) / sy;
            (dx * dx + dy * dy, p)
        })
        .filter(|(d, _)| *d < 0.03 * 0.03)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, p)| p.text.clone())
        .unwrap_or_else(|| format!("{:.1}, {:.1}", at.x, at.y))
}

// -- helpers --

/// First x / y titles found across the layers, empty when none is set.
fn axis_titles(units: &[&ChartSpec]) -> (String, String) {
    let first = |pick: fn(&Encoding) -> Option<&FieldDef>| {
        units
            .iter()
            .filter_map(|u| encoding(u).and_then(pick))
            .find_map(|def| def.title.clone())
            .unwrap_or_default()
    };
    (first(|e| e.x.as_ref()), first(|e| e.y.as_ref()))
}

fn encoding(unit: &ChartSpec) -> Option<&Encoding> {
    unit.encoding.as_ref()
}

fn rows(unit: &ChartSpec) -> &[JsonValue] {
    unit.data.as_ref().map(|d| d.values.as_slice()).unwrap_or(&[])
}

/// Non-null value of a field in a row.
fn field_value<'a>(row: &'a JsonValue, def: Option<&FieldDef>) -> Option<&'a JsonValue> {
    def.and_then(|d| row.get(&d.field)).filter(|v| !v.is_null())
}

fn label(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn x_of(def: &FieldDef, row: &JsonValue, axis: Option<&OrdinalAxis>) -> Option<f64> {
    let value = field_value(row, Some(def))?;
    match (def.kind, axis) {
        (FieldType::Ordinal, Some(axis)) => axis.position(value),
        _ => value.as_f64(),
    }
}

/// Plot position of a row; rows missing x or y are not drawn.
fn position(enc: &Encoding, row: &JsonValue, axis: Option<&OrdinalAxis>) -> Option<[f64; 2]> {
    let x = x_of(enc.x.as_ref()?, row, axis)?;
    let y = field_value(row, enc.y.as_ref())?.as_f64()?;
    Some([x, y])
}

fn series_name(enc: &Encoding, row: &JsonValue) -> String {
    field_value(row, enc.color.as_ref())
        .map(label)
        .unwrap_or_default()
}

/// Rows grouped by colour field: name → (colour, positions).
fn series(
    unit: &ChartSpec,
    axis: Option<&OrdinalAxis>,
    colors: &ColorMap,
) -> BTreeMap<String, (Color32, Vec<[f64; 2]>)> {
    let mut groups: BTreeMap<String, (Color32, Vec<[f64; 2]>)> = BTreeMap::new();
    let Some(enc) = encoding(unit) else {
        return groups;
    };
    for row in rows(unit) {
        let Some(pos) = position(enc, row, axis) else {
            continue;
        };
        groups
            .entry(series_name(enc, row))
            .or_insert_with(|| (row_color(unit, row, colors), Vec::new()))
            .1
            .push(pos);
    }
    groups
}

/// Fixed mark colour if set, otherwise the colour of the row's clinic.
fn row_color(unit: &ChartSpec, row: &JsonValue, colors: &ColorMap) -> Color32 {
    if let Some(name) = unit.mark.as_ref().and_then(|m| m.color.as_deref()) {
        return named_color(name);
    }
    encoding(unit)
        .and_then(|e| field_value(row, e.color.as_ref()))
        .map(|v| colors.color_for(&label(v)))
        .unwrap_or(Color32::LIGHT_BLUE)
}

fn named_color(name: &str) -> Color32 {
    match name {
        "red" => Color32::RED,
        "black" => Color32::BLACK,
        "gray" | "grey" => Color32::GRAY,
        _ => Color32::LIGHT_BLUE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{line_chart, scatter_chart};
    use crate::data::model::YearlyClinicRecord;

    #[test]
    fn test_ordinal_axis_includes_rule_year() {
        let subset = vec![
            YearlyClinicRecord::new(1848, "C1", Some(3073.0), Some(47.0)),
            YearlyClinicRecord::new(1841, "C1", Some(254.0), Some(7.0)),
        ];
        let spec = line_chart(&subset, 1847);
        let units = spec.units();

        let axis = OrdinalAxis::from_units(&units).unwrap();
        assert_eq!(axis.labels, vec!["1841", "1847", "1848"]);
        assert_eq!(axis.position(&JsonValue::from(1847)), Some(1.0));
        assert_eq!(axis.label_at(2.0), Some("1848"));
        assert_eq!(axis.label_at(0.5), None);
        assert_eq!(axis.label_at(3.0), None);
    }

    #[test]
    fn test_axis_titles_come_from_first_titled_field() {
        let subset = vec![YearlyClinicRecord::new(1841, "C1", Some(254.0), Some(7.0))];

        let line = line_chart(&subset, 1847);
        assert_eq!(
            axis_titles(&line.units()),
            ("Year".to_string(), "Deaths".to_string())
        );

        let scatter = scatter_chart(&subset);
        assert_eq!(
            axis_titles(&scatter.units()),
            ("Births".to_string(), "Deaths".to_string())
        );

        assert_eq!(axis_titles(&[]), (String::new(), String::new()));
    }

    #[test]
    fn test_rows_missing_y_are_skipped() {
        let subset = vec![
            YearlyClinicRecord::new(1841, "C1", Some(254.0), Some(7.0)),
            YearlyClinicRecord::new(1842, "C1", Some(300.0), None),
        ];
        let spec = line_chart(&subset, 1847);
        let units = spec.units();
        let axis = OrdinalAxis::from_units(&units);

        let hover = hover_points(&units[..1], axis.as_ref());
        assert_eq!(hover.len(), 1);
        assert!(hover[0].text.contains("Year: 1841"));

        let text = hover_text(&hover, &PlotPoint::new(0.0, 7.0));
        assert!(text.contains("Deaths: 7"));
    }

    #[test]
    fn test_hover_far_from_points_shows_coordinates() {
        let hover = vec![HoverPoint {
            pos: [0.0, 0.0],
            text: "Year: 1841".to_string(),
        }];
        assert_eq!(hover_text(&hover, &PlotPoint::new(5.0, 5.0)), "5.0, 5.0");
    }
}
