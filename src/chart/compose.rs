use serde_json::json;

use super::spec::{
    ChartSpec, Encoding, FieldDef, FieldType, Header, InlineData, Mark, MarkKind, Scale,
};
use crate::data::model::YearlyClinicRecord;

pub const YEAR: &str = "Year";
pub const CLINIC: &str = "Clinic";
pub const BIRTH: &str = "Birth";
pub const DEATHS: &str = "Deaths";
pub const LABEL: &str = "label";

const RULE_COLOR: &str = "red";
/// Marker area range for the scatter size channel, in px².
pub const SIZE_RANGE: [f64; 2] = [30.0, 400.0];

// ---------------------------------------------------------------------------
// Chart builders – pure functions of the filtered subset
// ---------------------------------------------------------------------------

/// Deaths per year, one line per clinic, with a dashed rule and label at the
/// threshold year.
pub fn line_chart(subset: &[YearlyClinicRecord], threshold: i64) -> ChartSpec {
    let mut line_mark = Mark::new(MarkKind::Line);
    line_mark.point = Some(true);

    let lines = ChartSpec::layer_item(
        records_data(subset),
        line_mark,
        Encoding {
            x: Some(year_axis()),
            y: Some(deaths_axis()),
            color: Some(clinic_color()),
            tooltip: tooltip(&[YEAR, CLINIC, BIRTH, DEATHS]),
            ..Encoding::default()
        },
    );

    let mut rule_mark = Mark::new(MarkKind::Rule);
    rule_mark.color = Some(RULE_COLOR.to_string());
    rule_mark.stroke_dash = Some(vec![4, 4]);

    let rule = ChartSpec::layer_item(
        InlineData {
            values: vec![json!({ YEAR: threshold })],
        },
        rule_mark,
        Encoding {
            x: Some(FieldDef::new(YEAR, FieldType::Ordinal)),
            ..Encoding::default()
        },
    );

    let mut text_mark = Mark::new(MarkKind::Text);
    text_mark.align = Some("left".to_string());
    text_mark.dx = Some(5);
    text_mark.dy = Some(-10);
    text_mark.color = Some(RULE_COLOR.to_string());

    let rule_text = ChartSpec::layer_item(
        InlineData {
            values: vec![json!({ YEAR: threshold, LABEL: format!("Hand-washing: {threshold}") })],
        },
        text_mark,
        Encoding {
            x: Some(FieldDef::new(YEAR, FieldType::Ordinal)),
            text: Some(FieldDef::new(LABEL, FieldType::Nominal)),
            ..Encoding::default()
        },
    );

    ChartSpec::layered(vec![lines.with_size(400, Some(700)), rule, rule_text])
}

/// Deaths per year as bars, one facet column per clinic.
pub fn bar_chart(subset: &[YearlyClinicRecord]) -> ChartSpec {
    let mut column = FieldDef::new(CLINIC, FieldType::Nominal);
    column.header = Some(Header {
        label_angle: 0,
        title: None,
    });

    ChartSpec::unit(
        records_data(subset),
        Mark::new(MarkKind::Bar),
        Encoding {
            x: Some(year_axis()),
            y: Some(deaths_axis()),
            color: Some(clinic_color()),
            column: Some(column),
            tooltip: tooltip(&[YEAR, CLINIC, DEATHS]),
            ..Encoding::default()
        },
    )
    .with_size(300, None)
}

/// Births against deaths, marker area scaled by births.
pub fn scatter_chart(subset: &[YearlyClinicRecord]) -> ChartSpec {
    let mut circle = Mark::new(MarkKind::Circle);
    circle.opacity = Some(0.7);

    let mut size = FieldDef::new(BIRTH, FieldType::Quantitative).titled("Births");
    size.scale = Some(Scale { range: SIZE_RANGE });

    ChartSpec::unit(
        records_data(subset),
        circle,
        Encoding {
            x: Some(FieldDef::new(BIRTH, FieldType::Quantitative).titled("Births")),
            y: Some(deaths_axis()),
            size: Some(size),
            color: Some(clinic_color()),
            tooltip: tooltip(&[YEAR, CLINIC, BIRTH, DEATHS]),
            ..Encoding::default()
        },
    )
    .with_size(400, None)
}

// -- helpers --

fn records_data(subset: &[YearlyClinicRecord]) -> InlineData {
    InlineData {
        values: subset
            .iter()
            .map(|r| {
                json!({
                    YEAR: r.year,
                    CLINIC: r.clinic,
                    BIRTH: r.birth,
                    DEATHS: r.deaths,
                })
            })
            .collect(),
    }
}

fn year_axis() -> FieldDef {
    FieldDef::new(YEAR, FieldType::Ordinal).titled("Year")
}

fn deaths_axis() -> FieldDef {
    FieldDef::new(DEATHS, FieldType::Quantitative).titled("Deaths")
}

fn clinic_color() -> FieldDef {
    FieldDef::new(CLINIC, FieldType::Nominal).titled("Clinic")
}

fn tooltip(fields: &[&str]) -> Vec<FieldDef> {
    fields
        .iter()
        .map(|&f| {
            let kind = match f {
                CLINIC => FieldType::Nominal,
                YEAR => FieldType::Ordinal,
                _ => FieldType::Quantitative,
            };
            FieldDef::new(f, kind)
        })
        .collect()
}
