use serde::Serialize;
use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// Declarative chart specification (Vega-Lite shaped)
// ---------------------------------------------------------------------------

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// A chart: either a single mark over inline data, or a stack of layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<InlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark: Option<Mark>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Encoding>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub layer: Vec<ChartSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

impl ChartSpec {
    /// Top-level single-mark chart.
    pub fn unit(data: InlineData, mark: Mark, encoding: Encoding) -> Self {
        Self {
            schema: Some(VEGA_LITE_SCHEMA),
            ..Self::layer_item(data, mark, encoding)
        }
    }

    /// Single-mark chart nested inside a layer (no `$schema`).
    pub fn layer_item(data: InlineData, mark: Mark, encoding: Encoding) -> Self {
        Self {
            schema: None,
            data: Some(data),
            mark: Some(mark),
            encoding: Some(encoding),
            layer: Vec::new(),
            height: None,
            width: None,
        }
    }

    pub fn layered(layers: Vec<ChartSpec>) -> Self {
        Self {
            schema: Some(VEGA_LITE_SCHEMA),
            data: None,
            mark: None,
            encoding: None,
            layer: layers,
            height: None,
            width: None,
        }
    }

    pub fn with_size(mut self, height: u32, width: Option<u32>) -> Self {
        self.height = Some(height);
        self.width = width;
        self
    }

    /// Single-mark parts of the chart, in drawing order.
    pub fn units(&self) -> Vec<&ChartSpec> {
        if self.layer.is_empty() {
            vec![self]
        } else {
            self.layer.iter().flat_map(ChartSpec::units).collect()
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Rows as JSON objects keyed by column name; missing values are `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineData {
    pub values: Vec<JsonValue>,
}

// ---------------------------------------------------------------------------
// Marks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkKind {
    Line,
    Rule,
    Text,
    Bar,
    Circle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: MarkKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_dash: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dx: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dy: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl Mark {
    pub fn new(kind: MarkKind) -> Self {
        Self {
            kind,
            point: None,
            color: None,
            stroke_dash: None,
            align: None,
            dx: None,
            dy: None,
            opacity: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Encodings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Quantitative,
    Ordinal,
    Nominal,
}

/// Channel → field mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Encoding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<FieldDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<FieldDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<FieldDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<FieldDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<FieldDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<FieldDef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tooltip: Vec<FieldDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDef {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Header>,
}

impl FieldDef {
    pub fn new(field: &str, kind: FieldType) -> Self {
        Self {
            field: field.to_string(),
            kind,
            title: None,
            scale: None,
            header: None,
        }
    }

    pub fn titled(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scale {
    pub range: [f64; 2],
}

/// Facet header. `title: None` serializes as `null`, which hides the title.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub label_angle: i32,
    pub title: Option<String>,
}
