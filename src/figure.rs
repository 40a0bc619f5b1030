//! Chart specifications serialized in the shape plotly.js accepts
//! (`{"data": [...], "layout": {...}}`).

use std::collections::HashSet;

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Bar(XyTrace),
    Scatter(XyTrace),
    Pie(PieTrace),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XyTrace {
    pub name: String,
    pub x: Vec<String>,
    /// Absent values serialize as `null`, which plotly draws as a gap.
    pub y: Vec<Option<f64>>,
    pub marker: Marker,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    pub yaxis: String,
    pub legendgroup: String,
    pub showlegend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieTrace {
    pub name: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub marker: PieMarker,
    pub showlegend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieMarker {
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis2: Option<Axis>,
    pub showlegend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlaying: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
}

impl Axis {
    pub fn titled(text: &str) -> Self {
        Self {
            title: Title {
                text: text.to_string(),
            },
            overlaying: None,
            side: None,
        }
    }

    /// Right-hand axis drawn over the primary one.
    pub fn secondary(text: &str) -> Self {
        Self {
            overlaying: Some("y".to_string()),
            side: Some("right".to_string()),
            ..Self::titled(text)
        }
    }
}

impl Trace {
    pub fn bar(name: &str, x: Vec<String>, y: Vec<Option<f64>>, color: &str) -> Self {
        Trace::Bar(XyTrace {
            name: name.to_string(),
            x,
            y,
            marker: Marker {
                color: color.to_string(),
            },
            line: None,
            mode: None,
            yaxis: "y".to_string(),
            legendgroup: name.to_string(),
            showlegend: true,
        })
    }

    /// Line with markers on the secondary y-axis.
    pub fn line(name: &str, x: Vec<String>, y: Vec<Option<f64>>, color: &str) -> Self {
        Trace::Scatter(XyTrace {
            name: name.to_string(),
            x,
            y,
            marker: Marker {
                color: color.to_string(),
            },
            line: Some(LineStyle {
                color: color.to_string(),
            }),
            mode: Some("lines+markers".to_string()),
            yaxis: "y2".to_string(),
            legendgroup: name.to_string(),
            showlegend: true,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Trace::Bar(t) | Trace::Scatter(t) => &t.name,
            Trace::Pie(t) => &t.name,
        }
    }

    pub fn showlegend(&self) -> bool {
        match self {
            Trace::Bar(t) | Trace::Scatter(t) => t.showlegend,
            Trace::Pie(t) => t.showlegend,
        }
    }

    fn set_showlegend(&mut self, show: bool) {
        match self {
            Trace::Bar(t) | Trace::Scatter(t) => t.showlegend = show,
            Trace::Pie(t) => t.showlegend = show,
        }
    }
}

impl Figure {
    /// A figure with axes and a title but no traces.
    pub fn empty(title: &str) -> Self {
        Self {
            data: Vec::new(),
            layout: Layout {
                title: Title {
                    text: title.to_string(),
                },
                ..Layout::default()
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn title(&self) -> &str {
        &self.layout.title.text
    }

    /// Hides legend entries whose name already appeared earlier in the figure.
    pub fn dedupe_legend(&mut self) {
        let mut seen: HashSet<String> = HashSet::new();
        for trace in &mut self.data {
            if matches!(trace, Trace::Pie(_)) || !trace.showlegend() {
                continue;
            }
            if !seen.insert(trace.name().to_string()) {
                trace.set_showlegend(false);
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
