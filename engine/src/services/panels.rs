// Chart-ready views of an IndicatorBundle, one panel per indicator kind.
//
// A panel carries the traces a renderer needs plus the fixed title, axis
// labels and caption for its kind. Rendering itself happens elsewhere.
use serde::Serialize;
use shared::models::{IndicatorBundle, IndicatorKind, IndicatorSeries};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStyle {
    Line,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    pub style: TraceStyle,
    pub values: Vec<Option<f64>>,
}

impl Trace {
    fn line(name: &str, series: &IndicatorSeries) -> Self {
        Trace {
            name: name.to_string(),
            style: TraceStyle::Line,
            values: series.values.clone(),
        }
    }

    fn close(bundle: &IndicatorBundle) -> Self {
        Trace {
            name: "Close Price".to_string(),
            style: TraceStyle::Line,
            values: bundle.close.iter().copied().map(Some).collect(),
        }
    }
}

/// Horizontal guide drawn across a panel, such as the RSI 70/30 levels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub name: String,
    pub level: f64,
    pub color: String,
    pub dashed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPanel {
    pub kind: IndicatorKind,
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub traces: Vec<Trace>,
    pub reference_lines: Vec<ReferenceLine>,
    pub caption: String,
}

impl ChartPanel {
    fn new(kind: IndicatorKind, traces: Vec<Trace>) -> Self {
        ChartPanel {
            kind,
            title: kind.title().to_string(),
            x_axis_title: kind.x_axis_title().to_string(),
            y_axis_title: kind.y_axis_title().to_string(),
            traces,
            reference_lines: Vec::new(),
            caption: kind.caption().to_string(),
        }
    }

    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.name == name)
    }
}

pub fn bollinger_panel(bundle: &IndicatorBundle) -> ChartPanel {
    let bands = &bundle.bollinger;
    ChartPanel::new(
        IndicatorKind::Bollinger,
        vec![
            Trace::close(bundle),
            Trace::line("Upper Band", &bands.upper),
            Trace::line("Lower Band", &bands.lower),
            Trace::line("SMA", &bands.middle),
        ],
    )
}

pub fn volume_panel(bundle: &IndicatorBundle) -> ChartPanel {
    let volume = Trace {
        name: "Volume".to_string(),
        style: TraceStyle::Bar,
        values: bundle.volume.values.clone(),
    };
    ChartPanel::new(IndicatorKind::Volume, vec![volume])
}

pub fn sma_ema_panel(bundle: &IndicatorBundle) -> ChartPanel {
    let averages = &bundle.moving_averages;
    ChartPanel::new(
        IndicatorKind::SmaEma,
        vec![
            Trace::close(bundle),
            Trace::line("SMA", &averages.sma),
            Trace::line("EMA", &averages.ema),
        ],
    )
}

pub fn rsi_panel(bundle: &IndicatorBundle, overbought: f64, oversold: f64) -> ChartPanel {
    let mut panel = ChartPanel::new(IndicatorKind::Rsi, vec![Trace::line("RSI", &bundle.rsi)]);
    panel.reference_lines = vec![
        ReferenceLine {
            name: "Overbought".to_string(),
            level: overbought,
            color: "red".to_string(),
            dashed: true,
        },
        ReferenceLine {
            name: "Oversold".to_string(),
            level: oversold,
            color: "green".to_string(),
            dashed: true,
        },
    ];
    panel
}
