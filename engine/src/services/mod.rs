// Request-level orchestration: fetch a series, compute indicators, shape the response
pub mod analysis_service;
pub mod panels;

pub use analysis_service::{AnalysisResponse, AnalysisService, ErrorResponse};
pub use panels::{ChartPanel, ReferenceLine, Trace, TraceStyle};
