//! hourglass: the data engines behind the anomaly chat dashboard.
//!
//! - [`reshape`]: wide hour-bucket rows → sorted per-entity time series and
//!   anomaly markers.
//! - [`ui`]: renders server-supplied UI trees against a host registry,
//!   with visible placeholders for unknown kinds.
//!
//! Both are pure and deterministic. The remaining modules are the glue the
//! presentation layer and the CLI need around them.

pub mod config;
pub mod dashboard;
pub mod envelope;
pub mod error;
pub mod fingerprint;
pub mod io;
pub mod logging;
pub mod reshape;
pub mod stats;
pub mod ui;

pub use config::{RenderConfig, ReshapeConfig};
pub use error::{RenderError, ReshapeError};
pub use reshape::{
    reshape, reshape_json, reshape_rows, Anomaly, AnomalyKind, ChartPoint, RawRow, Reshaped,
    SeriesDescriptor,
};
pub use ui::{render, render_value, render_with, Diagnostic, NodeRegistry, RenderTarget, UiNode};
