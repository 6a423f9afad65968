pub mod color;
pub mod config;
pub mod engine;
pub mod path;
pub mod result;

pub use color::ColorPicker;
pub use config::{ConfigError, GraphMetrics, LayoutOptions};
pub use engine::GraphLayoutEngine;
pub use path::PathState;
pub use result::{Dot, DotType, GraphLayoutResult, LayoutOutput, Link, Path, RowAnnotation};
