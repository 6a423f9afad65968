pub mod core;
pub mod git_backend;
pub mod layout;

pub use crate::core::{Commit, Parents, Point};
pub use crate::git_backend::GitWalker;
pub use crate::layout::{
    ColorPicker, ConfigError, Dot, DotType, GraphLayoutEngine, GraphLayoutResult, GraphMetrics,
    LayoutOptions, LayoutOutput, Link, Path, RowAnnotation,
};
