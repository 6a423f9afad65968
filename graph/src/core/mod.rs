pub mod commit;
pub mod geometry;

pub use commit::{Commit, Parents};
pub use geometry::Point;
