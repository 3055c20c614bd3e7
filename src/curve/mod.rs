pub mod analysis;
pub mod path;

pub use analysis::{analyze_curve, CurveConfig};
pub use path::{extract_points, parse_path};
