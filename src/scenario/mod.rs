pub mod delta;
pub mod types;

pub use delta::{ATTRIBUTION_TOLERANCE, FEATURE_TOLERANCE, diff, exceeds_tolerance};
pub use types::{AttributionChange, FeatureChange, OmissionReason, RelativeChange, ScenarioDelta};
