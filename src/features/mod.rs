pub mod catalog;
pub mod schema;

pub use catalog::{FeatureCatalog, FeatureCategory, FeatureInfo};
pub use schema::{CML_CVD_FEATURES, FeatureKey, FeatureSchema, SchemaError};
