pub mod types;

pub use types::{ClassificationResult, ClassificationType, ModelVerdict, SpamFeature};
