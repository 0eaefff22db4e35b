pub mod analysis;
pub mod endpoints;
pub mod transform;

pub use analysis::{AnalysisResponse, AnalysisService};
pub use endpoints::{AnalysisEndpoint, TransformEndpoint};
pub use transform::{TransformRequest, TransformResponse, TransformService, TransformedFile};
