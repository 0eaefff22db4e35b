pub mod analysis_flow;
pub mod file_ctx;
pub mod submit_flow;

pub use analysis_flow::AnalysisFlow;
pub use file_ctx::FileCtx;
pub use submit_flow::SubmitFlow;
