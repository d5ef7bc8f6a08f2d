pub mod orchestrator;
pub mod plan;

pub use orchestrator::PipelineOrchestrator;
pub use plan::{is_supported_input, OutputMode, PipelineRequest, TargetPlan, SUPPORTED_EXTENSIONS};
