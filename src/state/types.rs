use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    DependencyCheck,
    WorkspacePrepare,
    RateProbe,
    TargetCompute,
    AudioExtract,
    FrameExtract,
    Interpolate,
    SecondaryInterpolate,
    Remux,
}

impl Stage {
    pub const ALL: [Stage; 9] = [
        Stage::DependencyCheck,
        Stage::WorkspacePrepare,
        Stage::RateProbe,
        Stage::TargetCompute,
        Stage::AudioExtract,
        Stage::FrameExtract,
        Stage::Interpolate,
        Stage::SecondaryInterpolate,
        Stage::Remux,
    ];

    /// Human-readable label for progress displays.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::DependencyCheck => "Checking dependencies",
            Stage::WorkspacePrepare => "Preparing workspace",
            Stage::RateProbe => "Probing frame rate",
            Stage::TargetCompute => "Computing target rate",
            Stage::AudioExtract => "Extracting audio",
            Stage::FrameExtract => "Extracting frames",
            Stage::Interpolate => "AI interpolation",
            Stage::SecondaryInterpolate => "Secondary interpolation",
            Stage::Remux => "Encoding video",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Running,
    Completed,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageState {
    pub stage: Stage,
    pub status: StepStatus,
}

/// Event emitted by a pipeline run for consumption by a frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// Overall progress has advanced.
    Progress { percent: f32, message: String },
    /// A stage has changed status.
    StageStatus { stage: Stage, status: StepStatus },
    /// The run finished and produced an output file.
    Finished { output: PathBuf },
    /// The run failed.
    Failed { message: String },
}

impl PipelineEvent {
    /// Create a Progress event.
    pub fn progress(percent: f32, message: impl Into<String>) -> Self {
        PipelineEvent::Progress {
            percent,
            message: message.into(),
        }
    }

    /// Create a StageStatus event.
    pub fn stage_status(stage: Stage, status: StepStatus) -> Self {
        PipelineEvent::StageStatus { stage, status }
    }

    /// Create a Finished event.
    pub fn finished(output: PathBuf) -> Self {
        PipelineEvent::Finished { output }
    }

    /// Create a Failed event.
    pub fn failed(message: impl Into<String>) -> Self {
        PipelineEvent::Failed {
            message: message.into(),
        }
    }
}

/// Terminal outcome of a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    Finished { output: PathBuf },
    Failed { message: String },
}

/// Aggregate view of a run, built by folding its events in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineState {
    pub progress: f32,
    pub message: String,
    pub current_stage: Option<Stage>,
    pub stages: Vec<StageState>,
    pub outcome: Option<RunOutcome>,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            progress: 0.0,
            message: String::new(),
            current_stage: None,
            stages: Stage::ALL
                .iter()
                .map(|&stage| StageState {
                    stage,
                    status: StepStatus::Pending,
                })
                .collect(),
            outcome: None,
        }
    }
}

impl PipelineState {
    pub fn apply(&mut self, event: &PipelineEvent) {
        match event {
            PipelineEvent::Progress { percent, message } => {
                self.progress = percent.clamp(0.0, 100.0);
                self.message = message.clone();
            }
            PipelineEvent::StageStatus { stage, status } => {
                if let Some(entry) = self.stages.iter_mut().find(|s| s.stage == *stage) {
                    entry.status = *status;
                }
                if *status == StepStatus::Running {
                    self.current_stage = Some(*stage);
                }
            }
            PipelineEvent::Finished { output } => {
                self.progress = 100.0;
                self.current_stage = None;
                self.outcome = Some(RunOutcome::Finished {
                    output: output.clone(),
                });
            }
            PipelineEvent::Failed { message } => {
                self.outcome = Some(RunOutcome::Failed {
                    message: message.clone(),
                });
            }
        }
    }

    pub fn stage_status(&self, stage: Stage) -> StepStatus {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .map(|s| s.status)
            .unwrap_or(StepStatus::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }
}
