mod types;

pub use types::*;

use tokio::sync::mpsc;

/// Sending half of the pipeline event stream.
///
/// Cheap to clone. Sends never block; if the receiving side has gone away
/// the event is dropped.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<PipelineEvent>,
}

impl EventSink {
    /// Create a sink together with its receiver.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PipelineEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Emit an event to the consumer, if any.
    pub fn emit(&self, event: PipelineEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("No consumer for pipeline event");
        }
    }

    pub fn progress(&self, percent: f32, message: impl Into<String>) {
        self.emit(PipelineEvent::progress(percent, message));
    }

    pub fn stage(&self, stage: Stage, status: StepStatus) {
        self.emit(PipelineEvent::stage_status(stage, status));
    }
}
