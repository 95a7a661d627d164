use crate::xr_frame_submitter::{FrameSubmitter, SubmitterState, SubmitterStats};
use crate::xr_pipeline_stage::{PipelineStage, StageControl};
use std::sync::mpsc::Sender;
use xr_end_frame_api::{
    EndFrameConfig, FailureReason, SubmissionResult, XrFrameState, XrSession, XrSessionEvent,
};

/// Pipeline stage that ends each XR frame by submitting its layers to the
/// session for compositing and display.
///
/// Validation errors and transient device failures are logged and the
/// pipeline keeps running. Session or instance loss is reported once on the
/// fatal sink and halts the stage.
pub struct XrEndFrameStage<'s, S: XrSession + ?Sized> {
    submitter: FrameSubmitter<'s, S>,
    fatal_sink: Sender<XrSessionEvent>,
}

impl<'s, S: XrSession + ?Sized> XrEndFrameStage<'s, S> {
    pub fn new(session: &'s S, config: EndFrameConfig, fatal_sink: Sender<XrSessionEvent>) -> XrEndFrameStage<'s, S> {
        XrEndFrameStage {
            submitter: FrameSubmitter::new(session, config),
            fatal_sink: fatal_sink,
        }
    }

    pub fn stats(&self) -> SubmitterStats {
        self.submitter.stats()
    }

    pub fn is_halted(&self) -> bool {
        self.submitter.state() == SubmitterState::SessionLost
    }

    fn report_fatal(&self, frame_index: u64, reason: FailureReason) {
        let session_id = self.submitter.session().id();
        let event = match reason {
            FailureReason::InstanceLoss => XrSessionEvent::InstanceLost(session_id, frame_index, reason.to_string()),
            _ => XrSessionEvent::SessionLost(session_id, frame_index, reason.to_string()),
        };
        if self.fatal_sink.send(event).is_err() {
            warn!("Fatal sink for session {} is disconnected", session_id);
        }
    }
}

impl<'s, S: XrSession + ?Sized> PipelineStage for XrEndFrameStage<'s, S> {
    type Input = XrFrameState;

    fn compute(&mut self, frame: XrFrameState) -> StageControl {
        let frame_index = frame.frame_index;
        match self.submitter.submit(frame) {
            Ok(SubmissionResult::Success) => StageControl::Continue,
            Ok(SubmissionResult::TransientFailure(reason)) => {
                warn!("Frame {} dropped: {}", frame_index, reason);
                StageControl::Continue
            }
            Ok(SubmissionResult::FatalFailure(reason)) => {
                error!(
                    "XR session {} failed at frame {}: {}",
                    self.submitter.session().id(),
                    frame_index,
                    reason
                );
                self.report_fatal(frame_index, reason);
                StageControl::Halt
            }
            Err(err) => {
                error!("Rejected frame {}: {}", frame_index, err);
                if self.is_halted() {
                    StageControl::Halt
                } else {
                    StageControl::Continue
                }
            }
        }
    }
}
