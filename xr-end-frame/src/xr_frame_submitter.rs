use xr_end_frame_api::{
    CompositionLayer, EndFrameConfig, SubmissionResult, ValidationError, XrFrameEndInfo, XrFrameState, XrLayer,
    XrSession, XrTime,
};

/// Where a submitter stands with respect to its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitterState {
    // Frames can be submitted once the session has an open frame.
    Ready,
    // A fatal failure was reported. Terminal until the host recreates the
    // session, and a new submitter with it.
    SessionLost,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitterStats {
    /// Frames handed to the session, including skipped frames.
    pub submitted: u64,
    /// Frames handed to the session with no layers.
    pub skipped: u64,
    pub transient_failures: u64,
    pub fatal_failures: u64,
    /// Frames rejected before reaching the session.
    pub rejected: u64,
}

/// Submits the layers of each frame to a session's compositor.
///
/// The submitter borrows its session: the pipeline owns the session and must
/// keep it alive for as long as the submitter exists. `submit` takes
/// `&mut self`, so one submitter never has two submissions in flight.
pub struct FrameSubmitter<'s, S: XrSession + ?Sized> {
    session: &'s S,
    config: EndFrameConfig,
    last_display_time: Option<XrTime>,
    last_frame_index: Option<u64>,
    state: SubmitterState,
    stats: SubmitterStats,
}

impl<'s, S: XrSession + ?Sized> FrameSubmitter<'s, S> {
    pub fn new(session: &'s S, config: EndFrameConfig) -> FrameSubmitter<'s, S> {
        debug!("Creating frame submitter for session {}", session.id());
        FrameSubmitter {
            session: session,
            config: config,
            last_display_time: None,
            last_frame_index: None,
            state: SubmitterState::Ready,
            stats: SubmitterStats::default(),
        }
    }

    pub fn session(&self) -> &'s S {
        self.session
    }

    pub fn state(&self) -> SubmitterState {
        self.state
    }

    pub fn stats(&self) -> SubmitterStats {
        self.stats
    }

    /// Predicted display time of the last frame the session accepted.
    pub fn last_display_time(&self) -> Option<XrTime> {
        self.last_display_time
    }

    /// Ends the session's current frame with the layers of `frame`.
    ///
    /// Frames that fail validation are returned as `Err` and never reach the
    /// session. Anything the session reports comes back as a
    /// `SubmissionResult`.
    pub fn submit(&mut self, frame: XrFrameState) -> Result<SubmissionResult, ValidationError> {
        if let Err(err) = self.validate(&frame) {
            self.stats.rejected += 1;
            return Err(err);
        }

        let info = XrFrameEndInfo {
            display_time: frame.predicted_display_time,
            blend_mode: self.config.blend_mode,
            layers: frame.layers.iter().map(CompositionLayer::from).collect(),
        };

        trace!(
            "Ending frame {} on session {}: {} layers at {}",
            frame.frame_index,
            self.session.id(),
            info.layer_count(),
            info.display_time
        );
        let result = SubmissionResult::from(self.session.end_frame(&info));

        self.stats.submitted += 1;
        if frame.is_skip_frame() {
            self.stats.skipped += 1;
        }

        match result {
            SubmissionResult::Success | SubmissionResult::TransientFailure(_) => {
                // The frame bracket was closed, so this time is spent either way.
                self.last_display_time = Some(frame.predicted_display_time);
                self.last_frame_index = Some(frame.frame_index);
                if let SubmissionResult::TransientFailure(ref reason) = result {
                    self.stats.transient_failures += 1;
                    debug!("Frame {} not presented: {}", frame.frame_index, reason);
                }
            }
            SubmissionResult::FatalFailure(ref reason) => {
                self.stats.fatal_failures += 1;
                self.state = SubmitterState::SessionLost;
                debug!(
                    "Session {} lost while ending frame {}: {}",
                    self.session.id(),
                    frame.frame_index,
                    reason
                );
            }
        }

        Ok(result)
    }

    fn validate(&self, frame: &XrFrameState) -> Result<(), ValidationError> {
        if self.state == SubmitterState::SessionLost {
            return Err(ValidationError::SessionLost {
                session_id: self.session.id(),
            });
        }

        if !self.session.is_frame_active() {
            return Err(ValidationError::NoActiveFrame {
                session_id: self.session.id(),
            });
        }

        if let Some(previous) = self.last_display_time {
            if frame.predicted_display_time <= previous {
                return Err(ValidationError::NonMonotonicDisplayTime {
                    previous: previous,
                    got: frame.predicted_display_time,
                });
            }
        }

        if let Some(previous) = self.last_frame_index {
            if frame.frame_index <= previous {
                return Err(ValidationError::FrameIndexRegressed {
                    previous: previous,
                    got: frame.frame_index,
                });
            }
        }

        if frame.layers.len() > self.config.max_layers {
            return Err(ValidationError::TooManyLayers {
                count: frame.layers.len(),
                max: self.config.max_layers,
            });
        }

        for (index, layer) in frame.layers.iter().enumerate() {
            validate_layer(layer).map_err(|reason| ValidationError::InvalidLayer {
                index: index,
                reason: reason,
            })?;
        }

        Ok(())
    }
}

fn validate_layer(layer: &XrLayer) -> Result<(), &'static str> {
    if layer.color.image_rect.is_empty() {
        return Err("empty color image rect");
    }
    if let Some(ref depth) = layer.depth {
        if depth.image_rect.is_empty() {
            return Err("empty depth image rect");
        }
    }
    if !layer.pose.is_finite() || !layer.pose.has_unit_orientation() {
        return Err("pose orientation is not a unit quaternion");
    }
    if !layer.fov.is_finite() {
        return Err("non-finite field of view");
    }
    Ok(())
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::api::MockXrSession;
    use xr_end_frame_api::{
        DeviceResult, FailureReason, XrFieldOfView, XrPose, XrRect, XrSwapchainImage,
    };

    fn eye_layer(view_index: u32) -> XrLayer {
        let color = XrSwapchainImage::new(1, XrRect::new(756 * view_index as i32, 0, 756, 1680));
        XrLayer::projection(
            view_index,
            color,
            XrPose::default(),
            XrFieldOfView::from_degrees(55.8, 51.3, 55.7, 54.4),
        )
    }

    fn frame(index: u64, time: i64, layers: Vec<XrLayer>) -> XrFrameState {
        XrFrameState::new(index, XrTime::from_nanos(time), layers)
    }

    #[test]
    fn test_success_updates_last_time() {
        let session = MockXrSession::new();
        let mut submitter = FrameSubmitter::new(&session, EndFrameConfig::default());

        session.begin_frame();
        let result = submitter.submit(frame(1, 1000, vec![eye_layer(0)]));
        assert_eq!(result, Ok(SubmissionResult::Success));
        assert_eq!(submitter.last_display_time(), Some(XrTime::from_nanos(1000)));
        assert_eq!(session.end_frame_calls(), 1);
    }

    #[test]
    fn test_earlier_display_time_never_reaches_device() {
        let session = MockXrSession::new();
        let mut submitter = FrameSubmitter::new(&session, EndFrameConfig::default());

        session.begin_frame();
        submitter.submit(frame(1, 1000, vec![eye_layer(0)])).unwrap();

        session.begin_frame();
        let result = submitter.submit(frame(2, 900, vec![eye_layer(0)]));
        assert_eq!(
            result,
            Err(ValidationError::NonMonotonicDisplayTime {
                previous: XrTime::from_nanos(1000),
                got: XrTime::from_nanos(900),
            })
        );
        assert_eq!(session.end_frame_calls(), 1);
        assert_eq!(submitter.last_display_time(), Some(XrTime::from_nanos(1000)));
        assert_eq!(submitter.stats().rejected, 1);
    }

    #[test]
    fn test_repeated_display_time_is_rejected() {
        let session = MockXrSession::new();
        let mut submitter = FrameSubmitter::new(&session, EndFrameConfig::default());

        session.begin_frame();
        submitter.submit(frame(1, 1000, vec![eye_layer(0)])).unwrap();
        session.begin_frame();
        let result = submitter.submit(frame(2, 1000, vec![eye_layer(0)]));
        assert!(matches!(result, Err(ValidationError::NonMonotonicDisplayTime { .. })));
    }

    #[test]
    fn test_frame_index_must_advance() {
        let session = MockXrSession::new();
        let mut submitter = FrameSubmitter::new(&session, EndFrameConfig::default());

        session.begin_frame();
        submitter.submit(frame(5, 1000, vec![eye_layer(0)])).unwrap();
        session.begin_frame();
        let result = submitter.submit(frame(5, 2000, vec![eye_layer(0)]));
        assert_eq!(result, Err(ValidationError::FrameIndexRegressed { previous: 5, got: 5 }));
        assert_eq!(session.end_frame_calls(), 1);
    }

    #[test]
    fn test_no_active_frame() {
        let session = MockXrSession::new();
        let mut submitter = FrameSubmitter::new(&session, EndFrameConfig::default());

        let result = submitter.submit(frame(1, 1000, vec![eye_layer(0)]));
        assert_eq!(result, Err(ValidationError::NoActiveFrame { session_id: session.id() }));
        assert_eq!(session.end_frame_calls(), 0);
    }

    #[test]
    fn test_skip_frame_closes_bracket() {
        let session = MockXrSession::new();
        let mut submitter = FrameSubmitter::new(&session, EndFrameConfig::default());

        session.begin_frame();
        let result = submitter.submit(XrFrameState::skipped(1, XrTime::from_nanos(1000)));
        assert_eq!(result, Ok(SubmissionResult::Success));

        let submissions = session.submissions();
        assert_eq!(submissions.len(), 1);
        assert!(submissions[0].layers.is_empty());
        assert!(!session.is_frame_active());
        assert_eq!(submitter.stats().skipped, 1);
    }

    #[test]
    fn test_layer_order_is_preserved() {
        let session = MockXrSession::new();
        let mut submitter = FrameSubmitter::new(&session, EndFrameConfig::default());

        // Duplicates included: nothing is merged.
        let layers = vec![eye_layer(1), eye_layer(0), eye_layer(1), eye_layer(0)];
        session.begin_frame();
        submitter.submit(frame(1, 1000, layers.clone())).unwrap();

        let submitted = &session.submissions()[0].layers;
        let expected: Vec<CompositionLayer> = layers.iter().map(CompositionLayer::from).collect();
        assert_eq!(submitted, &expected);
    }

    #[test]
    fn test_transient_failure_keeps_session() {
        let session = MockXrSession::new();
        let mut submitter = FrameSubmitter::new(&session, EndFrameConfig::default());

        session.queue_result(DeviceResult::SessionNotVisible);
        session.begin_frame();
        let result = submitter.submit(frame(1, 1000, vec![eye_layer(0)]));
        assert_eq!(result, Ok(SubmissionResult::TransientFailure(FailureReason::SessionNotVisible)));
        assert_eq!(submitter.state(), SubmitterState::Ready);

        session.begin_frame();
        assert_eq!(submitter.submit(frame(2, 2000, vec![eye_layer(0)])), Ok(SubmissionResult::Success));
        assert_eq!(submitter.stats().transient_failures, 1);
    }

    #[test]
    fn test_fatal_failure_latches() {
        let session = MockXrSession::new();
        let mut submitter = FrameSubmitter::new(&session, EndFrameConfig::default());

        session.queue_result(DeviceResult::SessionLoss);
        session.begin_frame();
        let result = submitter.submit(frame(1, 1000, vec![eye_layer(0)]));
        assert_eq!(result, Ok(SubmissionResult::FatalFailure(FailureReason::SessionLoss)));
        assert_eq!(submitter.state(), SubmitterState::SessionLost);
        assert_eq!(submitter.last_display_time(), None);

        // Even with a frame open and a healthy device answer queued.
        session.begin_frame();
        session.queue_result(DeviceResult::Ok);
        let result = submitter.submit(frame(2, 2000, vec![eye_layer(0)]));
        assert_eq!(result, Err(ValidationError::SessionLost { session_id: session.id() }));
        assert_eq!(session.end_frame_calls(), 1);
    }

    #[test]
    fn test_too_many_layers() {
        let session = MockXrSession::new();
        let config = EndFrameConfig::default().with_max_layers(2);
        let mut submitter = FrameSubmitter::new(&session, config);

        session.begin_frame();
        let result = submitter.submit(frame(1, 1000, vec![eye_layer(0), eye_layer(1), eye_layer(0)]));
        assert_eq!(result, Err(ValidationError::TooManyLayers { count: 3, max: 2 }));
        assert_eq!(session.end_frame_calls(), 0);
        assert!(session.is_frame_active());
    }

    #[test]
    fn test_invalid_layer_reports_index() {
        let session = MockXrSession::new();
        let mut submitter = FrameSubmitter::new(&session, EndFrameConfig::default());

        let mut bad = eye_layer(1);
        bad.pose.orientation = [0.0, 0.0, 0.0, 0.0];
        session.begin_frame();
        let result = submitter.submit(frame(1, 1000, vec![eye_layer(0), bad]));
        assert!(matches!(result, Err(ValidationError::InvalidLayer { index: 1, .. })));

        let mut empty = eye_layer(0);
        empty.color.image_rect = XrRect::new(0, 0, 0, 0);
        let result = submitter.submit(frame(1, 1000, vec![empty]));
        assert!(matches!(result, Err(ValidationError::InvalidLayer { index: 0, .. })));
        assert_eq!(session.end_frame_calls(), 0);
    }

    #[test]
    fn test_blend_mode_is_forwarded() {
        use xr_end_frame_api::XrBlendMode;

        let session = MockXrSession::new();
        let config = EndFrameConfig::default().with_blend_mode(XrBlendMode::Additive);
        let mut submitter = FrameSubmitter::new(&session, config);

        session.begin_frame();
        submitter.submit(frame(1, 1000, vec![eye_layer(0)])).unwrap();
        assert_eq!(session.submissions()[0].blend_mode, XrBlendMode::Additive);
        assert_eq!(session.submissions()[0].display_time, XrTime::from_nanos(1000));
    }
}
