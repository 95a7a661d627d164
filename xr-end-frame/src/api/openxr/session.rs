use ::openxr as xr;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use xr_end_frame_api::utils;
use xr_end_frame_api::{
    CompositionLayer, DeviceResult, XrBlendMode, XrFrameEndInfo, XrLayerKind, XrPose, XrFieldOfView, XrRect,
    XrSession,
};

/// An OpenXR session as seen by the end-frame stage.
///
/// The owner keeps driving `xrWaitFrame` and the session lifecycle; this
/// wrapper begins and ends frames and holds the swapchains layers refer to.
pub struct OpenXrSession<G: xr::Graphics> {
    id: u32,
    state: Mutex<OpenXrFrameState<G>>,
}

struct OpenXrFrameState<G: xr::Graphics> {
    session: xr::Session<G>,
    frame_stream: xr::FrameStream<G>,
    space: xr::Space,
    swapchains: HashMap<u32, xr::Swapchain<G>>,
    next_swapchain_id: u32,
    frame_active: bool,
    visible: bool,
    loss_pending: bool,
}

// Layers ready to hand to the runtime, in submission order.
enum LayerGroup<'a, G: xr::Graphics> {
    Projection(xr::CompositionLayerFlags, Vec<xr::CompositionLayerProjectionView<'a, G>>),
    Quad(xr::CompositionLayerQuad<'a, G>),
}

impl<G: xr::Graphics> OpenXrSession<G> {
    pub fn new(session: xr::Session<G>, frame_stream: xr::FrameStream<G>, space: xr::Space) -> OpenXrSession<G> {
        let id = utils::new_id();
        info!("Creating OpenXR end-frame session {}", id);
        OpenXrSession {
            id: id,
            state: Mutex::new(OpenXrFrameState {
                session: session,
                frame_stream: frame_stream,
                space: space,
                swapchains: HashMap::new(),
                next_swapchain_id: 0,
                frame_active: false,
                visible: false,
                loss_pending: false,
            }),
        }
    }

    /// Makes `swapchain` available to layers under the returned id.
    pub fn register_swapchain(&self, swapchain: xr::Swapchain<G>) -> u32 {
        let mut state = self.lock();
        let id = state.next_swapchain_id;
        state.next_swapchain_id += 1;
        state.swapchains.insert(id, swapchain);
        id
    }

    pub fn unregister_swapchain(&self, swapchain_id: u32) -> Option<xr::Swapchain<G>> {
        self.lock().swapchains.remove(&swapchain_id)
    }

    /// Runs `f` with the underlying session, e.g. to locate views.
    pub fn with_session<R, F: FnOnce(&xr::Session<G>) -> R>(&self, f: F) -> R {
        f(&self.lock().session)
    }

    /// Records a state change polled from the instance's event queue.
    pub fn set_session_state(&self, session_state: xr::SessionState) {
        let mut state = self.lock();
        state.visible = session_state == xr::SessionState::VISIBLE || session_state == xr::SessionState::FOCUSED;
        if session_state == xr::SessionState::LOSS_PENDING {
            state.loss_pending = true;
        }
        debug!("Session {} is now {:?}", self.id, session_state);
    }

    /// Begins a frame after the owner's `xrWaitFrame` returned.
    pub fn begin_frame(&self) -> xr::Result<()> {
        let mut state = self.lock();
        state.frame_stream.begin()?;
        state.frame_active = true;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<OpenXrFrameState<G>> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<G: xr::Graphics + Send> XrSession for OpenXrSession<G> {
    fn id(&self) -> u32 {
        self.id
    }

    fn is_frame_active(&self) -> bool {
        self.lock().frame_active
    }

    fn end_frame(&self, info: &XrFrameEndInfo) -> DeviceResult {
        let mut guard = self.lock();
        let state = &mut *guard;

        if state.loss_pending {
            return DeviceResult::SessionLoss;
        }

        let display_time = xr::Time::from_nanos(info.display_time.as_nanos());
        let blend_mode = blend_mode_to_openxr(info.blend_mode);

        if !state.visible {
            // The bracket must still be closed; nothing is shown.
            let result = state.frame_stream.end(display_time, blend_mode, &[]);
            state.frame_active = false;
            return match device_result(result) {
                DeviceResult::Ok => DeviceResult::SessionNotVisible,
                other => other,
            };
        }

        let slots = match plan_layers(&info.layers) {
            Ok(slots) => slots,
            Err(reason) => return reject_frame(state, display_time, blend_mode, reason),
        };

        let space = &state.space;
        let groups = match group_layers(&info.layers, &slots, &state.swapchains, space) {
            Ok(groups) => groups,
            Err(swapchain_id) => {
                let reason = format!("unknown swapchain {}", swapchain_id);
                return reject_frame(state, display_time, blend_mode, reason);
            }
        };

        let projections: Vec<xr::CompositionLayerProjection<G>> = groups
            .iter()
            .filter_map(|group| match *group {
                LayerGroup::Projection(flags, ref views) => Some(
                    xr::CompositionLayerProjection::new()
                        .layer_flags(flags)
                        .space(space)
                        .views(views),
                ),
                LayerGroup::Quad(_) => None,
            })
            .collect();

        let mut projections = projections.iter();
        let layers: Vec<&xr::CompositionLayerBase<G>> = groups
            .iter()
            .filter_map(|group| match *group {
                LayerGroup::Projection(..) => projections.next().map(|layer| &**layer),
                LayerGroup::Quad(ref quad) => Some(&**quad),
            })
            .collect();

        let result = state.frame_stream.end(display_time, blend_mode, &layers);
        state.frame_active = false;
        device_result(result)
    }
}

// Closes the bracket with no layers after a frame could not be built.
fn reject_frame<G: xr::Graphics>(
    state: &mut OpenXrFrameState<G>,
    display_time: xr::Time,
    blend_mode: xr::EnvironmentBlendMode,
    reason: String,
) -> DeviceResult {
    warn!("Dropping frame layers: {}", reason);
    let result = state.frame_stream.end(display_time, blend_mode, &[]);
    state.frame_active = false;
    match device_result(result) {
        DeviceResult::Ok => DeviceResult::FrameRejected(reason),
        other => other,
    }
}

/// Where each input layer lands in the runtime's layer list.
#[derive(Debug, PartialEq)]
enum LayerSlot {
    // Indices of the views sharing one projection layer.
    Projection(Vec<usize>),
    Quad(usize),
}

// Consecutive projection views share one projection until a view index of 0
// or a quad starts the next layer. Layer flags belong to the projection, so
// its views must agree on them.
fn plan_layers(layers: &[CompositionLayer]) -> Result<Vec<LayerSlot>, String> {
    let mut slots: Vec<LayerSlot> = Vec::new();
    for (index, layer) in layers.iter().enumerate() {
        match layer.kind {
            XrLayerKind::Projection => {
                if layer.view_index != 0 {
                    if let Some(&mut LayerSlot::Projection(ref mut views)) = slots.last_mut() {
                        let first = &layers[views[0]];
                        if first.flags != layer.flags {
                            return Err(format!(
                                "view {} has flags {:?}, its projection has {:?}",
                                layer.view_index, layer.flags, first.flags
                            ));
                        }
                        views.push(index);
                        continue;
                    }
                }
                slots.push(LayerSlot::Projection(vec![index]));
            }
            XrLayerKind::Quad { .. } => slots.push(LayerSlot::Quad(index)),
        }
    }
    Ok(slots)
}

fn group_layers<'a, G: xr::Graphics>(
    layers: &[CompositionLayer],
    slots: &[LayerSlot],
    swapchains: &'a HashMap<u32, xr::Swapchain<G>>,
    space: &'a xr::Space,
) -> Result<Vec<LayerGroup<'a, G>>, u32> {
    let sub_image = move |layer: &CompositionLayer| -> Result<xr::SwapchainSubImage<'a, G>, u32> {
        let swapchain = swapchains
            .get(&layer.sub_image.swapchain_id)
            .ok_or(layer.sub_image.swapchain_id)?;
        if layer.depth_sub_image.is_some() {
            // Needs XR_KHR_composition_layer_depth chained on the view.
            trace!("Ignoring depth buffer of view {}", layer.view_index);
        }
        Ok(xr::SwapchainSubImage::new()
            .swapchain(swapchain)
            .image_array_index(layer.sub_image.image_array_index)
            .image_rect(rect_to_openxr(&layer.sub_image.image_rect)))
    };

    let mut groups = Vec::with_capacity(slots.len());
    for slot in slots {
        match *slot {
            LayerSlot::Projection(ref indices) => {
                let mut views = Vec::with_capacity(indices.len());
                for &index in indices {
                    let layer = &layers[index];
                    views.push(
                        xr::CompositionLayerProjectionView::new()
                            .pose(pose_to_openxr(&layer.pose))
                            .fov(fov_to_openxr(&layer.fov))
                            .sub_image(sub_image(layer)?),
                    );
                }
                let flags = xr::CompositionLayerFlags::from_raw(layers[indices[0]].flags.bits());
                groups.push(LayerGroup::Projection(flags, views));
            }
            LayerSlot::Quad(index) => {
                let layer = &layers[index];
                let (width, height) = match layer.kind {
                    XrLayerKind::Quad { width, height } => (width, height),
                    XrLayerKind::Projection => continue,
                };
                let quad = xr::CompositionLayerQuad::new()
                    .layer_flags(xr::CompositionLayerFlags::from_raw(layer.flags.bits()))
                    .space(space)
                    .eye_visibility(xr::EyeVisibility::BOTH)
                    .sub_image(sub_image(layer)?)
                    .pose(pose_to_openxr(&layer.pose))
                    .size(xr::Extent2Df { width: width, height: height });
                groups.push(LayerGroup::Quad(quad));
            }
        }
    }
    Ok(groups)
}

fn device_result(result: xr::Result<()>) -> DeviceResult {
    match result {
        Ok(()) => DeviceResult::Ok,
        Err(code) if code == xr::sys::Result::ERROR_SESSION_LOST => DeviceResult::SessionLoss,
        Err(code) if code == xr::sys::Result::ERROR_INSTANCE_LOST => DeviceResult::InstanceLoss,
        Err(code) if code == xr::sys::Result::ERROR_SESSION_NOT_RUNNING => DeviceResult::SessionNotVisible,
        // The runtime refused this frame's content; the session itself is intact.
        Err(code)
            if code == xr::sys::Result::ERROR_VALIDATION_FAILURE
                || code == xr::sys::Result::ERROR_LAYER_INVALID
                || code == xr::sys::Result::ERROR_LAYER_LIMIT_EXCEEDED
                || code == xr::sys::Result::ERROR_SWAPCHAIN_RECT_INVALID
                || code == xr::sys::Result::ERROR_POSE_INVALID
                || code == xr::sys::Result::ERROR_TIME_INVALID =>
        {
            DeviceResult::FrameRejected(format!("{:?}", code))
        }
        Err(code) => DeviceResult::RuntimeFailure(format!("{:?}", code)),
    }
}

fn blend_mode_to_openxr(mode: XrBlendMode) -> xr::EnvironmentBlendMode {
    match mode {
        XrBlendMode::Opaque => xr::EnvironmentBlendMode::OPAQUE,
        XrBlendMode::Additive => xr::EnvironmentBlendMode::ADDITIVE,
        XrBlendMode::AlphaBlend => xr::EnvironmentBlendMode::ALPHA_BLEND,
    }
}

fn pose_to_openxr(pose: &XrPose) -> xr::Posef {
    let [px, py, pz] = pose.position;
    let [x, y, z, w] = pose.orientation;
    xr::Posef {
        orientation: xr::Quaternionf { x: x, y: y, z: z, w: w },
        position: xr::Vector3f { x: px, y: py, z: pz },
    }
}

fn fov_to_openxr(fov: &XrFieldOfView) -> xr::Fovf {
    xr::Fovf {
        angle_left: fov.angle_left,
        angle_right: fov.angle_right,
        angle_up: fov.angle_up,
        angle_down: fov.angle_down,
    }
}

fn rect_to_openxr(rect: &XrRect) -> xr::Rect2Di {
    xr::Rect2Di {
        offset: xr::Offset2Di { x: rect.x, y: rect.y },
        extent: xr::Extent2Di {
            width: rect.width,
            height: rect.height,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xr_end_frame_api::{XrLayer, XrLayerFlags, XrSwapchainImage};

    fn view(view_index: u32) -> CompositionLayer {
        let color = XrSwapchainImage::new(0, XrRect::new(view_index as i32 * 1024, 0, 1024, 1024));
        let pose = XrPose::new([0.0, 1.6, 0.0], [0.0, 0.0, 0.0, 1.0]);
        let fov = XrFieldOfView::from_degrees(45.0, 45.0, 45.0, 45.0);
        CompositionLayer::from(&XrLayer::projection(view_index, color, pose, fov))
    }

    fn quad() -> CompositionLayer {
        let color = XrSwapchainImage::new(1, XrRect::new(0, 0, 256, 128));
        let pose = XrPose::new([0.0, 1.2, -1.0], [0.0, 0.0, 0.0, 1.0]);
        CompositionLayer::from(&XrLayer::quad(color, pose, 0.5, 0.25))
    }

    #[test]
    fn test_views_share_a_projection() {
        let layers = vec![view(0), view(1), quad(), view(0), view(1)];
        let slots = plan_layers(&layers).unwrap();
        assert_eq!(
            slots,
            vec![
                LayerSlot::Projection(vec![0, 1]),
                LayerSlot::Quad(2),
                LayerSlot::Projection(vec![3, 4]),
            ]
        );
    }

    #[test]
    fn test_view_zero_starts_a_projection() {
        let layers = vec![view(0), view(1), view(0), view(1)];
        let slots = plan_layers(&layers).unwrap();
        assert_eq!(slots, vec![LayerSlot::Projection(vec![0, 1]), LayerSlot::Projection(vec![2, 3])]);
        assert!(plan_layers(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_quad_splits_views() {
        // A view after a quad cannot join the projection behind it.
        let layers = vec![view(0), quad(), view(1)];
        let slots = plan_layers(&layers).unwrap();
        assert_eq!(
            slots,
            vec![LayerSlot::Projection(vec![0]), LayerSlot::Quad(1), LayerSlot::Projection(vec![2])]
        );
    }

    #[test]
    fn test_views_with_different_flags_are_refused() {
        let mut right = view(1);
        right.flags = XrLayerFlags::BLEND_TEXTURE_SOURCE_ALPHA;
        let err = plan_layers(&[view(0), right]).unwrap_err();
        assert!(err.contains("view 1"), "{}", err);

        let mut left = view(0);
        left.flags = XrLayerFlags::BLEND_TEXTURE_SOURCE_ALPHA;
        let mut right = view(1);
        right.flags = XrLayerFlags::BLEND_TEXTURE_SOURCE_ALPHA;
        assert_eq!(plan_layers(&[left, right]).unwrap(), vec![LayerSlot::Projection(vec![0, 1])]);
    }

    #[test]
    fn test_result_codes() {
        assert_eq!(device_result(Ok(())), DeviceResult::Ok);
        assert_eq!(device_result(Err(xr::sys::Result::ERROR_SESSION_LOST)), DeviceResult::SessionLoss);
        assert_eq!(device_result(Err(xr::sys::Result::ERROR_INSTANCE_LOST)), DeviceResult::InstanceLoss);
        assert_eq!(
            device_result(Err(xr::sys::Result::ERROR_SESSION_NOT_RUNNING)),
            DeviceResult::SessionNotVisible
        );
        for &code in &[
            xr::sys::Result::ERROR_VALIDATION_FAILURE,
            xr::sys::Result::ERROR_LAYER_INVALID,
            xr::sys::Result::ERROR_SWAPCHAIN_RECT_INVALID,
            xr::sys::Result::ERROR_TIME_INVALID,
        ] {
            match device_result(Err(code)) {
                DeviceResult::FrameRejected(_) => {}
                other => panic!("{:?} mapped to {:?}", code, other),
            }
        }
        match device_result(Err(xr::sys::Result::ERROR_RUNTIME_FAILURE)) {
            DeviceResult::RuntimeFailure(_) => {}
            other => panic!("runtime failure mapped to {:?}", other),
        }
    }

    #[test]
    fn test_conversions() {
        assert_eq!(blend_mode_to_openxr(XrBlendMode::Opaque), xr::EnvironmentBlendMode::OPAQUE);
        assert_eq!(blend_mode_to_openxr(XrBlendMode::Additive), xr::EnvironmentBlendMode::ADDITIVE);
        assert_eq!(blend_mode_to_openxr(XrBlendMode::AlphaBlend), xr::EnvironmentBlendMode::ALPHA_BLEND);

        let rect = rect_to_openxr(&XrRect::new(1024, 8, 1000, 900));
        assert_eq!((rect.offset.x, rect.offset.y), (1024, 8));
        assert_eq!((rect.extent.width, rect.extent.height), (1000, 900));

        let pose = pose_to_openxr(&XrPose::new([1.0, 2.0, 3.0], [0.0, 0.6, 0.0, 0.8]));
        assert_eq!((pose.position.x, pose.position.y, pose.position.z), (1.0, 2.0, 3.0));
        assert_eq!(
            (pose.orientation.x, pose.orientation.y, pose.orientation.z, pose.orientation.w),
            (0.0, 0.6, 0.0, 0.8)
        );

        let fov = XrFieldOfView::from_degrees(40.0, 45.0, 50.0, 55.0);
        let converted = fov_to_openxr(&fov);
        assert_eq!(converted.angle_left, fov.angle_left);
        assert_eq!(converted.angle_right, fov.angle_right);
        assert_eq!(converted.angle_up, fov.angle_up);
        assert_eq!(converted.angle_down, fov.angle_down);
    }
}
