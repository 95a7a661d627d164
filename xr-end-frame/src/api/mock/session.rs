use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use xr_end_frame_api::utils;
use xr_end_frame_api::{DeviceResult, MockXrControlMsg, XrFrameEndInfo, XrSession};

pub type MockXrSessionPtr = Arc<MockXrSession>;

/// An in-process session that records what it is given.
///
/// End-frame results are scripted with `queue_result`; once the queue is
/// empty every call succeeds, unless the session is hidden or lost.
pub struct MockXrSession {
    session_id: u32,
    state: Arc<Mutex<MockXrState>>,
}

pub struct MockXrState {
    frame_active: bool,
    visible: bool,
    lost: Option<DeviceResult>,
    results: VecDeque<DeviceResult>,
    submissions: Vec<XrFrameEndInfo>,
    end_frame_calls: usize,
}

impl Default for MockXrState {
    fn default() -> MockXrState {
        MockXrState {
            frame_active: false,
            visible: true,
            lost: None,
            results: VecDeque::new(),
            submissions: Vec::new(),
            end_frame_calls: 0,
        }
    }
}

impl MockXrSession {
    pub fn new() -> MockXrSession {
        MockXrSession {
            session_id: utils::new_id(),
            state: Default::default(),
        }
    }

    /// Creates a session driven by the returned sender from any thread.
    pub fn new_with_remote() -> (MockXrSessionPtr, Sender<MockXrControlMsg>) {
        let (send, rcv) = channel();
        let session = MockXrSession::new();
        spawn_control_thread(session.state_handle(), rcv);
        (Arc::new(session), send)
    }

    pub fn state_handle(&self) -> Arc<Mutex<MockXrState>> {
        self.state.clone()
    }

    pub fn begin_frame(&self) {
        self.lock().handle_msg(MockXrControlMsg::BeginFrame);
    }

    pub fn queue_result(&self, result: DeviceResult) {
        self.lock().handle_msg(MockXrControlMsg::QueueResult(result));
    }

    pub fn set_visible(&self, visible: bool) {
        self.lock().handle_msg(MockXrControlMsg::SetVisible(visible));
    }

    pub fn lose_session(&self) {
        self.lock().handle_msg(MockXrControlMsg::LoseSession);
    }

    pub fn lose_instance(&self) {
        self.lock().handle_msg(MockXrControlMsg::LoseInstance);
    }

    /// Every end-frame call that reached the compositor, oldest first.
    pub fn submissions(&self) -> Vec<XrFrameEndInfo> {
        self.lock().submissions.clone()
    }

    pub fn end_frame_calls(&self) -> usize {
        self.lock().end_frame_calls
    }

    fn lock(&self) -> MutexGuard<MockXrState> {
        // A panicking test thread must not hide the recorded state.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn spawn_control_thread(state: Arc<Mutex<MockXrState>>, rcv: Receiver<MockXrControlMsg>) {
    thread::spawn(move || {
        while let Ok(msg) = rcv.recv() {
            match state.lock() {
                Ok(mut state) => state.handle_msg(msg),
                Err(_) => break,
            }
        }
    });
}

impl XrSession for MockXrSession {
    fn id(&self) -> u32 {
        self.session_id
    }

    fn is_frame_active(&self) -> bool {
        self.lock().frame_active
    }

    fn end_frame(&self, info: &XrFrameEndInfo) -> DeviceResult {
        let mut state = self.lock();
        state.end_frame_calls += 1;

        if let Some(ref lost) = state.lost {
            return lost.clone();
        }
        if !state.frame_active {
            return DeviceResult::RuntimeFailure("XR_ERROR_CALL_ORDER_INVALID".into());
        }
        state.frame_active = false;

        if !state.visible {
            // Runtimes close the frame but show nothing.
            let mut hidden = info.clone();
            hidden.layers.clear();
            state.submissions.push(hidden);
            return DeviceResult::SessionNotVisible;
        }

        state.submissions.push(info.clone());
        let result = state.results.pop_front().unwrap_or(DeviceResult::Ok);
        match result {
            DeviceResult::SessionLoss | DeviceResult::InstanceLoss => state.lost = Some(result.clone()),
            _ => {}
        }
        result
    }
}

impl MockXrState {
    pub fn handle_msg(&mut self, msg: MockXrControlMsg) {
        match msg {
            MockXrControlMsg::BeginFrame => self.frame_active = true,
            MockXrControlMsg::QueueResult(result) => self.results.push_back(result),
            MockXrControlMsg::SetVisible(visible) => self.visible = visible,
            MockXrControlMsg::LoseSession => self.lost = Some(DeviceResult::SessionLoss),
            MockXrControlMsg::LoseInstance => self.lost = Some(DeviceResult::InstanceLoss),
        }
    }
}
