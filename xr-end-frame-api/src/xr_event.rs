/// Events the end-frame stage reports to its host.
///
/// Only unrecoverable conditions are reported here; transient failures are
/// absorbed by the stage.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub enum XrSessionEvent {
    // The session must be recreated before frames can be submitted again.
    // param: session id, frame index of the failed submission, reason
    SessionLost(u32, u64, String),

    // The runtime instance must be recreated, along with every session.
    // param: session id, frame index of the failed submission, reason
    InstanceLost(u32, u64, String),
}

