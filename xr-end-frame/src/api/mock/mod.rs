mod session;

pub use self::session::{MockXrSession, MockXrSessionPtr, MockXrState};
