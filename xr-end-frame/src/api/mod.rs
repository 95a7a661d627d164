#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use self::mock::{MockXrSession, MockXrSessionPtr, MockXrState};

#[cfg(feature = "openxr")]
mod openxr;
#[cfg(feature = "openxr")]
pub use self::openxr::OpenXrSession;
