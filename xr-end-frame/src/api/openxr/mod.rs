mod session;

pub use self::session::OpenXrSession;
