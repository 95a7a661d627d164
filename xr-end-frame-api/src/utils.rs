use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering::SeqCst;

static SESSION_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

// Generates a unique identifier for any XrSession
pub fn new_id() -> u32 {
    let id = SESSION_ID_COUNTER.fetch_add(1, SeqCst) as u32;
    trace!("Allocated session id {}", id);
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
    }
}
