//! Room identifier generation.
//!
//! The registry never invents ids itself; it asks an [`IdGenerator`]
//! injected at construction. Production uses [`RandomIdGenerator`], tests
//! swap in [`SequentialIdGenerator`] to get predictable ids.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

/// Produces room identifiers.
///
/// Implementations must return ids that are unique with overwhelming
/// probability over the lifetime of the process. The registry calls
/// `generate_id` while holding its lock, so it must not block.
pub trait IdGenerator: Send + Sync + 'static {
    fn generate_id(&self) -> String;
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn generate_id(&self) -> String {
        (**self).generate_id()
    }
}

/// 128 random bits rendered as 32 lowercase hex characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate_id(&self) -> String {
        let bytes: [u8; 16] = rand::rng().random();
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Deterministic `prefix-1`, `prefix-2`, ... ids.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("room")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", self.prefix)
    }
}
