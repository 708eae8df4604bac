//! Progress counters a running search publishes for an outside observer.
//!
//! The search keeps its authoritative counters in a per-call context; this is
//! a mirror that a display thread may poll. Reads are relaxed and may lag.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};

#[derive(Debug, Default)]
pub struct SearchProgress {
    nodes: AtomicU64,
    evaluated: AtomicU64,
    last_line: Mutex<String>,
}

/// Point-in-time copy of a [`SearchProgress`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    pub nodes: u64,
    pub evaluated: u64,
    pub last_line: String,
}

impl SearchProgress {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[inline]
    pub fn reset(&self) {
        self.nodes.store(0, Ordering::Relaxed);
        self.evaluated.store(0, Ordering::Relaxed);
        if let Ok(mut guard) = self.last_line.lock() {
            guard.clear();
        }
    }

    #[inline]
    pub fn publish_counts(&self, nodes: u64, evaluated: u64) {
        self.nodes.store(nodes, Ordering::Relaxed);
        self.evaluated.store(evaluated, Ordering::Relaxed);
    }

    pub fn publish_line(&self, line: &str) {
        if let Ok(mut guard) = self.last_line.lock() {
            guard.clear();
            guard.push_str(line);
        }
    }

    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn evaluated(&self) -> u64 {
        self.evaluated.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let last_line = match self.last_line.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => String::new(),
        };
        ProgressSnapshot {
            nodes: self.nodes(),
            evaluated: self.evaluated(),
            last_line,
        }
    }
}
