//! Task tokens and joins for asynchronous content transitions.
//!
//! Showing, hiding, and swapping floating content are multi-step operations
//! whose later steps run on a future tick or from a host callback. Each
//! logical operation owns a [`TaskToken`]; starting the next operation
//! through the same [`TaskTracker`] cancels the previous token, and every
//! deferred step checks [`TaskToken::is_current`] before touching state.
//!
//! A [`Join`] gathers N independent parts (an animation, a host restoring
//! its UI) into one completion. Parts complete when
//! [`JoinPart::complete`] is called or the part is dropped, so a host that
//! forgets a handle cannot wedge a removal.
//!
//! # Example
//!
//! ```
//! use pip_runtime::task::{Join, TaskTracker};
//!
//! let mut tasks = TaskTracker::new();
//! let hide = tasks.begin();
//!
//! let join = Join::new();
//! let restore = join.part();
//! let animation = join.part();
//! animation.complete();
//! assert!(!join.is_complete());
//! restore.complete();
//! assert!(join.is_complete());
//!
//! let show = tasks.begin();
//! assert!(!hide.is_current());
//! assert!(show.is_current());
//! ```

#![forbid(unsafe_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Identity of one logical operation.
///
/// Clones observe the same cancellation flag.
#[derive(Debug, Clone)]
pub struct TaskToken {
    id: u64,
    cancelled: Arc<AtomicBool>,
}

impl TaskToken {
    /// Monotonic id, unique per tracker.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether no later operation has superseded this one.
    #[inline]
    pub fn is_current(&self) -> bool {
        !self.cancelled.load(Ordering::Acquire)
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

impl PartialEq for TaskToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}

impl Eq for TaskToken {}

/// Hands out tokens; at most one is current.
#[derive(Debug, Default)]
pub struct TaskTracker {
    next_id: u64,
    current: Option<TaskToken>,
}

impl TaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new operation, superseding the current one.
    pub fn begin(&mut self) -> TaskToken {
        self.cancel();
        self.next_id += 1;
        let token = TaskToken {
            id: self.next_id,
            cancelled: Arc::new(AtomicBool::new(false)),
        };
        self.current = Some(token.clone());
        token
    }

    /// Supersede the current operation without starting another.
    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }

    /// The token of the operation in effect.
    pub fn current(&self) -> Option<&TaskToken> {
        self.current.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Join
// ---------------------------------------------------------------------------

/// Completion of N independent parts.
///
/// A join with no outstanding parts is complete.
#[derive(Clone)]
pub struct Join {
    pending: Arc<AtomicUsize>,
}

/// One outstanding part of a [`Join`].
///
/// Completing (or dropping) the part is final.
pub struct JoinPart {
    pending: Arc<AtomicUsize>,
}

impl Join {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Register another part.
    pub fn part(&self) -> JoinPart {
        self.pending.fetch_add(1, Ordering::AcqRel);
        JoinPart {
            pending: Arc::clone(&self.pending),
        }
    }

    /// Parts not yet completed.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    pub fn is_complete(&self) -> bool {
        self.pending() == 0
    }
}

impl Default for Join {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Join {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Join")
            .field("pending", &self.pending())
            .finish()
    }
}

impl JoinPart {
    /// Mark this part done.
    pub fn complete(self) {}
}

impl Drop for JoinPart {
    fn drop(&mut self) {
        self.pending.fetch_sub(1, Ordering::AcqRel);
    }
}

impl std::fmt::Debug for JoinPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JoinPart")
    }
}
