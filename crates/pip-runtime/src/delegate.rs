#![forbid(unsafe_code)]

//! Lifecycle callbacks for picture-in-picture sessions.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::task::JoinPart;

/// Receives the lifecycle of one picture-in-picture source.
///
/// Every method defaults to doing nothing.
pub trait PipDelegate {
    fn will_start(&mut self) {}

    fn did_start(&mut self) {}

    fn will_stop(&mut self) {}

    fn did_stop(&mut self) {}

    fn failed_to_start(&mut self, _error: &RuntimeError) {}

    /// Put the source's inline UI back before the floating window goes away.
    ///
    /// The window's removal waits for `done`. Complete it now, or keep it
    /// and complete it once restoration has finished. Dropping it counts as
    /// completion.
    fn restore_user_interface(&mut self, done: JoinPart) {
        done.complete();
    }
}

/// A delegate shared between a variant and the content it shows.
pub type SharedDelegate = Rc<RefCell<dyn PipDelegate>>;

/// Wrap `delegate` for sharing.
pub fn shared<D: PipDelegate + 'static>(delegate: D) -> SharedDelegate {
    Rc::new(RefCell::new(delegate))
}

/// Records every callback, for tests and diagnostics.
#[derive(Debug, Default)]
pub struct RecordingDelegate {
    events: Vec<&'static str>,
    deferred: Vec<JoinPart>,
    defer_restore: bool,
}

impl RecordingDelegate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold restore handles until [`finish_restore`](Self::finish_restore).
    #[must_use]
    pub fn deferring_restore(mut self) -> Self {
        self.defer_restore = true;
        self
    }

    pub fn events(&self) -> &[&'static str] {
        &self.events
    }

    /// Complete every held restore handle.
    pub fn finish_restore(&mut self) {
        self.deferred.clear();
    }
}

impl PipDelegate for RecordingDelegate {
    fn will_start(&mut self) {
        self.events.push("will_start");
    }

    fn did_start(&mut self) {
        self.events.push("did_start");
    }

    fn will_stop(&mut self) {
        self.events.push("will_stop");
    }

    fn did_stop(&mut self) {
        self.events.push("did_stop");
    }

    fn failed_to_start(&mut self, _error: &RuntimeError) {
        self.events.push("failed_to_start");
    }

    fn restore_user_interface(&mut self, done: JoinPart) {
        self.events.push("restore_user_interface");
        if self.defer_restore {
            self.deferred.push(done);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Join;

    struct Silent;
    impl PipDelegate for Silent {}

    #[test]
    fn default_restore_completes_immediately() {
        let join = Join::new();
        Silent.restore_user_interface(join.part());
        assert!(join.is_complete());
    }

    #[test]
    fn recording_delegate_defers_restore() {
        let join = Join::new();
        let mut delegate = RecordingDelegate::new().deferring_restore();
        delegate.restore_user_interface(join.part());
        assert!(!join.is_complete());
        delegate.finish_restore();
        assert!(join.is_complete());
        assert_eq!(delegate.events(), ["restore_user_interface"]);
    }

    #[test]
    fn shared_delegate_is_usable_through_the_trait() {
        let delegate = shared(RecordingDelegate::new());
        delegate.borrow_mut().will_start();
        let join = Join::new();
        delegate.borrow_mut().restore_user_interface(join.part());
        assert!(join.is_complete());
    }
}
