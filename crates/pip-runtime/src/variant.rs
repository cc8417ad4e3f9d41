#![forbid(unsafe_code)]

//! Picture-in-picture variants and the coordinator that keeps one active.
//!
//! A [`PipVariant`] is one way of floating content: [`CustomPip`] shows it
//! in the in-app [`WindowManager`], [`SystemPip`] hands it to a
//! platform-provided backend. The [`PipCoordinator`] owns every registered
//! variant and guarantees that at most one is *current*.
//!
//! # Invariants
//!
//! 1. Only the current variant can start.
//! 2. Preparing a variant stops the previously current one; preparing the
//!    current variant again restores its UI instead.
//! 3. A custom variant only drives the window while it owns the window's
//!    content; otherwise its stop, restore, expand and collapse do nothing.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::delegate::{PipDelegate, SharedDelegate};
use crate::error::{Result, RuntimeError};
use crate::manager::{ManagerEvent, PipContent, WindowManager};
use crate::task::Join;

/// One way of presenting floating content.
pub trait PipVariant {
    /// Begin presenting.
    fn start(&mut self, windows: &mut WindowManager) -> Result<()>;

    /// Stop presenting without restoring the inline UI.
    fn stop(&mut self, windows: &mut WindowManager) -> Result<()>;

    /// Stop presenting and put the inline UI back.
    fn restore_user_interface(&mut self, windows: &mut WindowManager) -> Result<()>;

    /// Bring a docked window fully on screen.
    fn expand(&mut self, _windows: &mut WindowManager) -> Result<()> {
        Ok(())
    }

    /// Dock the window on its nearest collapse edge.
    fn collapse(&mut self, _windows: &mut WindowManager) -> Result<()> {
        Ok(())
    }

    fn is_active(&self, windows: &WindowManager) -> bool;
}

// ---------------------------------------------------------------------------
// Custom variant
// ---------------------------------------------------------------------------

/// Floats content in the in-app window.
#[derive(Debug)]
pub struct CustomPip {
    content: PipContent,
}

impl CustomPip {
    pub fn new(content: PipContent) -> Self {
        Self { content }
    }

    #[inline]
    pub fn content(&self) -> &PipContent {
        &self.content
    }

    /// Swap the content shown on the next start.
    ///
    /// If this variant is showing, the window switches to the new content.
    pub fn set_content(&mut self, content: PipContent, windows: &mut WindowManager) -> Result<()> {
        let owned = self.owns(windows);
        self.content = content;
        if owned {
            windows.show(self.content.clone())?;
        }
        Ok(())
    }

    fn owns(&self, windows: &WindowManager) -> bool {
        windows.current_id() == Some(self.content.id)
    }
}

impl PipVariant for CustomPip {
    fn start(&mut self, windows: &mut WindowManager) -> Result<()> {
        if let Err(err) = windows.show(self.content.clone()) {
            warn!(id = self.content.id.0, error = %err, "custom pip failed to start");
            if let Some(delegate) = self.content.delegate() {
                delegate.borrow_mut().failed_to_start(&err);
            }
            return Err(err);
        }
        Ok(())
    }

    fn stop(&mut self, windows: &mut WindowManager) -> Result<()> {
        if !self.owns(windows) {
            return Ok(());
        }
        windows.remove(false)
    }

    fn restore_user_interface(&mut self, windows: &mut WindowManager) -> Result<()> {
        if !self.owns(windows) {
            return Ok(());
        }
        windows.remove(true)
    }

    fn expand(&mut self, windows: &mut WindowManager) -> Result<()> {
        if self.owns(windows) {
            windows.expand()?;
        }
        Ok(())
    }

    fn collapse(&mut self, windows: &mut WindowManager) -> Result<()> {
        if self.owns(windows) {
            windows.collapse()?;
        }
        Ok(())
    }

    fn is_active(&self, windows: &WindowManager) -> bool {
        self.owns(windows)
    }
}

// ---------------------------------------------------------------------------
// System variant
// ---------------------------------------------------------------------------

/// A platform picture-in-picture service.
pub trait SystemPipBackend {
    /// Whether the platform offers picture-in-picture at all.
    fn is_supported(&self) -> bool;

    /// Whether starting would succeed right now.
    fn is_possible(&self) -> bool;

    fn start(&mut self) -> Result<()>;

    fn stop(&mut self);

    fn is_active(&self) -> bool;
}

/// Hands content to a [`SystemPipBackend`].
///
/// The platform owns the floating window, so expand and collapse do nothing.
pub struct SystemPip<B> {
    backend: B,
    delegate: Option<SharedDelegate>,
}

impl<B: SystemPipBackend> SystemPip<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            delegate: None,
        }
    }

    #[must_use]
    pub fn with_delegate(mut self, delegate: SharedDelegate) -> Self {
        self.delegate = Some(delegate);
        self
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn notify(&self, f: impl FnOnce(&mut dyn PipDelegate)) {
        if let Some(delegate) = &self.delegate {
            f(&mut *delegate.borrow_mut());
        }
    }

    fn fail(&self, err: RuntimeError) -> Result<()> {
        warn!(error = %err, "system pip failed to start");
        self.notify(|d| d.failed_to_start(&err));
        Err(err)
    }
}

impl<B> std::fmt::Debug for SystemPip<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemPip")
            .field("delegate", &self.delegate.is_some())
            .finish_non_exhaustive()
    }
}

impl<B: SystemPipBackend> PipVariant for SystemPip<B> {
    fn start(&mut self, _windows: &mut WindowManager) -> Result<()> {
        if !self.backend.is_supported() {
            return self.fail(RuntimeError::unsupported("platform has no picture-in-picture"));
        }
        if !self.backend.is_possible() {
            return self.fail(RuntimeError::unsupported(
                "picture-in-picture is not possible right now",
            ));
        }
        self.notify(|d| d.will_start());
        if let Err(err) = self.backend.start() {
            return self.fail(err);
        }
        self.notify(|d| d.did_start());
        Ok(())
    }

    fn stop(&mut self, _windows: &mut WindowManager) -> Result<()> {
        if !self.backend.is_active() {
            return Ok(());
        }
        self.notify(|d| d.will_stop());
        self.backend.stop();
        self.notify(|d| d.did_stop());
        Ok(())
    }

    fn restore_user_interface(&mut self, windows: &mut WindowManager) -> Result<()> {
        if !self.backend.is_active() {
            return Ok(());
        }
        let join = Join::new();
        let part = join.part();
        self.notify(|d| d.restore_user_interface(part));
        if !join.is_complete() {
            debug!("system pip stopping before inline UI restored");
        }
        self.stop(windows)
    }

    fn is_active(&self, _windows: &WindowManager) -> bool {
        self.backend.is_active()
    }
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

/// Handle to a variant registered with a [`PipCoordinator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipHandle(usize);

/// Owns the window manager and every variant; at most one variant is current.
pub struct PipCoordinator {
    windows: WindowManager,
    variants: Vec<Box<dyn PipVariant>>,
    current: Option<PipHandle>,
}

impl std::fmt::Debug for PipCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipCoordinator")
            .field("windows", &self.windows)
            .field("variants", &self.variants.len())
            .field("current", &self.current)
            .finish()
    }
}

impl PipCoordinator {
    pub fn new(windows: WindowManager) -> Self {
        Self {
            windows,
            variants: Vec::new(),
            current: None,
        }
    }

    #[inline]
    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    #[inline]
    pub fn windows_mut(&mut self) -> &mut WindowManager {
        &mut self.windows
    }

    /// Register a variant. It is not current until prepared.
    pub fn register(&mut self, variant: impl PipVariant + 'static) -> PipHandle {
        self.variants.push(Box::new(variant));
        PipHandle(self.variants.len() - 1)
    }

    #[inline]
    pub fn current(&self) -> Option<PipHandle> {
        self.current
    }

    pub fn is_current(&self, handle: PipHandle) -> bool {
        self.current == Some(handle)
    }

    /// Make `handle` the current variant.
    ///
    /// The previously current variant is stopped. Preparing the current
    /// variant again restores its inline UI.
    pub fn prepare(&mut self, handle: PipHandle) -> Result<()> {
        if handle.0 >= self.variants.len() {
            return Err(RuntimeError::NotCurrent);
        }
        match self.current {
            Some(current) if current == handle => {
                debug!(handle = handle.0, "prepare on current variant restores UI");
                self.restore_user_interface(handle)
            }
            Some(previous) => {
                let windows = &mut self.windows;
                if let Some(variant) = self.variants.get_mut(previous.0) {
                    variant.stop(windows)?;
                }
                self.current = Some(handle);
                Ok(())
            }
            None => {
                self.current = Some(handle);
                Ok(())
            }
        }
    }

    /// Start `handle`. Fails with [`RuntimeError::NotCurrent`] unless it was
    /// prepared.
    pub fn start(&mut self, handle: PipHandle) -> Result<()> {
        if !self.is_current(handle) {
            return Err(RuntimeError::NotCurrent);
        }
        info!(handle = handle.0, "starting picture-in-picture");
        self.with_variant(handle, |variant, windows| variant.start(windows))
    }

    pub fn stop(&mut self, handle: PipHandle) -> Result<()> {
        info!(handle = handle.0, "stopping picture-in-picture");
        self.with_variant(handle, |variant, windows| variant.stop(windows))
    }

    pub fn restore_user_interface(&mut self, handle: PipHandle) -> Result<()> {
        self.with_variant(handle, |variant, windows| {
            variant.restore_user_interface(windows)
        })
    }

    pub fn expand(&mut self, handle: PipHandle) -> Result<()> {
        self.with_variant(handle, |variant, windows| variant.expand(windows))
    }

    pub fn collapse(&mut self, handle: PipHandle) -> Result<()> {
        self.with_variant(handle, |variant, windows| variant.collapse(windows))
    }

    pub fn is_active(&self, handle: PipHandle) -> bool {
        self.variants
            .get(handle.0)
            .is_some_and(|variant| variant.is_active(&self.windows))
    }

    /// Advance the window manager.
    pub fn tick(&mut self, dt: Duration) -> Result<Vec<ManagerEvent>> {
        self.windows.tick(dt)
    }

    fn with_variant(
        &mut self,
        handle: PipHandle,
        f: impl FnOnce(&mut dyn PipVariant, &mut WindowManager) -> Result<()>,
    ) -> Result<()> {
        let windows = &mut self.windows;
        let variant = self
            .variants
            .get_mut(handle.0)
            .ok_or(RuntimeError::NotCurrent)?;
        f(variant.as_mut(), windows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FloatingConfig;
    use crate::delegate::{RecordingDelegate, shared};
    use crate::manager::ContentId;
    use crate::store::MemoryLayoutStore;
    use pip_core::{Insets, Rect, Size};
    use std::cell::RefCell;
    use std::rc::Rc;

    const MS_16: Duration = Duration::from_millis(16);

    #[derive(Debug, Default)]
    struct FakeBackend {
        unsupported: bool,
        active: bool,
    }

    impl SystemPipBackend for FakeBackend {
        fn is_supported(&self) -> bool {
            !self.unsupported
        }
        fn is_possible(&self) -> bool {
            true
        }
        fn start(&mut self) -> Result<()> {
            self.active = true;
            Ok(())
        }
        fn stop(&mut self) {
            self.active = false;
        }
        fn is_active(&self) -> bool {
            self.active
        }
    }

    fn coordinator() -> PipCoordinator {
        PipCoordinator::new(WindowManager::new(
            FloatingConfig::default(),
            Box::new(MemoryLayoutStore::new()),
            Rect::new(0.0, 0.0, 300.0, 600.0),
            Insets::ZERO,
        ))
    }

    fn custom(id: u64) -> CustomPip {
        CustomPip::new(PipContent::new(ContentId(id), Size::new(100.0, 60.0)))
    }

    fn settle(coordinator: &mut PipCoordinator) {
        for _ in 0..200 {
            coordinator.tick(MS_16).unwrap();
        }
    }

    #[test]
    fn start_requires_prepare() {
        let mut coordinator = coordinator();
        let handle = coordinator.register(custom(1));
        assert!(matches!(
            coordinator.start(handle),
            Err(RuntimeError::NotCurrent)
        ));
        coordinator.prepare(handle).unwrap();
        coordinator.start(handle).unwrap();
        assert!(coordinator.is_active(handle));
    }

    #[test]
    fn prepare_switches_and_stops_previous() {
        let mut coordinator = coordinator();
        let first = coordinator.register(custom(1));
        let second = coordinator.register(custom(2));
        coordinator.prepare(first).unwrap();
        coordinator.start(first).unwrap();
        settle(&mut coordinator);

        coordinator.prepare(second).unwrap();
        assert!(coordinator.is_current(second));
        assert!(!coordinator.is_active(first));
        assert!(matches!(
            coordinator.start(first),
            Err(RuntimeError::NotCurrent)
        ));
        coordinator.start(second).unwrap();
        assert_eq!(coordinator.windows().current_id(), Some(ContentId(2)));
    }

    #[test]
    fn prepare_current_restores_ui() {
        let delegate = Rc::new(RefCell::new(RecordingDelegate::new()));
        let content =
            PipContent::new(ContentId(1), Size::new(100.0, 60.0)).with_delegate(delegate.clone());
        let mut coordinator = coordinator();
        let handle = coordinator.register(CustomPip::new(content));
        coordinator.prepare(handle).unwrap();
        coordinator.start(handle).unwrap();
        settle(&mut coordinator);

        coordinator.prepare(handle).unwrap();
        settle(&mut coordinator);
        assert!(!coordinator.windows().has_window());
        assert!(delegate
            .borrow()
            .events()
            .contains(&"restore_user_interface"));
    }

    #[test]
    fn custom_ignores_window_it_does_not_own() {
        let mut coordinator = coordinator();
        let owner = coordinator.register(custom(1));
        let other = coordinator.register(custom(2));
        coordinator.prepare(owner).unwrap();
        coordinator.start(owner).unwrap();

        coordinator.collapse(other).unwrap();
        coordinator.stop(other).unwrap();
        assert_eq!(coordinator.windows().current_id(), Some(ContentId(1)));
    }

    #[test]
    fn system_unsupported_reports_failure() {
        let delegate = Rc::new(RefCell::new(RecordingDelegate::new()));
        let backend = FakeBackend {
            unsupported: true,
            ..FakeBackend::default()
        };
        let mut coordinator = coordinator();
        let handle = coordinator.register(SystemPip::new(backend).with_delegate(delegate.clone()));
        coordinator.prepare(handle).unwrap();
        let err = coordinator.start(handle).unwrap_err();
        assert!(matches!(err, RuntimeError::Unsupported { .. }));
        assert_eq!(delegate.borrow().events(), ["failed_to_start"]);
    }

    #[test]
    fn system_lifecycle_reaches_delegate() {
        let delegate = shared(RecordingDelegate::new());
        let mut coordinator = coordinator();
        let handle = coordinator.register(SystemPip::new(FakeBackend::default()).with_delegate(delegate));
        coordinator.prepare(handle).unwrap();
        coordinator.start(handle).unwrap();
        assert!(coordinator.is_active(handle));
        coordinator.expand(handle).unwrap();
        coordinator.restore_user_interface(handle).unwrap();
        assert!(!coordinator.is_active(handle));
        assert!(!coordinator.windows().has_window());
    }
}
