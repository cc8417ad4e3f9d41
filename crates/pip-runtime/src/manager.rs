#![forbid(unsafe_code)]

//! Owner of the floating window and the content it shows.
//!
//! A [`WindowManager`] holds at most one [`FloatingWindow`]. The window is
//! created when content is first shown and disposed once the last content
//! has finished leaving. Content moves through three transitions:
//!
//! - **show**: fade in, or grow out of the content's source rectangle.
//! - **replace**: new content takes over the window and its layout.
//! - **remove**: fade out, or shrink back into the source rectangle when
//!   the host restores its inline UI. The removal completes when both the
//!   animation and the host's restoration (see
//!   [`PipDelegate::restore_user_interface`]) are done.
//!
//! Each transition runs under a per-content [`TaskToken`]. Deferred steps
//! that find their token superseded do nothing, so showing content again
//! while it is still leaving cancels the pending removal's effects.
//!
//! The host drives everything with [`WindowManager::tick`] once per frame
//! and renders [`WindowManager::presentations`].
//!
//! # Failure Modes
//!
//! - A failing [`LayoutStore`] never fails a transition; the error is
//!   logged and the layout is simply not persisted.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use pip_core::animation::Animation;
use pip_core::animation::spring::Spring;
use pip_core::{Hints, Insets, Layout, Point, Rect, Size, Vector};
use tracing::{debug, info, warn};

use crate::config::FloatingConfig;
use crate::delegate::{PipDelegate, SharedDelegate};
use crate::error::{Result, RuntimeError};
use crate::store::{LayoutStore, restore_layout};
use crate::task::{Join, JoinPart, TaskToken, TaskTracker};
use crate::window::FloatingWindow;

const TRANSITION_STIFFNESS: f64 = 170.0;

/// Identifies one piece of content across transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId(pub u64);

/// Something the floating window can show.
#[derive(Clone)]
pub struct PipContent {
    pub id: ContentId,
    /// Size of the floating window while showing this content.
    pub size: Size,
    /// Frame of the inline view the content came from, in container space.
    pub source: Option<Rect>,
    delegate: Option<SharedDelegate>,
}

impl PipContent {
    pub fn new(id: ContentId, size: Size) -> Self {
        Self {
            id,
            size,
            source: None,
            delegate: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: Rect) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn with_delegate(mut self, delegate: SharedDelegate) -> Self {
        self.delegate = Some(delegate);
        self
    }

    #[inline]
    pub fn delegate(&self) -> Option<&SharedDelegate> {
        self.delegate.as_ref()
    }

    fn notify(&self, f: impl FnOnce(&mut dyn PipDelegate)) {
        if let Some(delegate) = &self.delegate {
            f(&mut *delegate.borrow_mut());
        }
    }
}

impl fmt::Debug for PipContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipContent")
            .field("id", &self.id)
            .field("size", &self.size)
            .field("source", &self.source)
            .field("delegate", &self.delegate.is_some())
            .finish()
    }
}

/// What the host should draw for one piece of content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    pub id: ContentId,
    pub frame: Rect,
    pub alpha: f64,
}

/// Emitted by [`WindowManager::tick`].
#[derive(Debug, Clone, PartialEq)]
pub enum ManagerEvent {
    /// Content finished appearing.
    Shown(ContentId),
    /// Content finished leaving.
    Removed(ContentId),
    /// The floating window is gone.
    Disposed,
    /// The window settled after a fling and the layout was persisted.
    Settled(Layout),
}

#[derive(Debug, Clone, Copy)]
enum Motion {
    FadeIn,
    FadeOut,
    /// From a rectangle into the window frame.
    MoveIn(Rect),
    /// From the window frame into a rectangle.
    MoveOut(Rect),
}

/// One animated step, 0 to 1.
#[derive(Debug)]
struct Transition {
    token: TaskToken,
    motion: Motion,
    progress: Spring,
}

impl Transition {
    fn new(token: TaskToken, motion: Motion) -> Self {
        let progress = Spring::new(0.0, 1.0)
            .with_stiffness(TRANSITION_STIFFNESS)
            .with_damping(2.0 * TRANSITION_STIFFNESS.sqrt())
            .with_rest_threshold(0.001)
            .with_velocity_threshold(0.01);
        Self {
            token,
            motion,
            progress,
        }
    }

    fn present(&self, id: ContentId, frame: Rect) -> Presentation {
        let t = self.progress.position().clamp(0.0, 1.0);
        let (frame, alpha) = match self.motion {
            Motion::FadeIn => (frame, t),
            Motion::FadeOut => (frame, 1.0 - t),
            Motion::MoveIn(from) => (lerp_rect(from, frame, t), 1.0),
            Motion::MoveOut(to) => (lerp_rect(frame, to, t), 1.0),
        };
        Presentation { id, frame, alpha }
    }
}

fn lerp_rect(a: Rect, b: Rect, t: f64) -> Rect {
    let lerp = |x: f64, y: f64| x + (y - x) * t;
    Rect::new(
        lerp(a.x, b.x),
        lerp(a.y, b.y),
        lerp(a.width, b.width),
        lerp(a.height, b.height),
    )
}

/// Content currently owning the window.
#[derive(Debug)]
struct Hosted {
    content: PipContent,
    /// `None` once fully shown.
    showing: Option<Transition>,
    /// Content swapped out by a replace, removed when `showing` completes.
    replaced: Option<(PipContent, TaskToken)>,
}

/// Content on its way out.
#[derive(Debug)]
struct Leaving {
    content: PipContent,
    /// Frame the content left from.
    frame: Rect,
    transition: Transition,
    join: Join,
    /// The animation's share of `join`, released when it finishes.
    animation: Option<JoinPart>,
}

/// Owns at most one floating window and sequences content through it.
pub struct WindowManager {
    config: FloatingConfig,
    store: Box<dyn LayoutStore>,
    bounds: Rect,
    safe_insets: Insets,
    window: Option<FloatingWindow>,
    current: Option<Hosted>,
    leaving: Vec<Leaving>,
    tasks: HashMap<ContentId, TaskTracker>,
}

impl fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowManager")
            .field("bounds", &self.bounds)
            .field("window", &self.window.as_ref().map(FloatingWindow::frame))
            .field("current", &self.current_id())
            .field("leaving", &self.leaving.len())
            .finish()
    }
}

impl WindowManager {
    pub fn new(
        config: FloatingConfig,
        store: Box<dyn LayoutStore>,
        bounds: Rect,
        safe_insets: Insets,
    ) -> Self {
        Self {
            config,
            store,
            bounds,
            safe_insets,
            window: None,
            current: None,
            leaving: Vec::new(),
            tasks: HashMap::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &FloatingConfig {
        &self.config
    }

    #[inline]
    pub fn window(&self) -> Option<&FloatingWindow> {
        self.window.as_ref()
    }

    #[inline]
    pub fn has_window(&self) -> bool {
        self.window.is_some()
    }

    pub fn store(&self) -> &dyn LayoutStore {
        self.store.as_ref()
    }

    /// Content owning the window, if any.
    pub fn current_id(&self) -> Option<ContentId> {
        self.current.as_ref().map(|hosted| hosted.content.id)
    }

    /// Whether the current content has finished appearing.
    pub fn is_shown(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|hosted| hosted.showing.is_none())
    }

    /// Content still animating out.
    pub fn leaving_ids(&self) -> Vec<ContentId> {
        self.leaving.iter().map(|l| l.content.id).collect()
    }

    fn begin_task(&mut self, id: ContentId) -> TaskToken {
        self.tasks.entry(id).or_default().begin()
    }

    fn save_layout(&mut self, layout: &Layout) {
        if let Err(err) = self.store.save(&self.config.layout_key, layout) {
            warn!(error = %err, "failed to persist layout");
        }
    }

    /// Show `content`, replacing whatever is shown.
    pub fn show(&mut self, content: PipContent) -> Result<()> {
        match self.current_id() {
            Some(id) if id == content.id => Ok(()),
            Some(_) => self.replace(content),
            None => self.add(content),
        }
    }

    /// Drop any removal still running for `id`; the new show owns it now.
    fn cancel_leaving(&mut self, id: ContentId) {
        let before = self.leaving.len();
        self.leaving.retain(|leaving| leaving.content.id != id);
        if self.leaving.len() != before {
            debug!(id = id.0, "removal cancelled by re-show");
        }
    }

    fn add(&mut self, content: PipContent) -> Result<()> {
        let token = self.begin_task(content.id);
        self.cancel_leaving(content.id);
        let restored = restore_layout(
            self.store.as_mut(),
            &self.config.layout_key,
            Some(self.config.placeholder_layout),
        );

        match &mut self.window {
            Some(window) => {
                window.set_size(content.size)?;
                window.apply_layout(restored)?;
            }
            None => {
                self.window = Some(FloatingWindow::new(
                    self.config.clone(),
                    self.bounds,
                    self.safe_insets,
                    content.size,
                    restored,
                )?);
            }
        }
        let Some(window) = &mut self.window else {
            return Err(RuntimeError::NoContent);
        };
        // Normalize a stored layout against the current regions.
        let layout = window.adaptive_layout(Hints::NONE);
        window.apply_layout(layout)?;

        content.notify(|d| d.will_start());
        let motion = match content.source {
            Some(source) => Motion::MoveIn(source),
            None => Motion::FadeIn,
        };
        info!(id = content.id.0, ?layout, "showing content");
        self.current = Some(Hosted {
            content,
            showing: Some(Transition::new(token, motion)),
            replaced: None,
        });
        Ok(())
    }

    fn replace(&mut self, content: PipContent) -> Result<()> {
        let Some(old) = self.current.take() else {
            return self.add(content);
        };
        let old_token = self.begin_task(old.content.id);
        let token = self.begin_task(content.id);
        self.cancel_leaving(content.id);
        let Some(window) = &mut self.window else {
            return Err(RuntimeError::NoContent);
        };
        let from = window.frame();
        window.set_size(content.size)?;
        debug!(old = old.content.id.0, new = content.id.0, "replacing content");
        self.current = Some(Hosted {
            content,
            showing: Some(Transition::new(token, Motion::MoveIn(from))),
            replaced: Some((old.content, old_token)),
        });
        Ok(())
    }

    /// Start removing the current content.
    ///
    /// With `restore_ui` the content's delegate is asked to restore its
    /// inline UI and, when the content has a source rectangle, the window
    /// shrinks back into it instead of fading.
    pub fn remove(&mut self, restore_ui: bool) -> Result<()> {
        let Some(hosted) = self.current.take() else {
            return Err(RuntimeError::NoContent);
        };
        let content = hosted.content;
        let token = self.begin_task(content.id);

        let join = Join::new();
        if restore_ui {
            let part = join.part();
            content.notify(|d| d.restore_user_interface(part));
        }
        content.notify(|d| d.will_stop());

        let mut frame = Rect::from_center(self.bounds.center(), content.size);
        if let Some(window) = &mut self.window {
            let layout = window.adaptive_layout(Hints::NONE);
            window.apply_layout(layout)?;
            frame = window.frame();
            self.save_layout(&layout);
        }

        let motion = match content.source {
            Some(source) if restore_ui => Motion::MoveOut(source),
            _ => Motion::FadeOut,
        };
        info!(id = content.id.0, restore_ui, "removing content");
        self.leaving.push(Leaving {
            content,
            frame,
            transition: Transition::new(token, motion),
            animation: Some(join.part()),
            join,
        });
        Ok(())
    }

    fn window_mut(&mut self) -> Result<&mut FloatingWindow> {
        if self.current.is_none() {
            return Err(RuntimeError::NoContent);
        }
        self.window.as_mut().ok_or(RuntimeError::NoContent)
    }

    pub fn begin_drag(&mut self) -> Result<()> {
        self.window_mut()?.begin_drag();
        Ok(())
    }

    pub fn drag_by(&mut self, translation: Vector) -> Result<()> {
        self.window_mut()?.drag_by(translation);
        Ok(())
    }

    pub fn end_drag(&mut self, velocity: Vector) -> Result<()> {
        self.window_mut()?.end_drag(velocity);
        Ok(())
    }

    /// Bring the window fully on screen and persist the layout.
    pub fn expand(&mut self) -> Result<Layout> {
        let layout = self.window_mut()?.expand()?;
        self.save_layout(&layout);
        Ok(layout)
    }

    /// Dock the window on its nearest collapse edge and persist the layout.
    pub fn collapse(&mut self) -> Result<Layout> {
        let layout = self.window_mut()?.collapse()?;
        self.save_layout(&layout);
        Ok(layout)
    }

    /// Follow a container bounds or safe-area change.
    pub fn set_container(&mut self, bounds: Rect, safe_insets: Insets) -> Result<()> {
        self.bounds = bounds;
        self.safe_insets = safe_insets;
        if let Some(window) = &mut self.window {
            window.set_container(bounds, safe_insets)?;
        }
        Ok(())
    }

    /// Whether a touch at `point` belongs to the floating window.
    pub fn hit_test(&self, point: Point) -> bool {
        self.current.is_some() && self.window.as_ref().is_some_and(|w| w.hit_test(point))
    }

    /// Advance the glide and every transition by `dt`.
    pub fn tick(&mut self, dt: Duration) -> Result<Vec<ManagerEvent>> {
        let mut events = Vec::new();

        if let Some(window) = &mut self.window
            && let Some(layout) = window.tick(dt)?
        {
            self.save_layout(&layout);
            events.push(ManagerEvent::Settled(layout));
        }

        self.tick_current(dt, &mut events);
        self.tick_leaving(dt, &mut events);

        if self.current.is_none() && self.leaving.is_empty() && self.window.take().is_some() {
            self.tasks.clear();
            info!("floating window disposed");
            events.push(ManagerEvent::Disposed);
        }
        Ok(events)
    }

    fn tick_current(&mut self, dt: Duration, events: &mut Vec<ManagerEvent>) {
        let Some(hosted) = &mut self.current else {
            return;
        };
        let Some(transition) = &mut hosted.showing else {
            return;
        };
        transition.progress.tick(dt);
        if !transition.progress.is_complete() {
            return;
        }
        let current = transition.token.is_current();
        hosted.showing = None;

        if let Some((old, token)) = hosted.replaced.take()
            && token.is_current()
        {
            events.push(ManagerEvent::Removed(old.id));
        }
        if current {
            hosted.content.notify(|d| d.did_start());
            debug!(id = hosted.content.id.0, "content shown");
            events.push(ManagerEvent::Shown(hosted.content.id));
        }
    }

    fn tick_leaving(&mut self, dt: Duration, events: &mut Vec<ManagerEvent>) {
        for leaving in &mut self.leaving {
            leaving.transition.progress.tick(dt);
            if leaving.transition.progress.is_complete() {
                // Releases the animation's share of the join.
                leaving.animation.take();
            }
        }

        let (done, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.leaving)
            .into_iter()
            .partition(|leaving| leaving.animation.is_none() && leaving.join.is_complete());
        self.leaving = pending;

        for leaving in done {
            if leaving.transition.token.is_current() {
                leaving.content.notify(|d| d.did_stop());
                debug!(id = leaving.content.id.0, "content removed");
                events.push(ManagerEvent::Removed(leaving.content.id));
            }
        }
    }

    /// What to draw this frame: the current content, then leaving content.
    pub fn presentations(&self) -> Vec<Presentation> {
        let mut out = Vec::new();
        if let (Some(hosted), Some(window)) = (&self.current, &self.window) {
            let id = hosted.content.id;
            let frame = window.frame();
            out.push(match &hosted.showing {
                Some(transition) => transition.present(id, frame),
                None => Presentation {
                    id,
                    frame,
                    alpha: 1.0,
                },
            });
        }
        out.extend(
            self.leaving
                .iter()
                .map(|l| l.transition.present(l.content.id, l.frame)),
        );
        out
    }
}
