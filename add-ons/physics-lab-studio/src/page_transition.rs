//! Page transition wrapper.
//!
//! Every navigation (location change, even to the same location) resets the stage to
//! `Entering` and replaces the displayed page with the newly supplied one. The renderer
//! fades the page in and marks the stage `Idle` once the fade has run; nothing else
//! is tracked. Rapid navigation is not guarded: the last `observe` wins.
//!
//! Locations arrive over a `tokio::sync::watch` channel so any part of the app can
//! navigate without holding the wrapper.

use egui::Ui;
use tokio::sync::watch;

/// Seconds the enter fade takes.
pub const ENTER_SECONDS: f64 = 0.3;

pub type NavigationSender = watch::Sender<String>;
pub type NavigationReceiver = watch::Receiver<String>;

/// Channel carrying the current navigation location.
pub fn navigation_channel(initial: impl Into<String>) -> (NavigationSender, NavigationReceiver) {
    watch::channel(initial.into())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Entering,
    Idle,
}

impl Stage {
    /// Class name of the wrapping container for this stage.
    pub fn css_class(self) -> &'static str {
        match self {
            Stage::Entering => "page-transition page-enter",
            Stage::Idle => "page-transition",
        }
    }
}

#[derive(Debug)]
pub struct PageTransition<C> {
    stage: Stage,
    location: Option<String>,
    children: C,
    /// Bumped on every observe; lets the renderer restart the fade.
    generation: u64,
    entered_at: Option<f64>,
}

impl<C> PageTransition<C> {
    pub fn new(children: C) -> Self {
        Self {
            stage: Stage::Entering,
            location: None,
            children,
            generation: 0,
            entered_at: None,
        }
    }

    /// Records a navigation: stage back to `Entering`, snapshot replaced.
    pub fn observe(&mut self, location: impl Into<String>, children: C) {
        let location = location.into();
        tracing::trace!(%location, generation = self.generation + 1, "page transition");
        self.location = Some(location);
        self.children = children;
        self.stage = Stage::Entering;
        self.generation += 1;
        self.entered_at = None;
    }

    /// Observes the channel's value if it changed since the last poll, building the page
    /// for the new location with `build`. Returns whether a navigation was observed.
    pub fn poll(&mut self, rx: &mut NavigationReceiver, build: impl FnOnce(&str) -> C) -> bool {
        if !rx.has_changed().unwrap_or(false) {
            return false;
        }
        let location = rx.borrow_and_update().clone();
        let children = build(&location);
        self.observe(location, children);
        true
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn css_class(&self) -> &'static str {
        self.stage.css_class()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn children(&self) -> &C {
        &self.children
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Draws the snapshot inside a container faded by the current stage.
    pub fn render<R>(&mut self, ui: &mut Ui, add_contents: impl FnOnce(&mut Ui, &mut C) -> R) -> R {
        let now = ui.input(|i| i.time);
        let opacity = match self.stage {
            Stage::Entering => {
                let started = *self.entered_at.get_or_insert(now);
                let progress = ((now - started) / ENTER_SECONDS).clamp(0.0, 1.0);
                if progress >= 1.0 {
                    self.stage = Stage::Idle;
                } else {
                    ui.ctx().request_repaint();
                }
                progress as f32
            }
            Stage::Idle => 1.0,
        };

        let children = &mut self.children;
        ui.push_id(("page-transition", self.generation), |ui| {
            ui.set_opacity(opacity);
            add_contents(ui, children)
        })
        .inner
    }
}
