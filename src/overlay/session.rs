use crate::cue::{CueSource, CueVector};
use crate::ipc::Action;
use crate::overlay::renderer::CueRenderer;
use crate::overlay::state::SessionState;
use crate::overlay::surface::{normalize_surfaces, SurfaceRect};
use std::cell::Cell;
use std::rc::Rc;

/// One display surface and the renderer drawing on it.
#[derive(Debug)]
pub struct SurfaceBinding {
    pub surface: SurfaceRect,
    pub renderer: CueRenderer,
}

pub type StateObserver = Box<dyn FnMut(bool)>;

/// Owns the enabled flag, the cue source lifecycle and one renderer per
/// connected surface.
///
/// Every operation is a fire-and-forget state transition on the UI thread:
/// nothing here blocks or reports failure to the caller.
pub struct OverlaySession {
    state: SessionState,
    cue_source: Box<dyn CueSource>,
    latest_cue: Rc<Cell<CueVector>>,
    cue_pending: Rc<Cell<bool>>,
    surfaces: Vec<SurfaceRect>,
    bindings: Vec<SurfaceBinding>,
    last_rendered_cue: CueVector,
    observers: Vec<StateObserver>,
}

impl OverlaySession {
    pub fn new(mut cue_source: Box<dyn CueSource>) -> Self {
        let latest_cue = Rc::new(Cell::new(cue_source.current()));
        let cue_pending = Rc::new(Cell::new(false));
        let latest = Rc::clone(&latest_cue);
        let pending = Rc::clone(&cue_pending);
        cue_source.subscribe(Box::new(move |cue| {
            latest.set(cue);
            pending.set(true);
        }));

        Self {
            state: SessionState::Disabled,
            cue_source,
            latest_cue,
            cue_pending,
            surfaces: Vec::new(),
            bindings: Vec::new(),
            last_rendered_cue: CueVector::ZERO,
            observers: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    pub fn bindings(&self) -> &[SurfaceBinding] {
        &self.bindings
    }

    pub fn surfaces(&self) -> &[SurfaceRect] {
        &self.surfaces
    }

    /// Latest cue published by the cue source.
    pub fn current_cue(&self) -> CueVector {
        self.latest_cue.get()
    }

    /// Spring output of the most recent render, zero once disabled.
    pub fn last_rendered_cue(&self) -> CueVector {
        self.last_rendered_cue
    }

    pub fn cue_source(&self) -> &dyn CueSource {
        self.cue_source.as_ref()
    }

    /// Register a callback run after every change of the enabled flag,
    /// whatever triggered it.
    pub fn on_state_change(&mut self, observer: StateObserver) {
        self.observers.push(observer);
    }

    pub fn apply(&mut self, action: Action, now: f64) {
        match action {
            Action::Toggle => self.toggle(now),
            Action::Enable => self.set_enabled(true, now),
            Action::Disable => self.set_enabled(false, now),
        }
    }

    pub fn toggle(&mut self, now: f64) {
        self.set_enabled(!self.is_enabled(), now);
    }

    pub fn set_enabled(&mut self, enabled: bool, now: f64) {
        let next = SessionState::from_enabled(enabled);
        if next == self.state {
            return;
        }
        self.state = next;

        if enabled {
            self.cue_source.start(now);
            self.rebuild_bindings(now);
        } else {
            // stop() emits the zero cue; render it before tearing down
            self.cue_source.stop();
            self.settle_bindings(CueVector::ZERO);
            self.teardown_bindings();
        }
        tracing::info!(enabled, surfaces = self.bindings.len(), "overlay state changed");

        for observer in self.observers.iter_mut() {
            observer(enabled);
        }
    }

    /// Report the currently connected surfaces. A change while enabled
    /// rebuilds every binding; the cue source keeps running untouched.
    /// Returns whether the surface set changed.
    pub fn update_surfaces(&mut self, surfaces: Vec<SurfaceRect>, now: f64) -> bool {
        let surfaces = normalize_surfaces(surfaces);
        if surfaces == self.surfaces {
            return false;
        }
        tracing::info!(
            from = self.surfaces.len(),
            to = surfaces.len(),
            "display configuration changed"
        );
        self.surfaces = surfaces;
        if self.is_enabled() {
            self.rebuild_bindings(now);
        }
        true
    }

    /// The window backing binding `index` reports a new size.
    pub fn resize_binding(&mut self, index: usize, width: f64, height: f64) {
        if let Some(binding) = self.bindings.get_mut(index) {
            binding.renderer.resize(width, height);
        }
    }

    /// One UI-loop pass: pump the cue source, forward a fresh cue to every
    /// renderer, then run due animation ticks.
    pub fn poll(&mut self, now: f64) {
        if !self.is_enabled() {
            return;
        }
        self.cue_source.poll(now);
        if self.cue_pending.replace(false) {
            let cue = self.latest_cue.get();
            for binding in self.bindings.iter_mut() {
                binding.renderer.set_target_cue(cue);
            }
        }
        for binding in self.bindings.iter_mut() {
            if binding.renderer.poll(now) > 0 {
                self.last_rendered_cue = binding.renderer.rendered();
            }
        }
    }

    fn rebuild_bindings(&mut self, now: f64) {
        self.teardown_bindings();
        let cue = self.latest_cue.get();
        self.cue_pending.set(false);
        self.bindings = self
            .surfaces
            .iter()
            .map(|surface| {
                let (width, height) = surface.size();
                let mut renderer = CueRenderer::new(width, height, now);
                renderer.set_target_cue(cue);
                SurfaceBinding {
                    surface: *surface,
                    renderer,
                }
            })
            .collect();
        tracing::debug!(bindings = self.bindings.len(), "overlay bindings rebuilt");
    }

    fn settle_bindings(&mut self, cue: CueVector) {
        self.cue_pending.set(false);
        for binding in self.bindings.iter_mut() {
            binding.renderer.settle_to(cue);
        }
        self.last_rendered_cue = cue;
    }

    fn teardown_bindings(&mut self) {
        for binding in self.bindings.iter_mut() {
            binding.renderer.dispose();
        }
        self.bindings.clear();
    }
}
