use crate::clock::{Clock, SystemClock, Ticker};
use crate::cue::CueSource;
use crate::ipc::CommandListener;
use crate::menu::{MenuBar, MenuCommand};
use crate::motion::gpsd::GpsdSource;
use crate::motion::{MotionEstimator, OscillatorCueSource};
use crate::overlay::{window, DotStyle, OverlaySession};
use crate::settings::{CueSourceKind, Settings};
use eframe::egui;
use std::time::Duration;

/// How often connected displays are re-enumerated.
const DISPLAY_POLL_HZ: f64 = 1.0;
const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

pub fn build_cue_source(settings: &Settings) -> Box<dyn CueSource> {
    match settings.cue_source {
        CueSourceKind::Motion => Box::new(MotionEstimator::new(Box::new(GpsdSource::new(
            settings.gpsd_addr.clone(),
        )))),
        CueSourceKind::Oscillator => {
            Box::new(OscillatorCueSource::new(settings.oscillator_amplitude))
        }
    }
}

/// Application root: owns the session, the menu and the command listener.
pub struct OverlayApp {
    session: OverlaySession,
    menu: MenuBar,
    listener: Option<CommandListener>,
    clock: Box<dyn Clock>,
    display_poll: Ticker,
}

impl OverlayApp {
    pub fn new(settings: &Settings) -> Self {
        let mut session = OverlaySession::new(build_cue_source(settings));
        let menu = MenuBar::new();
        menu.attach(&mut session);

        let port = settings.effective_command_port();
        let listener = match CommandListener::bind(port) {
            Ok(listener) => {
                tracing::info!(port, "listening for commands");
                Some(listener)
            }
            Err(err) => {
                tracing::warn!(port, error = %err, "command channel unavailable; menu only");
                None
            }
        };

        tracing::info!(cue_source = %settings.cue_source, "overlay ready");
        Self {
            session,
            menu,
            listener,
            clock: Box::new(SystemClock),
            display_poll: Ticker::with_rate(DISPLAY_POLL_HZ),
        }
    }

    pub fn session(&self) -> &OverlaySession {
        &self.session
    }

    fn refresh_surfaces(&mut self, ctx: &egui::Context, now: f64) {
        let first = !self.display_poll.is_armed();
        if first {
            self.display_poll.arm(now);
        }
        if first || self.display_poll.due(now) > 0 {
            self.session.update_surfaces(window::detect_surfaces(ctx), now);
        }
    }

    fn drain_commands(&mut self, now: f64) {
        let Some(listener) = self.listener.as_mut() else {
            return;
        };
        for action in listener.drain() {
            tracing::debug!(%action, "command received");
            self.session.apply(action, now);
        }
    }

    fn control_panel(&mut self, ctx: &egui::Context, now: f64) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Sick Motion");
            match self.menu.show(ui) {
                Some(MenuCommand::Toggle) => self.session.toggle(now),
                Some(MenuCommand::Quit) => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
                None => {}
            }
            ui.separator();
            let cue = self.session.current_cue();
            ui.label(format!("Surfaces: {}", self.session.surfaces().len()));
            ui.label(format!("Cue: ({:.2}, {:.2})", cue.x, cue.y));
        });
    }

    fn show_overlays(&mut self, ctx: &egui::Context) {
        let style = DotStyle::for_theme(ctx.style().visuals.dark_mode);
        let sizes: Vec<_> = self
            .session
            .bindings()
            .iter()
            .enumerate()
            .map(|(index, binding)| window::show_overlay(ctx, index, binding, &style))
            .collect();

        for (index, size) in sizes.into_iter().enumerate() {
            let Some(size) = size else { continue };
            let (width, height) = self.session.bindings()[index].renderer.size();
            let (actual_w, actual_h) = (f64::from(size.x), f64::from(size.y));
            if (actual_w - width).abs() >= 1.0 || (actual_h - height).abs() >= 1.0 {
                self.session.resize_binding(index, actual_w, actual_h);
            }
        }
    }
}

impl eframe::App for OverlayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = self.clock.now();
        self.refresh_surfaces(ctx, now);
        self.drain_commands(now);
        self.session.poll(now);
        self.control_panel(ctx, now);
        self.show_overlays(ctx);
        ctx.request_repaint_after(FRAME_INTERVAL);
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0; 4]
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.session.set_enabled(false, self.clock.now());
        tracing::info!("overlay shut down");
    }
}
