use crate::overlay::OverlaySession;
use eframe::egui;
use std::cell::Cell;
use std::rc::Rc;

pub const ENABLE_LABEL: &str = "Enable Motion Dots";
pub const DISABLE_LABEL: &str = "Disable Motion Dots";
pub const QUIT_LABEL: &str = "Quit Sick Motion";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Toggle,
    Quit,
}

/// Status menu: one toggle item labelled after the current state plus quit.
///
/// The label follows the session through a state observer, so it is right
/// whether the change came from the menu or the command channel.
#[derive(Debug, Default)]
pub struct MenuBar {
    enabled: Rc<Cell<bool>>,
}

impl MenuBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, session: &mut OverlaySession) {
        self.enabled.set(session.is_enabled());
        let enabled = Rc::clone(&self.enabled);
        session.on_state_change(Box::new(move |now_enabled| enabled.set(now_enabled)));
    }

    pub fn toggle_label(&self) -> &'static str {
        if self.enabled.get() {
            DISABLE_LABEL
        } else {
            ENABLE_LABEL
        }
    }

    /// Draw the items and report the one the user picked, if any.
    /// `T` toggles and `Q` quits.
    pub fn show(&self, ui: &mut egui::Ui) -> Option<MenuCommand> {
        let mut picked = None;
        ui.horizontal(|ui| {
            if ui.button(self.toggle_label()).clicked() {
                picked = Some(MenuCommand::Toggle);
            }
            if ui.button(QUIT_LABEL).clicked() {
                picked = Some(MenuCommand::Quit);
            }
        });

        if picked.is_none() {
            picked = ui.input(|i| {
                if i.key_pressed(egui::Key::T) {
                    Some(MenuCommand::Toggle)
                } else if i.key_pressed(egui::Key::Q) {
                    Some(MenuCommand::Quit)
                } else {
                    None
                }
            });
        }
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::{MenuBar, DISABLE_LABEL, ENABLE_LABEL};
    use crate::ipc::Action;
    use crate::motion::OscillatorCueSource;
    use crate::overlay::OverlaySession;

    #[test]
    fn label_follows_every_state_change() {
        let mut session = OverlaySession::new(Box::new(OscillatorCueSource::default()));
        let menu = MenuBar::new();
        menu.attach(&mut session);
        assert_eq!(menu.toggle_label(), ENABLE_LABEL);

        session.apply(Action::Enable, 0.0);
        assert_eq!(menu.toggle_label(), DISABLE_LABEL);

        session.toggle(0.1);
        assert_eq!(menu.toggle_label(), ENABLE_LABEL);
    }
}
