pub mod cli;
pub mod clock;
pub mod cue;
pub mod gui;
pub mod ipc;
pub mod launcher_ext;
pub mod logging;
pub mod menu;
pub mod motion;
pub mod overlay;
pub mod settings;
pub mod toast_log;
