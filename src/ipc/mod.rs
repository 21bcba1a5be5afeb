pub mod channel;
pub mod messages;

pub use channel::{send_action, CommandListener, CommandSender, DEFAULT_COMMAND_PORT};
pub use messages::{decode_command, encode_command, Action, COMMAND_CHANNEL};
