use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Name of the command channel. Envelopes carrying any other name are
/// ignored.
pub const COMMAND_CHANNEL: &str = "com.sickmotion.command";
/// Payload key holding the action literal.
pub const ACTION_KEY: &str = "action";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Toggle,
    Enable,
    Disable,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Toggle, Action::Enable, Action::Disable];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Toggle => "toggle",
            Action::Enable => "enable",
            Action::Disable => "disable",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown action '{}'", self.0)
    }
}

impl std::error::Error for UnknownAction {}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

/// Wire form of one command: a channel name plus a free-form payload map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub channel: String,
    #[serde(default)]
    pub payload: Map<String, Value>,
}

impl CommandEnvelope {
    pub fn for_action(action: Action) -> Self {
        let mut payload = Map::new();
        payload.insert(ACTION_KEY.to_string(), Value::from(action.as_str()));
        Self {
            channel: COMMAND_CHANNEL.to_string(),
            payload,
        }
    }

    /// The requested action, if the payload names a known one.
    pub fn action(&self) -> Option<Action> {
        self.payload
            .get(ACTION_KEY)
            .and_then(Value::as_str)
            .and_then(|raw| raw.parse().ok())
    }
}

pub fn encode_command(action: Action) -> anyhow::Result<Vec<u8>> {
    Ok(serde_json::to_vec(&CommandEnvelope::for_action(action))?)
}

/// Decode a datagram. Anything malformed, addressed to another channel, or
/// naming an unknown action yields `None`.
pub fn decode_command(bytes: &[u8]) -> Option<Action> {
    let envelope: CommandEnvelope = serde_json::from_slice(bytes).ok()?;
    if envelope.channel != COMMAND_CHANNEL {
        return None;
    }
    envelope.action()
}
