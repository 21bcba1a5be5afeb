use crate::ipc::Action;

pub const USAGE: &str = "Usage: sickmotionctl [toggle|enable|disable]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseArgsResult<T> {
    Parsed(T),
    Usage(String),
}

/// Run `parser` over `args`, falling back to the usage text when it
/// rejects them.
pub fn parse_args<T>(
    args: &[&str],
    usage: &str,
    parser: impl FnOnce(&[&str]) -> Option<T>,
) -> ParseArgsResult<T> {
    match parser(args) {
        Some(parsed) => ParseArgsResult::Parsed(parsed),
        None => ParseArgsResult::Usage(usage.to_string()),
    }
}

/// Arguments of `sickmotionctl`. No argument means `toggle`.
pub fn parse_ctl_args(args: &[&str]) -> ParseArgsResult<Action> {
    parse_args(args, USAGE, |args| match args {
        [] => Some(Action::Toggle),
        [action] => action.parse().ok(),
        _ => None,
    })
}

/// Arguments of `sickmotion-launch`. The action is required.
pub fn parse_launch_args(args: &[&str]) -> ParseArgsResult<Action> {
    parse_args(
        args,
        "Usage: sickmotion-launch <enable|disable|toggle>",
        |args| match args {
            [action] => action.parse().ok(),
            _ => None,
        },
    )
}

pub fn confirmation_line(action: Action) -> String {
    format!("Sent action: {action}")
}

#[cfg(test)]
mod tests {
    use super::{confirmation_line, parse_ctl_args, parse_launch_args, ParseArgsResult, USAGE};
    use crate::ipc::Action;

    #[test]
    fn ctl_defaults_to_toggle() {
        assert_eq!(parse_ctl_args(&[]), ParseArgsResult::Parsed(Action::Toggle));
        assert_eq!(
            parse_ctl_args(&["disable"]),
            ParseArgsResult::Parsed(Action::Disable)
        );
    }

    #[test]
    fn ctl_rejects_unknown_and_extra_arguments() {
        let usage = ParseArgsResult::Usage(USAGE.to_string());
        assert_eq!(parse_ctl_args(&["flip"]), usage);
        assert_eq!(parse_ctl_args(&["toggle", "enable"]), usage);
    }

    #[test]
    fn launch_requires_an_action() {
        assert!(matches!(parse_launch_args(&[]), ParseArgsResult::Usage(_)));
        assert_eq!(
            parse_launch_args(&["enable"]),
            ParseArgsResult::Parsed(Action::Enable)
        );
    }

    #[test]
    fn confirmation_names_the_action() {
        assert_eq!(confirmation_line(Action::Enable), "Sent action: enable");
    }
}
