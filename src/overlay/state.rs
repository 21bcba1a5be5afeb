#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Disabled,
    Enabled,
}

impl SessionState {
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }

    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SessionState;

    #[test]
    fn initial_state_is_disabled() {
        assert_eq!(SessionState::default(), SessionState::Disabled);
        assert!(!SessionState::default().is_enabled());
    }

    #[test]
    fn from_enabled_round_trips_the_flag() {
        assert!(SessionState::from_enabled(true).is_enabled());
        assert_eq!(SessionState::from_enabled(false), SessionState::Disabled);
    }
}
