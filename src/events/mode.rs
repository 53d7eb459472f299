use std::fmt;

/// Последний наблюдаемый режим пульта
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ModeState {
    /// Пульт только что создан, режим ещё ни разу не прочитан
    #[default]
    Uninitialized,
    Known(i64),
}

impl ModeState {
    pub fn mode(&self) -> Option<i64> {
        match self {
            ModeState::Uninitialized => None,
            ModeState::Known(mode) => Some(*mode),
        }
    }

    /// Первое успешное чтение всегда считается сменой режима
    pub fn differs_from(&self, mode: i64) -> bool {
        self.mode() != Some(mode)
    }
}

impl fmt::Display for ModeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeState::Uninitialized => write!(f, "<unset>"),
            ModeState::Known(mode) => write!(f, "{}", mode),
        }
    }
}

/// Результат успешного опроса пульта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollOutcome {
    Unchanged(i64),
    Changed { from: ModeState, to: i64 },
}

impl PollOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, PollOutcome::Changed { .. })
    }
}

impl fmt::Display for PollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollOutcome::Unchanged(mode) => write!(f, "режим {} без изменений", mode),
            PollOutcome::Changed { from, to } => write!(f, "режим {} -> {}", from, to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialized_differs_from_everything() {
        let state = ModeState::default();
        assert!(state.differs_from(0));
        assert!(state.differs_from(-1));
        assert_eq!(state.mode(), None);
    }

    #[test]
    fn test_known_state_compares_value() {
        let state = ModeState::Known(1);
        assert!(!state.differs_from(1));
        assert!(state.differs_from(2));
    }

    #[test]
    fn test_outcome_display() {
        let outcome = PollOutcome::Changed { from: ModeState::Uninitialized, to: 1 };
        assert!(outcome.is_changed());
        assert_eq!(outcome.to_string(), "режим <unset> -> 1");
        assert!(!PollOutcome::Unchanged(1).is_changed());
    }
}
