#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
}

impl SubmissionState {
    pub fn is_in_flight(self) -> bool {
        matches!(self, Self::InFlight)
    }
}

pub fn can_transition(from: SubmissionState, to: SubmissionState) -> bool {
    matches!(
        (from, to),
        (SubmissionState::Idle, SubmissionState::InFlight)
            | (SubmissionState::InFlight, SubmissionState::Idle)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_alternating_transitions_are_allowed() {
        assert!(can_transition(SubmissionState::Idle, SubmissionState::InFlight));
        assert!(can_transition(SubmissionState::InFlight, SubmissionState::Idle));
        assert!(!can_transition(SubmissionState::InFlight, SubmissionState::InFlight));
        assert!(!can_transition(SubmissionState::Idle, SubmissionState::Idle));
    }
}
