use std::convert::TryFrom;
use std::fmt;

// Lifecycle of one dataset download
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FetchState {
    Loading,
    Ready,
    Failed,
}

impl fmt::Display for FetchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading"),
            Self::Ready => write!(f, "Ready"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchEvent {
    Received(usize),
    Error(String),
}

impl fmt::Display for FetchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Received(count) => write!(f, "Received({count})"),
            Self::Error(msg) => write!(f, "Error({msg})"),
        }
    }
}

#[derive(Debug)]
pub struct StateTransitionError {
    from: FetchState,
    event: FetchEvent,
}

impl fmt::Display for StateTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} with event {}",
            self.from, self.event
        )
    }
}

impl std::error::Error for StateTransitionError {}

/// Tracks a single fetch. Each dataset is requested once, so both `Ready`
/// and `Failed` are terminal.
#[derive(Debug, Clone)]
pub struct FetchMachine {
    state: FetchState,
    records: usize,
    error: Option<String>,
}

impl FetchMachine {
    pub const fn new() -> Self {
        Self {
            state: FetchState::Loading,
            records: 0,
            error: None,
        }
    }

    pub const fn state(&self) -> FetchState {
        self.state
    }

    pub const fn records(&self) -> usize {
        self.records
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_ready(&self) -> bool {
        self.state == FetchState::Ready
    }

    pub fn process_event(&mut self, event: &FetchEvent) -> Result<(), StateTransitionError> {
        let next = NextState::try_from((self.state, event))?;
        match event {
            FetchEvent::Received(count) => self.records = *count,
            FetchEvent::Error(msg) => self.error = Some(msg.clone()),
        }
        self.state = next.0;
        Ok(())
    }
}

impl Default for FetchMachine {
    fn default() -> Self {
        Self::new()
    }
}

struct NextState(FetchState);

impl TryFrom<(FetchState, &FetchEvent)> for NextState {
    type Error = StateTransitionError;

    fn try_from(value: (FetchState, &FetchEvent)) -> Result<Self, Self::Error> {
        let (current, event) = value;
        match (current, event) {
            (FetchState::Loading, FetchEvent::Received(_)) => Ok(Self(FetchState::Ready)),
            (FetchState::Loading, FetchEvent::Error(_)) => Ok(Self(FetchState::Failed)),
            _ => Err(StateTransitionError {
                from: current,
                event: event.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_becomes_ready_with_a_count() {
        let mut machine = FetchMachine::new();
        machine.process_event(&FetchEvent::Received(12)).unwrap();
        assert_eq!(machine.state(), FetchState::Ready);
        assert_eq!(machine.records(), 12);
    }

    #[test]
    fn failures_are_terminal() {
        let mut machine = FetchMachine::new();
        machine
            .process_event(&FetchEvent::Error("timed out".to_string()))
            .unwrap();
        assert_eq!(machine.state(), FetchState::Failed);
        assert_eq!(machine.error(), Some("timed out"));

        let err = machine.process_event(&FetchEvent::Received(3)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid transition from Failed with event Received(3)"
        );
        assert_eq!(machine.records(), 0);
    }
}
