//! Machine lifecycle status.

use std::fmt::{self, Display};

/// The five-state lifecycle governing when loading and running are legal.
///
/// `load` requires [`Waiting`](MachineStatus::Waiting) and `run` requires
/// [`Ready`](MachineStatus::Ready); called in any other state they are
/// no-ops returning the current status. `reset` is legal from every state.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum MachineStatus {
    /// No program loaded; accepts `load`.
    #[default]
    Waiting,
    /// Program loaded; accepts `run`.
    Ready,
    /// Executing; never observable from outside a `run` call.
    Running,
    /// Terminated normally.
    Halted,
    /// Terminated abnormally.
    Errored,
}

impl MachineStatus {
    /// Returns the textual name of this status.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MachineStatus::Waiting => "WAITING",
            MachineStatus::Ready => "READY",
            MachineStatus::Running => "RUNNING",
            MachineStatus::Halted => "HALTED",
            MachineStatus::Errored => "ERRORED",
        }
    }

    /// Whether only `reset` can leave this status.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, MachineStatus::Halted | MachineStatus::Errored)
    }
}

impl Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display() {
        assert_eq!(MachineStatus::Waiting.to_string(), "WAITING");
        assert_eq!(MachineStatus::Ready.to_string(), "READY");
        assert_eq!(MachineStatus::Running.to_string(), "RUNNING");
        assert_eq!(MachineStatus::Halted.to_string(), "HALTED");
        assert_eq!(MachineStatus::Errored.to_string(), "ERRORED");
    }

    #[test]
    fn terminal_statuses() {
        assert!(MachineStatus::Halted.is_terminal());
        assert!(MachineStatus::Errored.is_terminal());
        assert!(!MachineStatus::Waiting.is_terminal());
        assert!(!MachineStatus::Ready.is_terminal());
        assert!(!MachineStatus::Running.is_terminal());
    }
}
