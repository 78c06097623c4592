//! Domain state as reported by the hypervisor.

/// Domain states, indexed by the hypervisor's raw state code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainState {
    /// No state (code 0).
    NoState,
    /// Running (code 1).
    Running,
    /// Blocked on resource (code 2).
    Blocked,
    /// Paused by user (code 3).
    Paused,
    /// Being shut down (code 4).
    Shutdown,
    /// Shut off (code 5).
    Shutoff,
    /// Crashed (code 6).
    Crashed,
    /// Suspended by guest power management (code 7).
    PmSuspended,
    /// Sentinel past the last real state (code 8).
    Last,
}

impl DomainState {
    const ALL: [DomainState; 9] = [
        DomainState::NoState,
        DomainState::Running,
        DomainState::Blocked,
        DomainState::Paused,
        DomainState::Shutdown,
        DomainState::Shutoff,
        DomainState::Crashed,
        DomainState::PmSuspended,
        DomainState::Last,
    ];

    /// Map a raw state code. Returns `None` for codes past the table.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Raw state code.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Human-readable description served by the state endpoint.
    ///
    /// `NoState` and `Last` both describe as the empty string.
    pub fn description(self) -> &'static str {
        match self {
            DomainState::NoState => "",
            DomainState::Running => "running",
            DomainState::Blocked => "blocked on resource",
            DomainState::Paused => "paused by user",
            DomainState::Shutdown => "being shutdown",
            DomainState::Shutoff => "shut off",
            DomainState::Crashed => "crashed",
            DomainState::PmSuspended => "suspended by guest power management",
            DomainState::Last => "",
        }
    }

    /// Check if the domain is running.
    pub fn is_running(self) -> bool {
        matches!(self, DomainState::Running)
    }
}

impl std::fmt::Display for DomainState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}
