//! Lookup lifecycle state machine (resolve, then fetch).
//!
//! Used by LookupController. Transitions that do not apply to the current
//! phase leave it unchanged.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupPhase {
    #[default]
    Idle,
    Resolving,
    Fetching,
    Ready,
    Failed,
    Cancelled,
}

impl LookupPhase {
    /// True while a lookup task may still report back.
    pub fn is_in_flight(self) -> bool {
        matches!(self, LookupPhase::Resolving | LookupPhase::Fetching)
    }

    /// A new non-empty query starts resolving from any phase.
    pub fn on_query_changed(self) -> Self {
        LookupPhase::Resolving
    }

    pub fn on_resolved(self) -> Self {
        match self {
            LookupPhase::Resolving => LookupPhase::Fetching,
            other => other,
        }
    }

    pub fn on_forecast_ready(self) -> Self {
        match self {
            LookupPhase::Fetching => LookupPhase::Ready,
            other => other,
        }
    }

    pub fn on_failed(self) -> Self {
        if self.is_in_flight() {
            LookupPhase::Failed
        } else {
            self
        }
    }

    /// The in-flight lookup was superseded or aborted.
    pub fn on_cancelled(self) -> Self {
        if self.is_in_flight() {
            LookupPhase::Cancelled
        } else {
            self
        }
    }
}
