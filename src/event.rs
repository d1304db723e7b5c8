use std::fmt;

/// Stage of an enumeration a [`TraversalEvent`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Namespaces,
    Groups,
    Resources,
    Listing,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Namespaces => "namespaces",
            Phase::Groups => "groups",
            Phase::Resources => "resources",
            Phase::Listing => "listing",
            Phase::Done => "done",
        })
    }
}

/// A progress notification emitted while enumerating a cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalEvent {
    pub phase: Phase,
    pub detail: String,
    /// Whether the step this event reports on failed.
    pub failed: bool,
}

impl TraversalEvent {
    pub fn progress(phase: Phase, detail: impl Into<String>) -> Self {
        Self {
            phase,
            detail: detail.into(),
            failed: false,
        }
    }

    pub fn failure(phase: Phase, detail: impl Into<String>) -> Self {
        Self {
            phase,
            detail: detail.into(),
            failed: true,
        }
    }
}

/// Receiver of [`TraversalEvent`]s.
///
/// Any `Fn(TraversalEvent)` closure is a sink.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: TraversalEvent);
}

impl<F> EventSink for F
where
    F: Fn(TraversalEvent) + Send + Sync,
{
    fn emit(&self, event: TraversalEvent) {
        self(event)
    }
}

/// Forwards events to `tracing`: progress at `debug`, failures at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: TraversalEvent) {
        if event.failed {
            tracing::warn!(phase = %event.phase, "{}", event.detail);
        } else {
            tracing::debug!(phase = %event.phase, "{}", event.detail);
        }
    }
}
