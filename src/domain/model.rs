use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Host-side identifier of a page element (an `id` or any stable handle).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Parsed `counter-*` attributes of one display element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterSpec {
    pub target: u64,
    /// Signed on purpose: a non-positive duration means "complete immediately".
    pub duration_ms: i64,
    pub prefix: String,
    pub suffix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterState {
    Pending,
    Running,
    Complete,
    Cancelled,
    /// The frame source stopped delivering frames before the run finished.
    Stalled,
}

impl CounterState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, CounterState::Pending | CounterState::Running)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { frames: u32 },
    Cancelled { last_value: u64 },
    Stalled { last_value: u64 },
}

impl RunOutcome {
    pub fn state(&self) -> CounterState {
        match self {
            RunOutcome::Completed { .. } => CounterState::Complete,
            RunOutcome::Cancelled { .. } => CounterState::Cancelled,
            RunOutcome::Stalled { .. } => CounterState::Stalled,
        }
    }
}

/// Options passed to the host's visibility primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserveOptions {
    pub threshold: f64,
    pub root_margin: String,
}

impl ObserveOptions {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            root_margin: "0px".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityEvent {
    pub element: ElementId,
    /// Visible fraction of the element, 0.0..=1.0.
    pub ratio: f64,
    pub is_intersecting: bool,
}

impl VisibilityEvent {
    pub fn entered(element: impl Into<String>, ratio: f64) -> Self {
        Self {
            element: ElementId::new(element),
            ratio,
            is_intersecting: true,
        }
    }

    pub fn left(element: impl Into<String>) -> Self {
        Self {
            element: ElementId::new(element),
            ratio: 0.0,
            is_intersecting: false,
        }
    }
}

/// Layout box of a `<section id=..>`, in document coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionBox {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavButton {
    pub element: ElementId,
    pub section: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// Redirect the host should perform, possibly after a delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: String,
    pub after: Duration,
}
