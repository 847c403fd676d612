pub mod attributes;
pub mod counter;
pub mod counter_trigger;
pub mod easing;
pub mod format;
pub mod gate;
pub mod navigation;
pub mod parallax;
pub mod reveal;

pub use crate::domain::model::{CounterSpec, CounterState, ElementId, RunOutcome, VisibilityEvent};
pub use crate::domain::ports::{FrameClock, PageSurface, SessionStore, VisibilityObserver};
pub use crate::utils::error::Result;
