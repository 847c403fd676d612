use crate::domain::model::{ElementId, ObserveOptions, VisibilityEvent};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// "Run before next redraw" scheduling, expressed as a stream of frame timestamps.
///
/// Timestamps are offsets from an arbitrary, per-clock epoch and are compared
/// only against `now()` of the same clock.
pub trait FrameClock: Send {
    fn now(&self) -> Duration;

    /// Waits for the next frame. `None` means the host stopped scheduling frames.
    fn next_frame(&mut self) -> impl std::future::Future<Output = Option<Duration>> + Send;
}

/// "Element entered viewport" primitive of the host.
#[async_trait]
pub trait VisibilityObserver: Send {
    /// Hosts without a visibility primitive report `false`; callers fall back.
    fn is_supported(&self) -> bool {
        true
    }

    async fn observe(&mut self, element: &ElementId, options: &ObserveOptions) -> Result<()>;

    async fn unobserve(&mut self, element: &ElementId);

    /// Next visibility change for an observed element. `None` once the host is gone.
    async fn next_event(&mut self) -> Option<VisibilityEvent>;
}

/// Write side of the page: text, classes and inline styles.
pub trait PageSurface: Send + Sync {
    fn set_text(&self, element: &ElementId, text: &str);
    fn add_class(&self, element: &ElementId, class: &str);
    fn remove_class(&self, element: &ElementId, class: &str);
    fn set_style(&self, element: &ElementId, property: &str, value: &str);
}

/// Tab-scoped key-value storage.
pub trait SessionStore: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}
