use crate::domain::model::{ElementId, ObserveOptions, VisibilityEvent};
use crate::domain::ports::VisibilityObserver;
use crate::utils::error::{Result, SiteError};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::mpsc;

/// Host side of a [`ChannelObserver`]: the page pushes intersection changes here.
#[derive(Debug, Clone)]
pub struct VisibilityFeed {
    tx: mpsc::UnboundedSender<VisibilityEvent>,
}

impl VisibilityFeed {
    pub fn notify(&self, event: VisibilityEvent) -> Result<()> {
        self.tx.send(event).map_err(|_| SiteError::HostError {
            capability: "visibility observer (receiver dropped)".to_string(),
        })
    }
}

/// Visibility observer fed through a channel.
///
/// Events for elements that are not observed are dropped, and so are
/// intersecting events below the element's threshold.
pub struct ChannelObserver {
    rx: mpsc::UnboundedReceiver<VisibilityEvent>,
    observed: HashMap<ElementId, f64>,
    supported: bool,
}

pub fn visibility_channel() -> (VisibilityFeed, ChannelObserver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        VisibilityFeed { tx },
        ChannelObserver {
            rx,
            observed: HashMap::new(),
            supported: true,
        },
    )
}

impl ChannelObserver {
    /// Observer of a host with no visibility primitive.
    pub fn unsupported() -> Self {
        let (_feed, mut observer) = visibility_channel();
        observer.supported = false;
        observer
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    pub fn is_observing(&self, element: &ElementId) -> bool {
        self.observed.contains_key(element)
    }
}

#[async_trait]
impl VisibilityObserver for ChannelObserver {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn observe(&mut self, element: &ElementId, options: &ObserveOptions) -> Result<()> {
        if !self.supported {
            return Err(SiteError::HostError {
                capability: "visibility observer".to_string(),
            });
        }
        self.observed.insert(element.clone(), options.threshold);
        Ok(())
    }

    async fn unobserve(&mut self, element: &ElementId) {
        self.observed.remove(element);
    }

    async fn next_event(&mut self) -> Option<VisibilityEvent> {
        while let Some(event) = self.rx.recv().await {
            let Some(threshold) = self.observed.get(&event.element) else {
                continue;
            };
            if event.is_intersecting && event.ratio < *threshold {
                continue;
            }
            return Some(event);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_filters_unobserved_and_below_threshold() {
        let (feed, mut observer) = visibility_channel();
        let stats = ElementId::new("stats");
        observer
            .observe(&stats, &ObserveOptions::with_threshold(0.5))
            .await
            .unwrap();

        feed.notify(VisibilityEvent::entered("other", 1.0)).unwrap();
        feed.notify(VisibilityEvent::entered("stats", 0.2)).unwrap();
        feed.notify(VisibilityEvent::entered("stats", 0.6)).unwrap();
        drop(feed);

        let event = observer.next_event().await.unwrap();
        assert_eq!(event.element, stats);
        assert_eq!(event.ratio, 0.6);
        assert!(observer.next_event().await.is_none());
    }

    #[tokio::test]
    async fn test_unobserve_stops_delivery() {
        let (feed, mut observer) = visibility_channel();
        let hero = ElementId::new("hero");
        observer
            .observe(&hero, &ObserveOptions::with_threshold(0.1))
            .await
            .unwrap();
        observer.unobserve(&hero).await;

        feed.notify(VisibilityEvent::entered("hero", 1.0)).unwrap();
        drop(feed);
        assert!(observer.next_event().await.is_none());
        assert_eq!(observer.observed_count(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_observer_rejects_observe() {
        let mut observer = ChannelObserver::unsupported();
        assert!(!observer.is_supported());
        let err = observer
            .observe(&ElementId::new("x"), &ObserveOptions::with_threshold(0.5))
            .await
            .unwrap_err();
        assert!(matches!(err, SiteError::HostError { .. }));
    }
}
