use crate::config::RevealConfig;
use crate::domain::model::{ElementId, ObserveOptions, VisibilityEvent};
use crate::domain::ports::{PageSurface, VisibilityObserver};
use crate::utils::error::Result;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Adds the visible class to scroll-animated elements as they enter the viewport.
///
/// Elements stay observed after their first reveal.
pub struct RevealController<O: VisibilityObserver> {
    observer: O,
    surface: Arc<dyn PageSurface>,
    options: ObserveOptions,
    visible_class: String,
    observed: HashSet<ElementId>,
    revealed: Arc<Mutex<HashSet<ElementId>>>,
}

impl<O: VisibilityObserver> RevealController<O> {
    pub fn new(config: &RevealConfig, observer: O, surface: Arc<dyn PageSurface>) -> Self {
        Self {
            observer,
            surface,
            options: ObserveOptions {
                threshold: config.threshold,
                root_margin: config.root_margin.clone(),
            },
            visible_class: config.visible_class.clone(),
            observed: HashSet::new(),
            revealed: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Observes elements carrying the animate class.
    ///
    /// Without a visibility primitive all of them are revealed at once. Either
    /// way the count of handled elements is returned.
    pub async fn register(&mut self, elements: &[ElementId]) -> Result<usize> {
        if elements.is_empty() {
            return Ok(0);
        }

        if !self.observer.is_supported() {
            tracing::info!("Visibility observer unavailable, revealing {} elements", elements.len());
            for element in elements {
                self.mark_visible(element);
            }
            return Ok(elements.len());
        }

        for element in elements {
            if self.observed.insert(element.clone()) {
                self.observer.observe(element, &self.options).await?;
            }
        }
        Ok(self.observed.len())
    }

    /// Returns `true` when the element became visible for the first time.
    pub fn handle_event(&mut self, event: &VisibilityEvent) -> bool {
        if !event.is_intersecting || event.ratio < self.options.threshold {
            return false;
        }
        if !self.observed.contains(&event.element) {
            return false;
        }
        self.mark_visible(&event.element)
    }

    /// Processes observer events until the observer closes.
    pub async fn run(&mut self) {
        while let Some(event) = self.observer.next_event().await {
            self.handle_event(&event);
        }
        tracing::debug!("Reveal observer closed, {} elements revealed", self.revealed_count());
    }

    /// Reveals `element` after `delay` on a background task.
    pub fn reveal(&self, element: &ElementId, delay: Duration) -> JoinHandle<()> {
        let surface = Arc::clone(&self.surface);
        let revealed = Arc::clone(&self.revealed);
        let element = element.clone();
        let class = self.visible_class.clone();
        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            show(surface.as_ref(), &revealed, &element, &class);
        })
    }

    pub fn hide(&mut self, element: &ElementId) {
        self.surface.remove_class(element, &self.visible_class);
        if let Ok(mut revealed) = self.revealed.lock() {
            revealed.remove(element);
        }
    }

    pub fn is_revealed(&self, element: &ElementId) -> bool {
        self.revealed
            .lock()
            .map(|revealed| revealed.contains(element))
            .unwrap_or(false)
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.lock().map(|revealed| revealed.len()).unwrap_or(0)
    }

    fn mark_visible(&mut self, element: &ElementId) -> bool {
        show(self.surface.as_ref(), &self.revealed, element, &self.visible_class)
    }
}

/// Adds the class and records the element. Returns `true` on first reveal.
fn show(surface: &dyn PageSurface, revealed: &Mutex<HashSet<ElementId>>, element: &ElementId, class: &str) -> bool {
    surface.add_class(element, class);
    revealed
        .lock()
        .map(|mut revealed| revealed.insert(element.clone()))
        .unwrap_or(false)
}
