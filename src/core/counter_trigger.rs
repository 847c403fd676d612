use crate::config::CounterConfig;
use crate::core::attributes::{parse_counter_spec, PageElement};
use crate::core::counter::{CounterHandle, TimedCounter};
use crate::core::format::CounterFormat;
use crate::domain::model::{CounterSpec, ElementId, ObserveOptions, RunOutcome, VisibilityEvent};
use crate::domain::ports::{FrameClock, PageSurface, VisibilityObserver};
use crate::utils::error::Result;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Starts one counter per element the first time it becomes visible.
///
/// Once started, an element is unobserved and further visibility events for it
/// are ignored, so a counter never restarts.
pub struct CounterTrigger<O, M, C>
where
    O: VisibilityObserver,
    M: Fn() -> C,
    C: FrameClock + 'static,
{
    observer: O,
    surface: Arc<dyn PageSurface>,
    make_clock: M,
    options: ObserveOptions,
    separator: String,
    default_duration_ms: i64,
    pending: HashMap<ElementId, CounterSpec>,
    started: HashSet<ElementId>,
    handles: Vec<(ElementId, CounterHandle)>,
}

impl<O, M, C> CounterTrigger<O, M, C>
where
    O: VisibilityObserver,
    M: Fn() -> C,
    C: FrameClock + 'static,
{
    pub fn new(config: &CounterConfig, observer: O, surface: Arc<dyn PageSurface>, make_clock: M) -> Self {
        Self {
            observer,
            surface,
            make_clock,
            options: ObserveOptions::with_threshold(config.threshold),
            separator: config.separator.clone(),
            default_duration_ms: config.default_duration_ms,
            pending: HashMap::new(),
            started: HashSet::new(),
            handles: Vec::new(),
        }
    }

    /// Parses and observes counter elements. Returns how many were accepted.
    ///
    /// Elements with unusable attributes are skipped. Without a visibility
    /// primitive every accepted counter starts right away.
    pub async fn register(&mut self, elements: &[PageElement]) -> Result<usize> {
        let mut accepted = Vec::new();
        for element in elements {
            if self.started.contains(&element.id) || self.pending.contains_key(&element.id) {
                tracing::debug!("Counter '{}' already registered, skipping", element.id);
                continue;
            }
            match parse_counter_spec(element, self.default_duration_ms) {
                Ok(spec) => accepted.push((element.id.clone(), spec)),
                Err(e) => {
                    tracing::warn!("⚠️ Skipping counter: {} ({})", e, e.recovery_suggestion());
                }
            }
        }

        let count = accepted.len();
        if !self.observer.is_supported() {
            tracing::info!("Visibility observer unavailable, starting {} counters immediately", count);
            for (id, spec) in accepted {
                self.start(id, spec);
            }
            return Ok(count);
        }

        for (id, spec) in accepted {
            self.observer.observe(&id, &self.options).await?;
            self.pending.insert(id, spec);
        }
        tracing::debug!("Observing {} counters", self.pending.len());
        Ok(count)
    }

    /// Returns `true` when this event started a counter.
    pub async fn handle_event(&mut self, event: VisibilityEvent) -> bool {
        if !event.is_intersecting || event.ratio < self.options.threshold {
            return false;
        }
        if self.started.contains(&event.element) {
            tracing::debug!("Counter '{}' already started, ignoring repeat trigger", event.element);
            return false;
        }
        let Some(spec) = self.pending.remove(&event.element) else {
            return false;
        };

        self.observer.unobserve(&event.element).await;
        self.start(event.element, spec);
        true
    }

    /// Feeds observer events until every counter has started or the observer closes.
    pub async fn run(&mut self) -> usize {
        while !self.pending.is_empty() {
            match self.observer.next_event().await {
                Some(event) => {
                    self.handle_event(event).await;
                }
                None => {
                    tracing::debug!("Visibility observer closed with {} counters pending", self.pending.len());
                    break;
                }
            }
        }
        self.started.len()
    }

    fn start(&mut self, id: ElementId, spec: CounterSpec) {
        let format = CounterFormat::new(spec.prefix, spec.suffix, self.separator.clone());
        let surface = Arc::clone(&self.surface);
        let element = id.clone();

        tracing::debug!(
            "Starting counter '{}' to {} over {}ms",
            id,
            spec.target,
            spec.duration_ms
        );
        let handle = TimedCounter::new(spec.target, spec.duration_ms).spawn(
            (self.make_clock)(),
            move |value| surface.set_text(&element, &format.render(value)),
        );

        self.started.insert(id.clone());
        self.handles.push((id, handle));
    }

    pub fn handle(&self, element: &ElementId) -> Option<&CounterHandle> {
        self.handles
            .iter()
            .find(|(id, _)| id == element)
            .map(|(_, handle)| handle)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn started_count(&self) -> usize {
        self.started.len()
    }

    pub fn cancel_all(&self) {
        for (_, handle) in &self.handles {
            handle.cancel();
        }
    }

    /// Waits for every started run. Elements stay marked as started.
    pub async fn join_all(&mut self) -> Result<Vec<(ElementId, RunOutcome)>> {
        let mut outcomes = Vec::with_capacity(self.handles.len());
        for (id, handle) in self.handles.drain(..) {
            outcomes.push((id, handle.finished().await?));
        }
        Ok(outcomes)
    }
}
