use crate::domain::model::ElementId;
use crate::domain::ports::{PageSurface, SessionStore};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

/// Tab-scoped storage kept in memory. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemorySessionStore {
    fn get_item(&self, key: &str) -> Option<String> {
        let items = self.items.lock().ok()?;
        items.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Ok(mut items) = self.items.lock() {
            items.insert(key.to_string(), value.to_string());
        }
    }

    fn remove_item(&self, key: &str) {
        if let Ok(mut items) = self.items.lock() {
            items.remove(key);
        }
    }
}

#[derive(Debug, Clone, Default)]
struct ElementState {
    texts: Vec<String>,
    classes: BTreeSet<String>,
    styles: HashMap<String, String>,
}

/// Headless page surface that records every write.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    elements: Arc<Mutex<HashMap<ElementId, ElementState>>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_element<T>(&self, element: &ElementId, f: impl FnOnce(&mut ElementState) -> T) -> Option<T> {
        let mut elements = self.elements.lock().ok()?;
        Some(f(elements.entry(element.clone()).or_default()))
    }

    fn read<T>(&self, element: &ElementId, f: impl FnOnce(&ElementState) -> T) -> Option<T> {
        let elements = self.elements.lock().ok()?;
        elements.get(element).map(f)
    }

    pub fn text(&self, element: &ElementId) -> Option<String> {
        self.read(element, |state| state.texts.last().cloned()).flatten()
    }

    /// Every text written to `element`, oldest first.
    pub fn text_history(&self, element: &ElementId) -> Vec<String> {
        self.read(element, |state| state.texts.clone()).unwrap_or_default()
    }

    pub fn has_class(&self, element: &ElementId, class: &str) -> bool {
        self.read(element, |state| state.classes.contains(class)).unwrap_or(false)
    }

    pub fn style(&self, element: &ElementId, property: &str) -> Option<String> {
        self.read(element, |state| state.styles.get(property).cloned()).flatten()
    }
}

impl PageSurface for MemorySurface {
    fn set_text(&self, element: &ElementId, text: &str) {
        self.with_element(element, |state| state.texts.push(text.to_string()));
    }

    fn add_class(&self, element: &ElementId, class: &str) {
        self.with_element(element, |state| state.classes.insert(class.to_string()));
    }

    fn remove_class(&self, element: &ElementId, class: &str) {
        self.with_element(element, |state| state.classes.remove(class));
    }

    fn set_style(&self, element: &ElementId, property: &str, value: &str) {
        self.with_element(element, |state| {
            state.styles.insert(property.to_string(), value.to_string())
        });
    }
}
