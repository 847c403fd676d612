use crate::config::NavigationConfig;
use crate::domain::model::{ElementId, NavButton, ScrollBehavior, ScrollMetrics, ScrollRequest, SectionBox};
use crate::domain::ports::PageSurface;
use std::sync::Arc;

/// Percentage of the scrollable distance already covered, `0.0..=100.0`.
pub fn scroll_progress(metrics: ScrollMetrics) -> f64 {
    let scrollable = metrics.scroll_height - metrics.client_height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    (metrics.scroll_top / scrollable * 100.0).clamp(0.0, 100.0)
}

/// Section under the reading line. Later sections win when boxes overlap.
pub fn active_section(sections: &[SectionBox], scroll_y: f64, activation_offset: f64) -> Option<&str> {
    sections
        .iter()
        .filter(|section| {
            let top = section.top - activation_offset;
            scroll_y >= top && scroll_y < top + section.height
        })
        .last()
        .map(|section| section.id.as_str())
}

/// Scroll position that puts `element_top` just below the fixed nav bar.
pub fn scroll_target(element_top: f64, nav_offset: f64) -> ScrollRequest {
    ScrollRequest {
        top: element_top - nav_offset,
        behavior: ScrollBehavior::Smooth,
    }
}

pub fn scroll_to_top() -> ScrollRequest {
    ScrollRequest {
        top: 0.0,
        behavior: ScrollBehavior::Smooth,
    }
}

/// Section navigation: progress bar, active nav button and scroll targets.
pub struct Navigator {
    surface: Arc<dyn PageSurface>,
    progress_bar: ElementId,
    active_class: String,
    nav_offset: f64,
    activation_offset: f64,
    buttons: Vec<NavButton>,
    sections: Vec<SectionBox>,
    active: Option<String>,
}

impl Navigator {
    pub fn new(
        config: &NavigationConfig,
        surface: Arc<dyn PageSurface>,
        buttons: Vec<NavButton>,
        sections: Vec<SectionBox>,
    ) -> Self {
        Self {
            surface,
            progress_bar: ElementId::new(config.progress_bar_id.clone()),
            active_class: config.active_class.clone(),
            nav_offset: config.nav_offset,
            activation_offset: config.activation_offset,
            buttons,
            sections,
            active: None,
        }
    }

    /// Replaces section boxes after a relayout.
    pub fn set_sections(&mut self, sections: Vec<SectionBox>) {
        self.sections = sections;
    }

    pub fn active_section(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Updates the progress bar and the active button for a scroll position.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> Option<&str> {
        let percent = scroll_progress(metrics);
        self.surface
            .set_style(&self.progress_bar, "width", &format!("{}%", percent));

        if self.sections.is_empty() || self.buttons.is_empty() {
            return None;
        }

        let current =
            active_section(&self.sections, metrics.scroll_top, self.activation_offset).map(str::to_string);
        for button in &self.buttons {
            self.surface.remove_class(&button.element, &self.active_class);
            if current.as_deref() == Some(button.section.as_str()) {
                self.surface.add_class(&button.element, &self.active_class);
            }
        }

        if current != self.active {
            tracing::debug!("Active section changed: {:?} -> {:?}", self.active, current);
        }
        self.active = current;
        self.active.as_deref()
    }

    /// Scroll request for a section. `None` for unknown sections.
    pub fn scroll_to_section(&self, section_id: &str) -> Option<ScrollRequest> {
        self.sections
            .iter()
            .find(|section| section.id == section_id)
            .map(|section| scroll_target(section.top, self.nav_offset))
    }

    /// Handles a click on a nav button: marks it as the only active button
    /// and returns where to scroll.
    pub fn on_nav_click(&mut self, element: &ElementId) -> Option<ScrollRequest> {
        let section = self
            .buttons
            .iter()
            .find(|button| &button.element == element)?
            .section
            .clone();

        let request = self.scroll_to_section(&section);
        for button in &self.buttons {
            self.surface.remove_class(&button.element, &self.active_class);
        }
        self.surface.add_class(element, &self.active_class);
        request
    }
}
