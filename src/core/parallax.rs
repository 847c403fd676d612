use crate::config::ParallaxConfig;
use crate::core::attributes::{parse_float_prefix, PageElement, ATTR_PARALLAX};
use crate::domain::model::ElementId;
use crate::domain::ports::PageSurface;
use std::sync::Arc;

pub fn parallax_offset(scroll_y: f64, speed: f64) -> f64 {
    scroll_y * speed
}

/// Missing, non-numeric and zero speeds all fall back to `default_speed`.
pub fn parse_speed(raw: Option<&str>, default_speed: f64) -> f64 {
    raw.and_then(parse_float_prefix)
        .filter(|speed| *speed != 0.0)
        .unwrap_or(default_speed)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxLayer {
    pub element: ElementId,
    pub speed: f64,
}

pub struct Parallax {
    surface: Arc<dyn PageSurface>,
    layers: Vec<ParallaxLayer>,
}

impl Parallax {
    pub fn new(config: &ParallaxConfig, surface: Arc<dyn PageSurface>, elements: &[PageElement]) -> Self {
        let layers = elements
            .iter()
            .map(|element| ParallaxLayer {
                element: element.id.clone(),
                speed: parse_speed(element.attribute(ATTR_PARALLAX), config.default_speed),
            })
            .collect();
        Self { surface, layers }
    }

    pub fn layers(&self) -> &[ParallaxLayer] {
        &self.layers
    }

    pub fn on_scroll(&self, scroll_y: f64) {
        for layer in &self.layers {
            let offset = parallax_offset(scroll_y, layer.speed);
            self.surface
                .set_style(&layer.element, "transform", &format!("translateY({}px)", offset));
        }
    }
}
