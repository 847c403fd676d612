use crate::domain::model::ElementId;
use crate::domain::ports::PageSurface;
use std::io::Write;

/// Renders element text on a single, rewritten terminal line.
#[derive(Debug, Clone, Default)]
pub struct TerminalSurface;

impl PageSurface for TerminalSurface {
    fn set_text(&self, _element: &ElementId, text: &str) {
        let mut stdout = std::io::stdout().lock();
        // 以 \r 覆寫同一行，末尾空白清掉較長的舊內容
        let _ = write!(stdout, "\r{:<24}", text);
        let _ = stdout.flush();
    }

    fn add_class(&self, element: &ElementId, class: &str) {
        tracing::debug!("{} += .{}", element, class);
    }

    fn remove_class(&self, element: &ElementId, class: &str) {
        tracing::debug!("{} -= .{}", element, class);
    }

    fn set_style(&self, element: &ElementId, property: &str, value: &str) {
        tracing::debug!("{} {{ {}: {} }}", element, property, value);
    }
}
