use crate::domain::model::{CounterSpec, ElementId};
use crate::utils::error::{Result, SiteError};
use std::collections::HashMap;

pub const ATTR_TARGET: &str = "counter-target";
pub const ATTR_DURATION: &str = "counter-duration";
pub const ATTR_PREFIX: &str = "counter-prefix";
pub const ATTR_SUFFIX: &str = "counter-suffix";
pub const ATTR_PARALLAX: &str = "parallax";

/// A page element as the host hands it over: an id plus its raw attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageElement {
    pub id: ElementId,
    pub attributes: HashMap<String, String>,
}

impl PageElement {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: ElementId::new(id),
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Leading-integer parse: `" 42px"` -> 42, `"-7"` -> -7, `"abc"` -> None.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Whether `raw` starts like an integer, optionally signed.
fn has_digit_prefix(raw: &str) -> bool {
    let s = raw.trim_start();
    let s = s.strip_prefix(['-', '+']).unwrap_or(s);
    s.starts_with(|c: char| c.is_ascii_digit())
}

/// Leading-decimal parse: `"0.3x"` -> 0.3, `"-.5"` -> -0.5, `"x"` -> None.
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end = 1;
    }

    let mut seen_digit = false;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }

    if !seen_digit {
        return None;
    }
    s[..end].trim_end_matches('.').parse().ok()
}

/// Reads the `counter-*` attributes of one element.
///
/// A missing or non-numeric target, or a negative one, is an error. The element
/// is not animatable. Duration falls back to `default_duration_ms` when missing,
/// non-numeric or zero. A negative duration is kept and completes immediately.
pub fn parse_counter_spec(element: &PageElement, default_duration_ms: i64) -> Result<CounterSpec> {
    let attribute_error = |attribute: &str, reason: String| SiteError::AttributeError {
        element: element.id.to_string(),
        attribute: attribute.to_string(),
        reason,
    };

    let raw_target = element
        .attribute(ATTR_TARGET)
        .ok_or_else(|| attribute_error(ATTR_TARGET, "attribute is missing".to_string()))?;
    let target = parse_int_prefix(raw_target).ok_or_else(|| {
        let reason = if has_digit_prefix(raw_target) {
            format!("'{}' is out of range", raw_target.trim())
        } else {
            format!("'{}' is not a number", raw_target)
        };
        attribute_error(ATTR_TARGET, reason)
    })?;
    let target = u64::try_from(target)
        .map_err(|_| attribute_error(ATTR_TARGET, format!("{} is negative", target)))?;

    let duration_ms = element
        .attribute(ATTR_DURATION)
        .and_then(parse_int_prefix)
        .filter(|ms| *ms != 0)
        .unwrap_or(default_duration_ms);

    Ok(CounterSpec {
        target,
        duration_ms,
        prefix: element.attribute(ATTR_PREFIX).unwrap_or_default().to_string(),
        suffix: element.attribute(ATTR_SUFFIX).unwrap_or_default().to_string(),
    })
}
