/// Inserts `separator` every three digits from the right: `12345` -> `12.345`.
pub fn group_thousands(value: u64, separator: &str) -> String {
    let digits = value.to_string();
    let len = digits.len();
    let mut grouped = String::with_capacity(len + (len / 3) * separator.len());

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(ch);
    }

    grouped
}

/// Text written into a counter element on every tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterFormat {
    pub prefix: String,
    pub suffix: String,
    pub separator: String,
}

impl CounterFormat {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
            separator: separator.into(),
        }
    }

    pub fn render(&self, value: u64) -> String {
        format!(
            "{}{}{}",
            self.prefix,
            group_thousands(value, &self.separator),
            self.suffix
        )
    }
}

impl Default for CounterFormat {
    fn default() -> Self {
        Self::new("", "", ".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0, "."), "0");
        assert_eq!(group_thousands(999, "."), "999");
        assert_eq!(group_thousands(1000, "."), "1.000");
        assert_eq!(group_thousands(12345, "."), "12.345");
        assert_eq!(group_thousands(1234567, "."), "1.234.567");
        assert_eq!(group_thousands(100000, ","), "100,000");
    }

    #[test]
    fn test_render_with_prefix_and_suffix() {
        let format = CounterFormat::new("R$ ", "+", ".");
        assert_eq!(format.render(2500000), "R$ 2.500.000+");
        assert_eq!(CounterFormat::default().render(42), "42");
    }
}
