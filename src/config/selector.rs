use smol_str::SmolStr;

/// A config rule selector.
///
/// A selector is a comma-separated list of patterns. Each pattern is a full
/// element name, a `prefix.*` wildcard matching everything below `prefix`, or
/// `*` matching everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    patterns: Vec<SmolStr>,
}

impl Selector {
    pub fn parse(selector: &str) -> Self {
        let patterns = selector
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(SmolStr::new)
            .collect();
        Self { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, full_name: &str) -> bool {
        self.patterns.iter().any(|pattern| {
            if pattern == "*" {
                return true;
            }
            match pattern.strip_suffix(".*") {
                Some(prefix) => full_name
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('.')),
                None => pattern == full_name,
            }
        })
    }
}
