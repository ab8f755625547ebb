use std::path::Path;

/// Path substrings that are never deleted, whatever the caller asks for.
/// Matched case-insensitively against the whole path.
pub const CRITICAL_SUBSTRINGS: &[&str] = &[
    "system32",
    "drivers",
    "winsxs",
    "catroot",
    "logs",
    "system",
];

/// Decides whether a path must be left alone.
pub trait ExclusionPredicate {
    fn is_excluded(&self, path: &Path) -> bool;
}

impl<F> ExclusionPredicate for F
where
    F: Fn(&Path) -> bool,
{
    fn is_excluded(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Case-insensitive substring exclusions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    substrings: Vec<String>,
}

impl ExclusionSet {
    /// The fixed critical list only.
    pub fn critical() -> Self {
        Self::default().with_substrings(CRITICAL_SUBSTRINGS.iter().copied())
    }

    /// Add caller-supplied substrings. Blank entries are ignored.
    pub fn with_substrings<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for s in extra {
            let s = s.as_ref().trim().to_lowercase();
            if !s.is_empty() && !self.substrings.contains(&s) {
                self.substrings.push(s);
            }
        }
        self
    }

    pub fn substrings(&self) -> &[String] {
        &self.substrings
    }
}

impl ExclusionPredicate for ExclusionSet {
    fn is_excluded(&self, path: &Path) -> bool {
        let lowered = path.to_string_lossy().to_lowercase();
        self.substrings.iter().any(|s| lowered.contains(s.as_str()))
    }
}
