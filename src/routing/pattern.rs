//! Path template compilation.
//!
//! # Responsibilities
//! - Extract placeholder names (`{id}`, `{path...}`) in left-to-right order
//! - Rewrite a template into the positional syntax the matcher understands
//! - Substitute concrete values back into a template (reverse generation)
//!
//! # Design Decisions
//! - Compilation is a pure function of the template string
//! - Placeholders become `:<index>` / `*<index>`, so templates that differ only
//!   in parameter names compile to the same matcher pattern
//! - Placeholder names are not re-validated; malformed input is a caller bug

use std::fmt;
use std::ops::Add;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([A-Za-z_][0-9A-Za-z_]*)(\.\.\.)?\}").expect("placeholder regex is valid")
});

/// Characters with meaning in the matcher's own syntax.
const RESERVED: [char; 2] = [':', '*'];

/// A single placeholder occurrence inside a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// The literal token as written, e.g. `{id}` or `{path...}`.
    pub token: String,
    /// Parameter name without braces.
    pub name: String,
    /// True for `{name...}` captures that span the rest of the path.
    pub remainder: bool,
}

/// A scope-relative or full path template such as `/articles/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pattern(String);

impl Pattern {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Placeholders in occurrence order.
    pub fn placeholders(&self) -> Vec<Placeholder> {
        PLACEHOLDER
            .captures_iter(&self.0)
            .map(|caps| Placeholder {
                token: caps[0].to_string(),
                name: caps[1].to_string(),
                remainder: caps.get(2).is_some(),
            })
            .collect()
    }

    /// Parameter names, index-aligned with placeholder occurrence order.
    pub fn param_names(&self) -> Vec<String> {
        PLACEHOLDER
            .captures_iter(&self.0)
            .map(|caps| caps[1].to_string())
            .collect()
    }

    /// Position of `name` among this template's parameters.
    pub fn param_index(&self, name: &str) -> Option<usize> {
        PLACEHOLDER
            .captures_iter(&self.0)
            .position(|caps| &caps[1] == name)
    }

    /// Rewrite into the matcher-facing form.
    ///
    /// Stray `:` and `*` outside placeholders are dropped first, then each
    /// placeholder is replaced by its positional marker.
    pub fn matcher_pattern(&self) -> String {
        let stripped: String = self.0.chars().filter(|c| !RESERVED.contains(c)).collect();

        let mut index = 0;
        PLACEHOLDER
            .replace_all(&stripped, |caps: &Captures<'_>| {
                let kind = if caps.get(2).is_some() { '*' } else { ':' };
                let marker = format!("{kind}{index}");
                index += 1;
                marker
            })
            .into_owned()
    }

    /// Replace each placeholder, in order, with the corresponding value.
    ///
    /// Callers guarantee `values.len() >= self.placeholders().len()`.
    pub(crate) fn substitute(&self, values: &[String]) -> String {
        let mut index = 0;
        PLACEHOLDER
            .replace_all(&self.0, |caps: &Captures<'_>| {
                let value = values.get(index).map_or(&caps[0], String::as_str).to_string();
                index += 1;
                value
            })
            .into_owned()
    }
}

impl Add<&str> for &Pattern {
    type Output = Pattern;

    fn add(self, rhs: &str) -> Pattern {
        Pattern(format!("{}{}", self.0, rhs))
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_names() {
        let p = Pattern::new("/users/{userId}/articles/{articleId}/{rest...}");
        assert_eq!(p.param_names(), vec!["userId", "articleId", "rest"]);
        assert_eq!(p.param_index("articleId"), Some(1));
        assert_eq!(p.param_index("missing"), None);

        assert!(Pattern::new("/static/path").param_names().is_empty());
    }

    #[test]
    fn test_matcher_pattern() {
        let p = Pattern::new("/users/{userId}/files/{path...}");
        assert_eq!(p.matcher_pattern(), "/users/:0/files/*1");

        // Different names, same shape
        assert_eq!(Pattern::new("/{id}").matcher_pattern(), "/:0");
        assert_eq!(Pattern::new("/{name}").matcher_pattern(), "/:0");
    }

    #[test]
    fn test_matcher_pattern_strips_reserved() {
        let p = Pattern::new("/a:b/*c/{id}");
        assert_eq!(p.matcher_pattern(), "/ab/c/:0");
    }

    #[test]
    fn test_marker_count_matches_names() {
        for template in ["/", "/{a}", "/{a}/x/{b}", "/{a}/{b}/{c...}", "/x{y}z"] {
            let p = Pattern::new(template);
            let compiled = p.matcher_pattern();
            let markers = compiled.matches(|c| c == ':' || c == '*').count();
            assert_eq!(markers, p.param_names().len(), "template {template}");
        }
    }

    #[test]
    fn test_placeholders() {
        let p = Pattern::new("/{id}/{path...}");
        let ph = p.placeholders();
        assert_eq!(ph.len(), 2);
        assert_eq!(ph[0].token, "{id}");
        assert!(!ph[0].remainder);
        assert_eq!(ph[1].name, "path");
        assert!(ph[1].remainder);
    }

    #[test]
    fn test_substitute() {
        let p = Pattern::new("/users/{userId}/articles/{articleId}");
        let url = p.substitute(&["111".to_string(), "222".to_string()]);
        assert_eq!(url, "/users/111/articles/222");
    }

    #[test]
    fn test_concat() {
        let prefix = Pattern::new("/articles/{id}");
        let full = &prefix + "/edit";
        assert_eq!(full.as_str(), "/articles/{id}/edit");
    }
}
