//! Heading anchor slugs
//!
//! GitHub-style anchors: lowercase, punctuation stripped, spaces become
//! hyphens, collisions get a numeric suffix. Names are sorted before
//! assignment so suffix numbering is deterministic regardless of input
//! order. One [`Slugger`] serves exactly one schema's property set;
//! collision state never leaks across documents.

use regex::Regex;
use std::collections::{BTreeMap, HashSet};

/// Stateful slug assigner for one document
pub struct Slugger {
    strip: Regex,
    taken: HashSet<String>,
}

impl Default for Slugger {
    fn default() -> Self {
        Self::new()
    }
}

impl Slugger {
    pub fn new() -> Self {
        Self {
            strip: Regex::new(r"[^\w\s-]").expect("slug strip pattern"),
            taken: HashSet::new(),
        }
    }

    /// Assign the next free slug for `name`.
    pub fn slug(&mut self, name: &str) -> String {
        let base = self.normalize(name);
        let mut candidate = base.clone();
        let mut suffix = 0usize;
        while !self.taken.insert(candidate.clone()) {
            suffix += 1;
            candidate = format!("{base}-{suffix}");
        }
        candidate
    }

    fn normalize(&self, name: &str) -> String {
        let lowered = name.to_lowercase();
        let stripped = self.strip.replace_all(&lowered, "");
        stripped.trim().replace(' ', "-")
    }
}

/// Slug every name in one pass, sorted first so collision suffixes are
/// stable for any input order.
pub fn slugify_all<I, S>(names: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut names: Vec<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
    names.sort();
    names.dedup();

    let mut slugger = Slugger::new();
    names
        .into_iter()
        .map(|name| {
            let slug = slugger.slug(&name);
            (name, slug)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_normalization() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slug("Foo Bar"), "foo-bar");
        assert_eq!(slugger.slug("with.dots&such!"), "withdotssuch");
        assert_eq!(slugger.slug("snake_case"), "snake_case");
    }

    #[test]
    fn case_collision_gets_suffix() {
        let slugs = slugify_all(["Type", "type"]);
        assert_eq!(slugs["Type"], "type");
        assert_eq!(slugs["type"], "type-1");
    }

    #[test]
    fn normalization_collision_gets_suffix() {
        let slugs = slugify_all(["Foo Bar", "foo-bar"]);
        assert_eq!(slugs["Foo Bar"], "foo-bar");
        assert_eq!(slugs["foo-bar"], "foo-bar-1");
    }

    #[test]
    fn assignment_is_order_independent() {
        let forward = slugify_all(["b", "a", "A"]);
        let reverse = slugify_all(["A", "a", "b"]);
        assert_eq!(forward, reverse);
        assert_eq!(forward["A"], "a");
        assert_eq!(forward["a"], "a-1");
    }

    #[test]
    fn slugs_are_unique() {
        let names = ["Type", "type", "TYPE", "ty pe", "ty-pe"];
        let slugs = slugify_all(names);
        let unique: HashSet<&String> = slugs.values().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn fresh_slugger_restarts_numbering() {
        let mut first = Slugger::new();
        first.slug("name");
        first.slug("name");
        // A second document's slugger must not see the first one's state
        let mut second = Slugger::new();
        assert_eq!(second.slug("name"), "name");
    }
}
