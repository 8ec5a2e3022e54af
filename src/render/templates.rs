//! Section templates
//!
//! Named handlebars templates, one per document section. Built-in defaults
//! are embedded in the binary; a template root directory may override any
//! of them with a `<name>.hbs` file. Escaping is disabled — the output is
//! Markdown, not HTML.

use handlebars::Handlebars;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::{DocgenError, Result};

/// The named section templates a document is assembled from
pub const SECTION_TEMPLATES: &[(&str, &str)] = &[
    ("frontmatter", include_str!("templates/frontmatter.hbs")),
    ("header", include_str!("templates/header.hbs")),
    ("examples", include_str!("templates/examples.hbs")),
    ("properties", include_str!("templates/properties.hbs")),
    ("property", include_str!("templates/property.hbs")),
    ("pattern-property", include_str!("templates/pattern-property.hbs")),
];

/// Registry of section templates
pub struct TemplateEngine {
    registry: Handlebars<'static>,
}

impl TemplateEngine {
    /// Register the built-in templates, then any overrides found under
    /// `template_dir`.
    pub fn new(template_dir: Option<&Path>) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);

        for (name, source) in SECTION_TEMPLATES {
            registry.register_template_string(name, source)?;
        }

        if let Some(dir) = template_dir {
            for (name, _) in SECTION_TEMPLATES {
                let path = dir.join(format!("{name}.hbs"));
                if path.is_file() {
                    let source = fs::read_to_string(&path).map_err(|source| DocgenError::Read {
                        path: path.clone(),
                        source,
                    })?;
                    registry.register_template_string(name, source)?;
                }
            }
        }

        Ok(Self { registry })
    }

    /// Render the named section with `data`.
    pub fn render<T: Serialize>(&self, section: &str, data: &T) -> Result<String> {
        Ok(self.registry.render(section, data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builtin_sections_render() {
        let engine = TemplateEngine::new(None).unwrap();
        let out = engine
            .render("frontmatter", &json!({"meta": {"layout": "reference"}}))
            .unwrap();
        assert!(out.contains("layout: reference"));
        assert!(out.contains("---"));
    }

    #[test]
    fn empty_frontmatter_renders_nothing() {
        let engine = TemplateEngine::new(None).unwrap();
        let out = engine.render("frontmatter", &json!({"meta": {}})).unwrap();
        assert!(out.trim().is_empty());
    }

    #[test]
    fn directory_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("examples.hbs"), "CUSTOM {{title}}").unwrap();

        let engine = TemplateEngine::new(Some(dir.path())).unwrap();
        let out = engine
            .render("examples", &json!({"title": "Thing", "examples": ["{}"]}))
            .unwrap();
        assert_eq!(out, "CUSTOM Thing");
    }

    #[test]
    fn markdown_is_not_escaped() {
        let engine = TemplateEngine::new(None).unwrap();
        let out = engine
            .render(
                "properties",
                &json!({
                    "title": "T",
                    "props": [{"name": "a", "slug": "a", "type": "`string`", "required": true}],
                    "pprops": [],
                    "additional": true
                }),
            )
            .unwrap();
        assert!(out.contains("`string`"));
        assert!(out.contains("**Required**"));
    }
}
