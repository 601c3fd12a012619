//! Template engine
//!
//! Renders page documents with Tera. Built-in templates are embedded in the
//! binary; `.html` files in the configured theme directory replace them by
//! name, so a site can restyle single pages without shipping the rest.

use anyhow::{Context, Result};
use rust_embed::RustEmbed;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fs;
use std::path::Path;
use tera::{Context as TeraContext, Tera};

mod error;

pub use error::ThemeError;

/// Templates compiled into the binary
#[derive(RustEmbed)]
#[folder = "templates/"]
#[include = "*.html"]
struct BuiltinTemplates;

/// Template engine for rendering pages
pub struct ThemeEngine {
    tera: Tera,
}

impl ThemeEngine {
    /// Engine with only the built-in templates
    pub fn builtin() -> Result<Self> {
        Self::from_templates(builtin_templates()?)
    }

    /// Built-in templates overlaid with any `.html` files under `theme_path`.
    ///
    /// A missing directory is not an error.
    pub fn new(theme_path: &Path) -> Result<Self> {
        let mut templates = builtin_templates()?;

        if theme_path.is_dir() {
            let mut overrides = Vec::new();
            collect_templates_from_dir(theme_path, theme_path, &mut overrides)?;
            for (name, content) in overrides {
                tracing::info!("Using template override: {}", name);
                templates.insert(name, content);
            }
        } else {
            tracing::debug!("No theme directory at {:?}, using built-in templates", theme_path);
        }

        Self::from_templates(templates)
    }

    fn from_templates(templates: BTreeMap<String, String>) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(templates)
            .map_err(|e| ThemeError::TemplateError(error_chain(&e)))?;
        Ok(Self { tera })
    }

    /// Render a template with context
    pub fn render(&self, template: &str, context: &TeraContext) -> Result<String> {
        self.tera.render(template, context).map_err(|e| {
            ThemeError::TemplateError(format!(
                "Failed to render '{}': {}",
                template,
                error_chain(&e)
            ))
            .into()
        })
    }

    /// Render a template with a serializable document as its top-level context
    pub fn render_document<T: Serialize>(&self, template: &str, document: &T) -> Result<String> {
        let context = TeraContext::from_serialize(document)
            .map_err(|e| ThemeError::TemplateError(error_chain(&e)))?;
        self.render(template, &context)
    }
}

fn builtin_templates() -> Result<BTreeMap<String, String>> {
    let mut templates = BTreeMap::new();
    for name in BuiltinTemplates::iter() {
        let file = BuiltinTemplates::get(&name)
            .ok_or_else(|| ThemeError::NotFound(name.to_string()))?;
        let content = String::from_utf8(file.data.into_owned())
            .with_context(|| format!("Built-in template is not UTF-8: {}", name))?;
        templates.insert(name.to_string(), content);
    }
    Ok(templates)
}

/// Collect `.html` files under `current_path`, named relative to `base_path`
fn collect_templates_from_dir(
    base_path: &Path,
    current_path: &Path,
    templates: &mut Vec<(String, String)>,
) -> Result<()> {
    for entry in fs::read_dir(current_path)? {
        let path = entry?.path();

        if path.is_dir() {
            collect_templates_from_dir(base_path, &path, templates)?;
        } else if path.extension().map_or(false, |ext| ext == "html") {
            let relative_path = path
                .strip_prefix(base_path)
                .map_err(|_| ThemeError::TemplateError("Failed to get relative path".to_string()))?;
            let template_name = relative_path.to_string_lossy().replace('\\', "/");

            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read template: {:?}", path))?;
            templates.push((template_name, content));
        }
    }

    Ok(())
}

/// Flatten a Tera error and its causes into one message
fn error_chain(e: &tera::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(s) = source {
        message.push_str(&format!("\n  Caused by: {}", s));
        source = s.source();
    }
    message
}
