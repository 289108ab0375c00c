//! Named helpers callable from templates.

use std::collections::HashMap;
use std::fmt;

use heck::ToTitleCase;
use serde_json::Value;

use crate::error::TemplateError;

/// Signature of a helper: resolved arguments in, rendered (already escaped) text out.
pub type HelperFn = Box<dyn Fn(&[Value]) -> Result<String, TemplateError>>;

/// Registry of helpers available to a render.
#[derive(Default)]
pub struct Helpers {
    helpers: HashMap<String, HelperFn>,
}

impl Helpers {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the `link` and `titleCase` helpers.
    pub fn standard() -> Self {
        let mut helpers = Self::new();
        helpers.register("link", Box::new(link));
        helpers.register("titleCase", Box::new(title_case));
        helpers
    }

    /// Registers (or replaces) a helper under `name`.
    pub fn register(&mut self, name: impl Into<String>, helper: HelperFn) {
        self.helpers.insert(name.into(), helper);
    }

    /// Returns true if a helper is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    /// Invokes the helper registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::UnknownHelper`] if nothing is registered under
    /// `name`, or whatever the helper itself returns.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<String, TemplateError> {
        let helper = self
            .helpers
            .get(name)
            .ok_or_else(|| TemplateError::UnknownHelper {
                name: name.to_string(),
            })?;
        helper(args)
    }
}

impl fmt::Debug for Helpers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.helpers.keys().collect();
        names.sort();
        f.debug_struct("Helpers").field("names", &names).finish()
    }
}

/// `{{link url text}}`: an anchor to `url` labelled `text` (defaults to the URL).
///
/// An empty URL renders the label alone.
///
/// # Errors
///
/// Returns [`TemplateError::HelperArgs`] when called without arguments.
pub fn link(args: &[Value]) -> Result<String, TemplateError> {
    let url = args.first().map(plain).ok_or_else(|| TemplateError::HelperArgs {
        helper: "link".to_string(),
        message: "expected a URL argument".to_string(),
    })?;
    let text = args
        .get(1)
        .map(plain)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| url.clone());

    if url.is_empty() {
        return Ok(escape_html(&text));
    }

    Ok(format!(
        r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
        escape_html(&url),
        escape_html(&text)
    ))
}

/// `{{titleCase label}}`: `serious` → `Serious`, `best-practice` → `Best Practice`.
///
/// # Errors
///
/// Returns [`TemplateError::HelperArgs`] when called without arguments.
pub fn title_case(args: &[Value]) -> Result<String, TemplateError> {
    let label = args.first().map(plain).ok_or_else(|| TemplateError::HelperArgs {
        helper: "titleCase".to_string(),
        message: "expected a label argument".to_string(),
    })?;
    Ok(escape_html(&label.to_title_case()))
}

/// Renders a JSON scalar as plain text; containers and null render empty.
pub fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Escapes HTML special characters in a string.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
