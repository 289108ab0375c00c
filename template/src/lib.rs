//! Logic-less HTML template engine for accessibility reports.
//!
//! A small mustache-style engine: values, sections, inverted sections, and
//! named helpers. The report pipeline hands it a JSON payload and the
//! [`Helpers::standard`] registry, which provides `link` and `titleCase`.
//!
//! # Example
//!
//! ```
//! use a11y_template::{Helpers, Template};
//! use serde_json::json;
//!
//! let template = Template::parse("{{#rules}}<li>{{titleCase impact}}: {{help}}</li>{{/rules}}")?;
//! let html = template.render(
//!     &json!({"rules": [{"impact": "serious", "help": "Images must have alt text"}]}),
//!     &Helpers::standard(),
//! )?;
//! assert_eq!(html, "<li>Serious: Images must have alt text</li>");
//! # Ok::<(), a11y_template::TemplateError>(())
//! ```

pub mod error;
pub mod helpers;
pub mod parser;
pub mod render;

pub use error::TemplateError;
pub use helpers::{escape_html, HelperFn, Helpers};
pub use render::Template;
