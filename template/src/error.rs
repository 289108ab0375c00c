//! Template parse and render errors.

use thiserror::Error;

/// Errors raised while parsing or rendering a template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// A `{{` opener without a matching `}}`.
    #[error("unclosed tag starting at byte {offset}")]
    UnclosedTag {
        /// Byte offset of the opening `{{`.
        offset: usize,
    },

    /// A `{{#name}}` or `{{^name}}` section that is never closed.
    #[error("section `{name}` is never closed")]
    UnclosedSection {
        /// Section name as written in the template.
        name: String,
    },

    /// A `{{/name}}` that does not close the innermost open section.
    #[error("unexpected closing tag `{name}` at byte {offset}")]
    UnexpectedClose {
        /// Name in the closing tag.
        name: String,
        /// Byte offset of the closing tag.
        offset: usize,
    },

    /// A tag with arguments whose first word is not a registered helper.
    #[error("unknown helper `{name}`")]
    UnknownHelper {
        /// Helper name as written in the template.
        name: String,
    },

    /// A helper was invoked with arguments it cannot use.
    #[error("helper `{helper}`: {message}")]
    HelperArgs {
        /// Helper name.
        helper: String,
        /// What was wrong with the arguments.
        message: String,
    },
}
