//! Renders a parsed template against a JSON payload.
//!
//! Dotted paths descend into objects by key and into arrays by index, so
//! `{{#rows.0}}` guards markup that should appear once for a non-empty list.

use serde_json::Value;

use crate::error::TemplateError;
use crate::helpers::{escape_html, plain, Helpers};
use crate::parser::{parse, Arg, Node};

/// A parsed, reusable template.
#[derive(Debug, Clone)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Parses template source.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if the source is malformed.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        Ok(Self {
            nodes: parse(source)?,
        })
    }

    /// Renders the template with `data` as the root context.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if a helper is unknown or rejects its arguments.
    pub fn render(&self, data: &Value, helpers: &Helpers) -> Result<String, TemplateError> {
        let mut out = String::new();
        let mut stack = vec![data];
        render_nodes(&self.nodes, &mut stack, helpers, &mut out)?;
        Ok(out)
    }
}

fn render_nodes<'a>(
    nodes: &[Node],
    stack: &mut Vec<&'a Value>,
    helpers: &Helpers,
    out: &mut String,
) -> Result<(), TemplateError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(path) => {
                if let Some(value) = lookup(stack, path) {
                    out.push_str(&escape_html(&plain(value)));
                }
            }
            Node::Helper { name, args } => {
                if !helpers.contains(name) {
                    return Err(TemplateError::UnknownHelper { name: name.clone() });
                }
                let values: Vec<Value> = args
                    .iter()
                    .map(|arg| match arg {
                        Arg::Literal(s) => Value::String(s.clone()),
                        Arg::Path(p) => lookup(stack, p).cloned().unwrap_or(Value::Null),
                    })
                    .collect();
                out.push_str(&helpers.call(name, &values)?);
            }
            Node::Section {
                path,
                inverted,
                children,
            } => {
                let value = lookup(stack, path);
                if *inverted {
                    if !value.map(is_truthy).unwrap_or(false) {
                        render_nodes(children, stack, helpers, out)?;
                    }
                    continue;
                }
                let Some(value) = value else { continue };
                match value {
                    Value::Array(items) => {
                        for item in items {
                            stack.push(item);
                            render_nodes(children, stack, helpers, out)?;
                            stack.pop();
                        }
                    }
                    other if is_truthy(other) => {
                        stack.push(other);
                        render_nodes(children, stack, helpers, out)?;
                        stack.pop();
                    }
                    _ => {}
                }
            }
        }
    }
    Ok(())
}

/// Resolves `path` against the context stack, innermost context first.
fn lookup<'a>(stack: &[&'a Value], path: &str) -> Option<&'a Value> {
    if path == "." {
        return stack.last().copied();
    }

    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut value = stack
        .iter()
        .rev()
        .copied()
        .find_map(|ctx| ctx.as_object().and_then(|obj| obj.get(first)))?;

    for segment in segments {
        value = match value {
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            other => other.as_object()?.get(segment)?,
        };
    }
    Some(value)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Array(items) => !items.is_empty(),
        Value::String(s) => !s.is_empty(),
        Value::Number(_) | Value::Object(_) => true,
    }
}
