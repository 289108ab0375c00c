//! Parses template source into a node tree.
//!
//! Supported tags:
//! - `{{path}}`: escaped value lookup (`.` is the current context, `a.b` descends)
//! - `{{#path}}...{{/path}}`: section, repeated per array element or rendered once when truthy
//! - `{{^path}}...{{/path}}`: inverted section, rendered when the value is falsy
//! - `{{helper arg ...}}`: helper call; arguments are paths or `"string literals"`
//! - `{{! comment}}`: ignored

use crate::error::TemplateError;

/// A helper argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// A value looked up in the context stack.
    Path(String),
    /// A quoted string literal.
    Literal(String),
}

/// A parsed template node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text copied to the output.
    Text(String),
    /// Escaped value lookup.
    Var(String),
    /// Helper invocation.
    Helper {
        /// Helper name.
        name: String,
        /// Arguments in call order.
        args: Vec<Arg>,
    },
    /// Normal or inverted section.
    Section {
        /// Path of the value that drives the section.
        path: String,
        /// True for `{{^path}}`.
        inverted: bool,
        /// Nodes inside the section.
        children: Vec<Node>,
    },
}

struct OpenSection {
    path: String,
    inverted: bool,
    children: Vec<Node>,
}

/// Parses template source into a flat list of top-level nodes.
///
/// # Errors
///
/// Returns [`TemplateError`] for unclosed tags, unbalanced sections, and
/// unterminated string literals in helper arguments.
pub fn parse(source: &str) -> Result<Vec<Node>, TemplateError> {
    let mut root: Vec<Node> = Vec::new();
    let mut stack: Vec<OpenSection> = Vec::new();
    let mut remaining = source;
    let mut consumed = 0usize;

    while let Some(start) = remaining.find("{{") {
        if start > 0 {
            push(&mut root, &mut stack, Node::Text(remaining[..start].to_string()));
        }

        let offset = consumed + start;
        let after_open = &remaining[start + 2..];
        let end = after_open
            .find("}}")
            .ok_or(TemplateError::UnclosedTag { offset })?;
        let tag = after_open[..end].trim();

        let advance = start + 2 + end + 2;
        remaining = &remaining[advance..];
        consumed += advance;

        if let Some(path) = tag.strip_prefix('#') {
            stack.push(OpenSection {
                path: path.trim().to_string(),
                inverted: false,
                children: Vec::new(),
            });
        } else if let Some(path) = tag.strip_prefix('^') {
            stack.push(OpenSection {
                path: path.trim().to_string(),
                inverted: true,
                children: Vec::new(),
            });
        } else if let Some(path) = tag.strip_prefix('/') {
            let path = path.trim();
            let open = match stack.pop() {
                Some(open) if open.path == path => open,
                _ => {
                    return Err(TemplateError::UnexpectedClose {
                        name: path.to_string(),
                        offset,
                    })
                }
            };
            let section = Node::Section {
                path: open.path,
                inverted: open.inverted,
                children: open.children,
            };
            push(&mut root, &mut stack, section);
        } else if tag.starts_with('!') {
            continue;
        } else if tag.contains(char::is_whitespace) {
            let node = parse_helper(tag)?;
            push(&mut root, &mut stack, node);
        } else {
            push(&mut root, &mut stack, Node::Var(tag.to_string()));
        }
    }

    if !remaining.is_empty() {
        push(&mut root, &mut stack, Node::Text(remaining.to_string()));
    }

    if let Some(open) = stack.pop() {
        return Err(TemplateError::UnclosedSection { name: open.path });
    }

    Ok(root)
}

fn push(root: &mut Vec<Node>, stack: &mut [OpenSection], node: Node) {
    match stack.last_mut() {
        Some(open) => open.children.push(node),
        None => root.push(node),
    }
}

/// Splits `name arg1 "literal arg" arg3` into a helper node.
fn parse_helper(tag: &str) -> Result<Node, TemplateError> {
    let mut words = tag.splitn(2, char::is_whitespace);
    let name = words.next().unwrap_or_default().to_string();
    let mut rest = words.next().unwrap_or_default().trim_start();
    let mut args = Vec::new();

    while !rest.is_empty() {
        if let Some(quoted) = rest.strip_prefix('"') {
            let close = quoted.find('"').ok_or_else(|| TemplateError::HelperArgs {
                helper: name.clone(),
                message: "unterminated string literal".to_string(),
            })?;
            args.push(Arg::Literal(quoted[..close].to_string()));
            rest = quoted[close + 1..].trim_start();
        } else {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            args.push(Arg::Path(rest[..end].to_string()));
            rest = rest[end..].trim_start();
        }
    }

    Ok(Node::Helper { name, args })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_and_vars() {
        let nodes = parse("Hello {{ name }}!").unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Text("Hello ".to_string()),
                Node::Var("name".to_string()),
                Node::Text("!".to_string()),
            ]
        );
    }

    #[test]
    fn nested_sections() {
        let nodes = parse("{{#a}}{{#b}}x{{/b}}{{/a}}").unwrap();
        let Node::Section { path, children, .. } = &nodes[0] else {
            unreachable!("expected a section, got {:?}", nodes[0]);
        };
        assert_eq!(path, "a");
        assert!(matches!(&children[0], Node::Section { path, .. } if path == "b"));
    }

    #[test]
    fn helper_arguments() {
        let nodes = parse(r#"{{link helpUrl "Learn more"}}"#).unwrap();
        assert_eq!(
            nodes,
            vec![Node::Helper {
                name: "link".to_string(),
                args: vec![
                    Arg::Path("helpUrl".to_string()),
                    Arg::Literal("Learn more".to_string()),
                ],
            }]
        );
    }

    #[test]
    fn comments_are_dropped() {
        let nodes = parse("a{{! ignored }}b").unwrap();
        assert_eq!(
            nodes,
            vec![Node::Text("a".to_string()), Node::Text("b".to_string())]
        );
    }

    #[test]
    fn unbalanced_templates_are_rejected() {
        assert_eq!(
            parse("{{#a}}x"),
            Err(TemplateError::UnclosedSection {
                name: "a".to_string()
            })
        );
        assert_eq!(
            parse("x{{/a}}"),
            Err(TemplateError::UnexpectedClose {
                name: "a".to_string(),
                offset: 1
            })
        );
        assert_eq!(parse("ab{{oops"), Err(TemplateError::UnclosedTag { offset: 2 }));
    }
}
