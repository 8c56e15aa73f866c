//! Template engine for build metadata banners.
//!
//! # Syntax
//!
//! - `{Field}` - Substitutes the value of field `Field`
//! - `{{` - Renders as literal `{`
//! - `}}` - Renders as literal `}`
//!
//! Field names are resolved by the caller (see [`BuildInfo::render`]). An
//! unresolvable name is an error rather than an empty substitution, and no
//! partial output is ever returned.
//!
//! [`BuildInfo::render`]: crate::BuildInfo::render

use thiserror::Error;

/// Error type for template rendering failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A directive referenced a field that does not exist.
    #[error("unknown field '{name}' at position {position} in template")]
    UnknownField {
        /// The name of the unknown field.
        name: String,
        /// Byte offset of the directive's opening brace.
        position: usize,
    },

    /// A `{` was found without a matching `}`.
    #[error("unmatched '{{' at position {position} in template")]
    UnmatchedBrace {
        /// Byte offset of the unmatched `{`.
        position: usize,
    },

    /// An empty directive was found (e.g., `{}`).
    #[error("empty directive '{{}}' at position {position} in template")]
    EmptyDirective {
        /// Byte offset of the empty directive.
        position: usize,
    },
}

/// Render a template string, resolving each `{Field}` through `resolve`.
///
/// # Examples
///
/// ```
/// use buildversion::template::render_template;
///
/// let result = render_template("{Name} {Version}", |field| match field {
///     "Name" => Some("tool"),
///     "Version" => Some("1.0.0"),
///     _ => None,
/// })
/// .unwrap();
/// assert_eq!(result, "tool 1.0.0");
/// ```
pub fn render_template<'a, F>(template: &str, resolve: F) -> Result<String, TemplateError>
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut result = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' => {
                if let Some((_, '{')) = chars.peek() {
                    chars.next();
                    result.push('{');
                    continue;
                }

                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, c)) => name.push(c),
                        None => return Err(TemplateError::UnmatchedBrace { position: pos }),
                    }
                }

                let name = name.trim();
                if name.is_empty() {
                    return Err(TemplateError::EmptyDirective { position: pos });
                }

                match resolve(name) {
                    Some(value) => result.push_str(value),
                    None => {
                        return Err(TemplateError::UnknownField {
                            name: name.to_string(),
                            position: pos,
                        });
                    }
                }
            }
            '}' => {
                // `}}` collapses to one brace; a lone `}` is kept as-is.
                if let Some((_, '}')) = chars.peek() {
                    chars.next();
                }
                result.push('}');
            }
            _ => result.push(ch),
        }
    }

    Ok(result)
}
