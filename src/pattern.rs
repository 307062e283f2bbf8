//! Path template compilation
//!
//! Compiles a path template into a matcher and a reverse builder. Templates
//! are made of literal segments, `:name` placeholders, optional inline regex
//! constraints (`:id(\d+)`) and a trailing catch-all `(.*)` with no named
//! capture.
//!
//! Each compiled pattern is independent: matching is pure string/regex work
//! with no backtracking across patterns. Conflict resolution between multiple
//! patterns is the route table's job (declaration order), not the compiler's.

use crate::error::RouterError;
use crate::params::Params;
use crate::uri::clean_path;
use regex::Regex;

/// Maximum allowed size for a compiled pattern regex, in bytes.
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// A placeholder token extracted from a template.
///
/// The catch-all `(.*)` captures nothing by name and contributes no token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Placeholder name, without the leading `:`.
    pub name: String,
    /// Whether `url_for` must be given a value for this placeholder.
    pub required: bool,
}

/// One parsed segment of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Static text matched exactly (regex-escaped).
    Literal(String),
    /// Named placeholder, optionally constrained by an inline regex.
    Param {
        name: String,
        constraint: Option<String>,
    },
    /// Trailing `(.*)` catch-all.
    Wildcard,
}

/// A compiled path pattern: matcher, reverse builder and token list.
///
/// Invariant: for any pathname `p` the pattern accepts,
/// `build(test(p))` round-trips to an equivalent path.
#[derive(Debug, Clone)]
pub struct Pattern {
    template: String,
    segments: Vec<Segment>,
    regex: Regex,
    tokens: Vec<Token>,
}

impl Pattern {
    /// Compile a path template.
    ///
    /// Fails eagerly with [`RouterError::InvalidPattern`] on malformed
    /// placeholders (empty or non-alphanumeric names, duplicates, unbalanced
    /// constraint parentheses), a non-final catch-all, or a constraint that
    /// is not a valid regex.
    pub fn compile(template: &str) -> Result<Self, RouterError> {
        let segments = parse_segments(template)?;
        let tokens = collect_tokens(template, &segments)?;
        let regex = build_regex(template, &segments)?;

        Ok(Self {
            template: template.to_string(),
            segments,
            regex,
            tokens,
        })
    }

    /// The template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Placeholder tokens in template order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Match a pathname against this pattern.
    ///
    /// Returns the captured placeholder values, or `None` when a literal
    /// segment differs or a constrained capture fails its regex. Captures are
    /// raw strings; numeric-looking values are never coerced.
    pub fn test(&self, pathname: &str) -> Option<Params> {
        let captures = self.regex.captures(pathname)?;
        let mut params = Params::new();
        for token in &self.tokens {
            if let Some(m) = captures.name(&token.name) {
                params.insert(token.name.clone(), m.as_str());
            }
        }
        Some(params)
    }

    /// Substitute placeholders to rebuild a concrete path.
    ///
    /// Fails with [`RouterError::MissingParameters`] enumerating every
    /// placeholder absent from `params`, not just the first. The catch-all
    /// substitutes to nothing.
    pub fn build(&self, params: &Params) -> Result<String, RouterError> {
        let mut out = String::with_capacity(self.template.len());
        let mut missing: Vec<String> = Vec::new();

        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push('/');
            }
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Param { name, .. } => match params.get(name) {
                    Some(value) => out.push_str(value),
                    None => missing.push(name.clone()),
                },
                Segment::Wildcard => {}
            }
        }

        if !missing.is_empty() {
            return Err(RouterError::MissingParameters {
                name: self.template.clone(),
                missing,
            });
        }

        let mut path = clean_path(&out);
        if path.len() > 1 && path.ends_with('/') {
            path.pop();
        }
        Ok(path)
    }
}

fn parse_segments(template: &str) -> Result<Vec<Segment>, RouterError> {
    let invalid = |message: String| RouterError::InvalidPattern {
        path: template.to_string(),
        message,
    };

    let raw: Vec<&str> = template.split('/').collect();
    let mut segments = Vec::with_capacity(raw.len());

    for (i, part) in raw.iter().enumerate() {
        if *part == "(.*)" {
            if i != raw.len() - 1 {
                return Err(invalid("catch-all (.*) must be the final segment".into()));
            }
            segments.push(Segment::Wildcard);
        } else if let Some(rest) = part.strip_prefix(':') {
            let (name, constraint) = match rest.find('(') {
                Some(pos) => {
                    if !rest.ends_with(')') {
                        return Err(invalid(format!(
                            "unbalanced constraint parentheses in ':{}'",
                            rest
                        )));
                    }
                    (&rest[..pos], Some(rest[pos + 1..rest.len() - 1].to_string()))
                }
                None => (rest, None),
            };

            if name.is_empty() {
                return Err(invalid("placeholder name cannot be empty".into()));
            }
            if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                return Err(invalid(format!(
                    "placeholder '{}' must contain only alphanumeric characters and underscores",
                    name
                )));
            }

            segments.push(Segment::Param {
                name: name.to_string(),
                constraint,
            });
        } else {
            segments.push(Segment::Literal((*part).to_string()));
        }
    }

    Ok(segments)
}

fn collect_tokens(template: &str, segments: &[Segment]) -> Result<Vec<Token>, RouterError> {
    let mut tokens: Vec<Token> = Vec::new();
    for segment in segments {
        if let Segment::Param { name, .. } = segment {
            if tokens.iter().any(|t| t.name == *name) {
                return Err(RouterError::InvalidPattern {
                    path: template.to_string(),
                    message: format!("duplicate placeholder: '{}'", name),
                });
            }
            tokens.push(Token {
                name: name.clone(),
                required: true,
            });
        }
    }
    Ok(tokens)
}

fn build_regex(template: &str, segments: &[Segment]) -> Result<Regex, RouterError> {
    let mut pattern = String::from("^");

    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            pattern.push('/');
        }
        match segment {
            Segment::Literal(text) => pattern.push_str(&regex::escape(text)),
            Segment::Param { name, constraint } => match constraint {
                Some(constraint) => {
                    pattern.push_str(&format!("(?P<{}>(?:{}))", name, constraint));
                }
                None => pattern.push_str(&format!("(?P<{}>[^/]+)", name)),
            },
            Segment::Wildcard => pattern.push_str("(.*)"),
        }
    }

    // Trailing slash is tolerated but never required.
    pattern.push_str("/?$");

    regex::RegexBuilder::new(&pattern)
        .size_limit(MAX_REGEX_SIZE)
        .build()
        .map_err(|e| RouterError::InvalidPattern {
            path: template.to_string(),
            message: format!("failed to compile pattern regex: {}", e),
        })
}
