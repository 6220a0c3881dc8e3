//! Value templates used by URL, header, query, extra and auth transformers.
//!
//! A [`Template`] is either a format string with `{name}` placeholders or a
//! function over named arguments.
//!
//! Format strings support attribute and index access on the argument value
//! (`{user.id}`, `{items[0]}`, `{map[key]}`) and `{{` / `}}` escapes. A
//! conversion or format-spec suffix (`{x!r}`, `{x:>4}`) is accepted and
//! ignored. Unbalanced braces are kept as literal text.
//!
//! # Example
//!
//! ```
//! use courier_core::{CallArgs, Template};
//! use serde_json::json;
//!
//! let args = CallArgs::detached([("user", json!({"id": 7}))]);
//! let template = Template::from("/users/{user.id}");
//! assert_eq!(template.names(), vec!["user"]);
//! assert_eq!(template.render(&args).expect("render"), json!("/users/7"));
//!
//! let plus_one = Template::map("i", |i: i64| i + 1);
//! let args = CallArgs::detached([("i", json!(1))]);
//! assert_eq!(plus_one.render(&args).expect("render"), json!(2));
//! ```

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::codec::render_value;
use crate::{CallArgs, Error, Result, TypeHint, from_value};

type TemplateFn = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

/// A format string or a function producing a value from call arguments.
#[derive(Clone)]
pub enum Template {
    /// Format string with `{name}` placeholders.
    Format(FormatTemplate),
    /// Function over declared argument names.
    Func(FuncTemplate),
}

impl Template {
    /// Template rendering `text` verbatim, braces included.
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::Format(FormatTemplate {
            source: text.replace('{', "{{").replace('}', "}}"),
            segments: vec![Segment::Literal(text)],
        })
    }

    /// Function template with explicit argument names and return type.
    pub fn from_fn<I, S, F>(args: I, returns: TypeHint, f: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self::Func(FuncTemplate {
            args: args.into_iter().map(Into::into).collect(),
            returns,
            f: Arc::new(f),
        })
    }

    /// Function template over one typed argument.
    pub fn map<A, R, F>(arg: impl Into<String>, f: F) -> Self
    where
        A: DeserializeOwned,
        R: Serialize + 'static,
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self::from_fn([arg.into()], TypeHint::of::<R>(), move |values| {
            let [a] = values else {
                return Err(Error::invalid_arguments("expected one template argument"));
            };
            Ok(serde_json::to_value(f(from_value(a.clone())?))?)
        })
    }

    /// Function template over two typed arguments.
    pub fn map2<A, B, R, F>(args: (&str, &str), f: F) -> Self
    where
        A: DeserializeOwned,
        B: DeserializeOwned,
        R: Serialize + 'static,
        F: Fn(A, B) -> R + Send + Sync + 'static,
    {
        Self::from_fn([args.0, args.1], TypeHint::of::<R>(), move |values| {
            let [a, b] = values else {
                return Err(Error::invalid_arguments("expected two template arguments"));
            };
            Ok(serde_json::to_value(f(
                from_value(a.clone())?,
                from_value(b.clone())?,
            ))?)
        })
    }

    /// Argument names the template reads, in first-use order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Format(format) => format.names(),
            Self::Func(func) => func.args.iter().map(String::as_str).collect(),
        }
    }

    /// Type of the rendered value.
    #[must_use]
    pub fn return_hint(&self) -> TypeHint {
        match self {
            Self::Format(_) => TypeHint::string(),
            Self::Func(func) => func.returns,
        }
    }

    /// Render against the call arguments.
    pub fn render(&self, args: &CallArgs<'_>) -> Result<Value> {
        match self {
            Self::Format(format) => format.render(args).map(Value::String),
            Self::Func(func) => func.call(args),
        }
    }

    /// Render to text; non-string results use [`render_value`].
    pub fn render_text(&self, args: &CallArgs<'_>) -> Result<String> {
        match self.render(args)? {
            Value::String(s) => Ok(s),
            other => Ok(render_value(&other)),
        }
    }
}

impl From<&str> for Template {
    fn from(source: &str) -> Self {
        Self::Format(FormatTemplate::parse(source))
    }
}

impl From<String> for Template {
    fn from(source: String) -> Self {
        Self::Format(FormatTemplate::parse(&source))
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(format) => f.write_str(&format.source),
            Self::Func(func) => write!(f, "fn({})", func.args.join(", ")),
        }
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(format) => f.debug_tuple("Format").field(&format.source).finish(),
            Self::Func(func) => f
                .debug_struct("Func")
                .field("args", &func.args)
                .field("returns", &func.returns)
                .finish_non_exhaustive(),
        }
    }
}

// ============================================================================
// Function templates
// ============================================================================

/// Function over named call arguments.
#[derive(Clone)]
pub struct FuncTemplate {
    args: Vec<String>,
    returns: TypeHint,
    f: Arc<TemplateFn>,
}

impl FuncTemplate {
    fn call(&self, args: &CallArgs<'_>) -> Result<Value> {
        let values = self
            .args
            .iter()
            .map(|name| {
                args.get(name).cloned().ok_or_else(|| {
                    Error::template(
                        format!("fn({})", self.args.join(", ")),
                        format!("missing argument `{name}`"),
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;
        (self.f)(&values)
    }
}

// ============================================================================
// Format templates
// ============================================================================

/// Parsed format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTemplate {
    source: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field { base: String, path: Vec<Accessor> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Accessor {
    Attr(String),
    Index(String),
}

impl FormatTemplate {
    /// Parse a format string.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while !rest.is_empty() {
            if let Some(tail) = rest.strip_prefix("{{") {
                literal.push('{');
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("}}") {
                literal.push('}');
                rest = tail;
            } else if let Some((field, tail)) = rest
                .strip_prefix('{')
                .and_then(|inner| inner.split_once('}'))
            {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(parse_field(field));
                rest = tail;
            } else {
                let mut chars = rest.chars();
                if let Some(c) = chars.next() {
                    literal.push(c);
                }
                rest = chars.as_str();
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self {
            source: source.to_string(),
            segments,
        }
    }

    /// Template source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Field { base, .. } = segment
                && !base.is_empty()
                && !names.contains(&base.as_str())
            {
                names.push(base);
            }
        }
        names
    }

    fn render(&self, args: &CallArgs<'_>) -> Result<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { base, path } => {
                    let mut value = args.get(base).ok_or_else(|| {
                        Error::template(&self.source, format!("missing argument `{base}`"))
                    })?;
                    for accessor in path {
                        value = access(value, accessor).ok_or_else(|| {
                            Error::template(
                                &self.source,
                                format!("cannot resolve {accessor:?} on `{base}`"),
                            )
                        })?;
                    }
                    out.push_str(&render_value(value));
                }
            }
        }
        Ok(out)
    }
}

fn parse_field(field: &str) -> Segment {
    let name = field
        .find(['!', ':'])
        .map_or(field, |end| field.get(..end).unwrap_or(field));
    let split = name.find(['.', '[']).unwrap_or(name.len());
    let (base, mut rest) = name.split_at(split);

    let mut path = Vec::new();
    while !rest.is_empty() {
        if let Some(attr) = rest.strip_prefix('.') {
            let end = attr.find(['.', '[']).unwrap_or(attr.len());
            let (key, tail) = attr.split_at(end);
            path.push(Accessor::Attr(key.to_string()));
            rest = tail;
        } else if let Some(index) = rest.strip_prefix('[') {
            let end = index.find(']').unwrap_or(index.len());
            let (key, tail) = index.split_at(end);
            path.push(Accessor::Index(key.to_string()));
            rest = tail.strip_prefix(']').unwrap_or(tail);
        } else {
            break;
        }
    }

    Segment::Field {
        base: base.to_string(),
        path,
    }
}

fn access<'a>(value: &'a Value, accessor: &Accessor) -> Option<&'a Value> {
    match (accessor, value) {
        (Accessor::Index(key), Value::Array(items)) => items.get(key.parse::<usize>().ok()?),
        (Accessor::Attr(key) | Accessor::Index(key), Value::Object(map)) => map.get(key),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn args() -> CallArgs<'static> {
        CallArgs::detached([
            ("i", json!(1)),
            ("s", json!("abc")),
            ("user", json!({"id": 42, "tags": ["a", "b"]})),
        ])
    }

    #[test]
    fn format_placeholders() {
        let template = Template::from("{s}{i}");
        assert_eq!(template.names(), vec!["s", "i"]);
        assert_eq!(template.render(&args()).expect("render"), json!("abc1"));
        assert_eq!(template.return_hint(), TypeHint::string());
    }

    #[test]
    fn format_accessors_claim_base_name() {
        let template = Template::from("/u/{user.id}/{user.tags[1]}");
        assert_eq!(template.names(), vec!["user"]);
        assert_eq!(template.render(&args()).expect("render"), json!("/u/42/b"));
    }

    #[test]
    fn escaped_braces_are_literal() {
        let template = Template::from("{{x}}-{i}");
        assert_eq!(template.names(), vec!["i"]);
        assert_eq!(template.render(&args()).expect("render"), json!("{x}-1"));
    }

    #[test]
    fn format_spec_is_ignored() {
        let template = Template::from("{i:>4}{s!r}");
        assert_eq!(template.names(), vec!["i", "s"]);
        assert_eq!(template.render(&args()).expect("render"), json!("1abc"));
    }

    #[test]
    fn literal_template_keeps_braces() {
        let template = Template::literal("a{}");
        assert!(template.names().is_empty());
        assert_eq!(template.to_string(), "a{{}}");
        assert_eq!(template.render(&args()).expect("render"), json!("a{}"));
    }

    #[test]
    fn missing_argument_fails() {
        let err = Template::from("/{nope}").render(&args()).expect_err("missing");
        assert!(matches!(err, Error::Template { .. }));

        let err = Template::from("{}").render(&args()).expect_err("positional");
        assert!(matches!(err, Error::Template { .. }));
    }

    #[test]
    fn unbalanced_brace_is_literal() {
        let template = Template::from("a{b");
        assert!(template.names().is_empty());
        assert_eq!(template.render(&args()).expect("render"), json!("a{b"));
    }

    #[test]
    fn function_templates() {
        let plus_one = Template::map("i", |i: i64| i + 1);
        assert_eq!(plus_one.names(), vec!["i"]);
        assert_eq!(plus_one.return_hint(), TypeHint::of::<i64>());
        assert_eq!(plus_one.render(&args()).expect("render"), json!(2));

        let concat = Template::map2(("s", "i"), |s: String, i: i64| format!("{s}-{i}"));
        assert_eq!(concat.names(), vec!["s", "i"]);
        assert_eq!(concat.render_text(&args()).expect("render"), "abc-1");
    }

    #[test]
    fn function_template_type_mismatch() {
        let template = Template::map("s", |i: i64| i);
        assert!(template.render(&args()).is_err());
    }
}
