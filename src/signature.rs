//! Splitting a spec string into return type, parameters and body.
//!
//! ```text
//! spec := [returnType] "(" paramList ")" "->" body
//! ```
//!
//! The parameter list ends at the first `)` after the first `(`, so nested
//! parentheses inside it are not supported. Only the first `->` after the
//! parameter list is significant; the body may contain further arrows and
//! parentheses. Anything between `)` and `->` is ignored.

use crate::error::SignatureError;

/// Return type used when the spec leaves it out.
pub const DEFAULT_RETURN_TYPE: &str = "Object";

/// A spec string cut into its three parts. Borrowed from the spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSignature<'a> {
    /// Trimmed return type; `None` when the spec gave none.
    pub return_type: Option<&'a str>,
    /// Raw, untrimmed parameter tokens.
    pub params: Vec<&'a str>,
    /// Everything after the arrow, untouched.
    pub body: &'a str,
}

impl<'a> RawSignature<'a> {
    /// The declared return type, or `default` when none was written.
    pub fn return_type_or(&self, default: &'a str) -> &'a str {
        self.return_type.unwrap_or(default)
    }
}

#[cfg_attr(feature = "profiling", profiling::function)]
pub fn split_signature(spec: &str) -> Result<RawSignature<'_>, SignatureError> {
    let open = spec
        .find('(')
        .ok_or_else(|| SignatureError::malformed(spec, "missing '('"))?;
    let close = spec[open + 1..]
        .find(')')
        .map(|i| open + 1 + i)
        .ok_or_else(|| SignatureError::malformed(spec, "missing ')'"))?;
    let arrow = spec[close + 1..]
        .find("->")
        .map(|i| close + 1 + i)
        .ok_or_else(|| SignatureError::malformed(spec, "missing '->'"))?;

    // Trailing empty tokens are dropped, as in `double(Double x,)->x`.
    let mut params: Vec<&str> = spec[open + 1..close].split(',').collect();
    while params.len() > 1 && params.last().is_some_and(|p| p.is_empty()) {
        params.pop();
    }

    let return_type = spec[..open].trim();
    Ok(RawSignature {
        return_type: (!return_type.is_empty()).then_some(return_type),
        params,
        body: &spec[arrow + 2..],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_spec() {
        let raw = split_signature("double(Double x,y,z,f)->(x + y + z + f)").unwrap();
        assert_eq!(raw.return_type, Some("double"));
        assert_eq!(raw.params, vec!["Double x", "y", "z", "f"]);
        assert_eq!(raw.body, "(x + y + z + f)");
    }

    #[test]
    fn whitespace_is_kept_until_resolution() {
        let raw = split_signature("  double (     Double   x,   y ,z  ,f)   ->  x").unwrap();
        assert_eq!(raw.return_type, Some("double"));
        assert_eq!(raw.params, vec!["     Double   x", "   y ", "z  ", "f"]);
        assert_eq!(raw.body, "  x");
    }

    #[test]
    fn missing_return_type_defaults() {
        let raw = split_signature("(Double x)->x").unwrap();
        assert_eq!(raw.return_type, None);
        assert_eq!(raw.return_type_or(DEFAULT_RETURN_TYPE), "Object");

        let raw = split_signature("   (Double x)->x").unwrap();
        assert_eq!(raw.return_type, None);
    }

    #[test]
    fn only_the_first_arrow_counts() {
        let raw = split_signature("int(Integer a)->a > 0 ? (a) : -(a) /* -> */").unwrap();
        assert_eq!(raw.body, "a > 0 ? (a) : -(a) /* -> */");
    }

    #[test]
    fn text_between_params_and_arrow_is_ignored() {
        let raw = split_signature("double(Double x) throws nothing -> x").unwrap();
        assert_eq!(raw.body, " x");
    }

    #[test]
    fn trailing_empty_params_are_dropped() {
        assert_eq!(split_signature("double(Double x,)->x").unwrap().params, vec!["Double x"]);
        assert_eq!(split_signature("double(Double x,y,,)->x").unwrap().params, vec!["Double x", "y"]);
        assert_eq!(split_signature("double()->1").unwrap().params, vec![""]);
        assert_eq!(split_signature("double(,)->1").unwrap().params, vec![""]);
        // Only exactly empty tokens count, and only at the end.
        assert_eq!(split_signature("double(Double x, )->x").unwrap().params, vec!["Double x", " "]);
        assert_eq!(split_signature("double(Double x,,y)->x").unwrap().params, vec!["Double x", "", "y"]);
    }

    #[test]
    fn dotted_return_type() {
        let raw = split_signature("java.awt.Point(java.awt.Point a,b)->return a;").unwrap();
        assert_eq!(raw.return_type, Some("java.awt.Point"));
        assert_eq!(raw.params, vec!["java.awt.Point a", "b"]);
    }

    #[test]
    fn malformed() {
        for (spec, reason) in [
            ("double Double x -> x", "missing '('"),
            ("double(Double x -> x", "missing ')'"),
            ("double(Double x) x", "missing '->'"),
            ("double(Double x -> y) x", "missing '->'"),
        ] {
            match split_signature(spec) {
                Err(SignatureError::MalformedSignature { spec: s, reason: r }) => {
                    assert_eq!(s, spec);
                    assert_eq!(r, reason, "{spec}");
                }
                other => panic!("expected malformed signature for {spec:?}, got {other:?}"),
            }
        }
    }
}
