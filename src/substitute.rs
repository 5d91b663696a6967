//! Rewriting parameter names into argument array accesses.
//!
//! An occurrence of a name is *free-standing* when the byte before it is a
//! boundary (or it starts the text) and the byte after it is a boundary (or
//! it ends the text). The boundary set is
//!
//! ```text
//! ( ) . * + - / % ? ; { } , and ASCII whitespace
//! ```
//!
//! so `x` matches in `(x + y)` and `x.y` but not in `xb.get()` or `Matx()`.
//! Note that a name directly followed by `[`, `=`, `<` or `>` is not
//! free-standing either.
//!
//! Each declaration is applied in turn to the text the previous one
//! produced, and each pass is a single left-to-right scan that resumes after
//! every replacement.

use fnspec_core::TypeTable;
use tracing::trace;

use crate::params::ParameterDeclaration;

fn is_boundary(byte: u8) -> bool {
    matches!(
        byte,
        b'(' | b')' | b'.' | b'*' | b'+' | b'-' | b'/' | b'%' | b'?' | b';' | b'{' | b'}' | b','
            | b' ' | b'\t' | b'\n' | b'\r' | b'\x0B' | b'\x0C'
    )
}

/// Byte offsets of every free-standing occurrence of `name`, without overlap.
fn occurrences<'t>(text: &'t str, name: &'t str) -> impl Iterator<Item = usize> + 't {
    let bytes = text.as_bytes();
    let needle = name.as_bytes();
    let mut pos = 0;

    std::iter::from_fn(move || {
        if needle.is_empty() {
            return None;
        }
        while pos + needle.len() <= bytes.len() {
            let start = pos;
            let end = start + needle.len();
            let before_ok = start == 0 || is_boundary(bytes[start - 1]);
            let after_ok = end == bytes.len() || is_boundary(bytes[end]);
            if before_ok && after_ok && &bytes[start..end] == needle {
                pos = end;
                return Some(start);
            }
            pos += 1;
        }
        None
    })
}

/// Whether `name` occurs free-standing anywhere in `text`.
pub fn contains_free_standing(text: &str, name: &str) -> bool {
    occurrences(text, name).next().is_some()
}

/// Replace every free-standing occurrence of `name` with `replacement`.
pub fn replace_free_standing(text: &str, name: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    for start in occurrences(text, name) {
        out.push_str(&text[copied..start]);
        out.push_str(replacement);
        copied = start + name.len();
    }
    out.push_str(&text[copied..]);
    out
}

/// The expression a parameter is rewritten to.
///
/// Boxed primitives are unboxed, so `Double x` at index 0 becomes
/// `(((Double) ARGS[0]).doubleValue())`; any other type is only cast:
/// `((geom.Point) ARGS[1])`.
pub fn replacement_for(decl: &ParameterDeclaration<'_>, args_identifier: &str) -> String {
    let ParameterDeclaration { index, type_name, .. } = decl;
    match TypeTable::global().boxed(type_name) {
        Some(kind) => format!(
            "((({type_name}) {args_identifier}[{index}]).{}())",
            kind.unbox_method()
        ),
        None => format!("(({type_name}) {args_identifier}[{index}])"),
    }
}

/// Apply every declaration to `body`, in declaration order.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn substitute(body: &str, declarations: &[ParameterDeclaration<'_>], args_identifier: &str) -> String {
    let mut text = body.to_string();
    for decl in declarations {
        let replacement = replacement_for(decl, args_identifier);
        text = replace_free_standing(&text, decl.name, &replacement);
        trace!(name = decl.name, index = decl.index, body = %text, "substituted parameter");
    }
    text
}
