//! Deciding the shape of the final method body.
//!
//! A substituted body that contains a free-standing `return` is a statement
//! block and is used as is. Anything else is a single expression, wrapped as
//! `return ((R)(expr));` so the value is converted to the declared return
//! type `R`.

use std::fmt;

use fnspec_core::EntryPoint;

use crate::substitute::contains_free_standing;

/// The finalized body together with the method it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSource {
    return_type: String,
    entry_point: EntryPoint,
    args_identifier: String,
    body: String,
    explicit_return: bool,
}

impl MethodSource {
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve(substituted: &str, return_type: &str, args_identifier: &str) -> Self {
        let explicit_return = contains_free_standing(substituted, "return");
        let body = if explicit_return {
            substituted.to_string()
        } else {
            format!("return (({return_type})({substituted}));")
        };

        Self {
            return_type: return_type.to_string(),
            entry_point: EntryPoint::for_return_type(return_type),
            args_identifier: args_identifier.to_string(),
            body,
            explicit_return,
        }
    }

    /// Statement-block source handed to the backend.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn return_type(&self) -> &str {
        &self.return_type
    }

    pub fn entry_point(&self) -> EntryPoint {
        self.entry_point
    }

    pub fn args_identifier(&self) -> &str {
        &self.args_identifier
    }

    /// Whether the body was written as a statement block.
    pub fn has_explicit_return(&self) -> bool {
        self.explicit_return
    }

    /// The whole method, e.g.
    /// `public double evaluateToDouble(Object[] ARGS){return ...;}`.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MethodSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "public {} {}(Object[] {}){{{}}}",
            self.entry_point.return_type_name(),
            self.entry_point.method_name(),
            self.args_identifier,
            self.body
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnspec_core::PrimitiveKind;

    #[test]
    fn bare_expression_is_wrapped() {
        let source = MethodSource::resolve("(a + b)", "double", "A");
        assert!(!source.has_explicit_return());
        assert_eq!(source.body(), "return ((double)((a + b)));");
        assert_eq!(source.entry_point(), EntryPoint::Primitive(PrimitiveKind::Double));
        assert_eq!(
            source.render(),
            "public double evaluateToDouble(Object[] A){return ((double)((a + b)));}"
        );
    }

    #[test]
    fn statement_block_is_verbatim() {
        let body = "double tot = 1; return tot;";
        let source = MethodSource::resolve(body, "double", "A");
        assert!(source.has_explicit_return());
        assert_eq!(source.body(), body);
    }

    #[test]
    fn object_return_types() {
        let source = MethodSource::resolve(" a", "java.awt.Point", "A");
        assert_eq!(source.entry_point(), EntryPoint::Object);
        assert_eq!(source.body(), "return ((java.awt.Point)( a));");
        assert_eq!(
            source.render(),
            "public Object evaluateToObject(Object[] A){return ((java.awt.Point)( a));}"
        );
    }

    #[test]
    fn return_inside_identifier_is_not_a_statement_block() {
        let source = MethodSource::resolve("returnValue(1)", "int", "A");
        assert!(!source.has_explicit_return());
    }
}
