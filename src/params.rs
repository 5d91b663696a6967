//! Parameter declarations and the bindings derived from them.
//!
//! Each comma-separated token is either `Type name` or a bare `name` that
//! inherits the most recent explicit type, so `Double x,y, Boolean a` binds
//! `x` and `y` as `Double` and `a` as `Boolean`. Indices follow raw token
//! order, duplicates included: they are the positions callers fill in the
//! argument array.

use fnspec_core::VariableBinding;
use indexmap::IndexMap;
use tracing::warn;

use crate::error::SignatureError;

/// One parameter token after type inheritance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDeclaration<'a> {
    pub index: usize,
    pub name: &'a str,
    pub type_name: &'a str,
}

/// Resolve raw parameter tokens into declarations.
///
/// `spec` is only used for error reporting.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn resolve_parameters<'a>(
    spec: &str,
    tokens: &[&'a str],
) -> Result<Vec<ParameterDeclaration<'a>>, SignatureError> {
    let mut current_type: Option<&'a str> = None;
    let mut declarations = Vec::with_capacity(tokens.len());

    for (index, raw) in tokens.iter().enumerate() {
        let token = raw.trim();
        let words: Vec<&'a str> = token.split_whitespace().collect();

        let name = match words.as_slice() {
            [ty, name] => {
                current_type = Some(*ty);
                *name
            }
            [name] => *name,
            [] if index == 0 => "",
            [] => return Err(SignatureError::malformed(spec, "empty parameter")),
            _ => {
                return Err(SignatureError::TooManyTokens {
                    token: token.to_string(),
                });
            }
        };

        let Some(type_name) = current_type else {
            return Err(SignatureError::MissingType {
                token: token.to_string(),
            });
        };

        declarations.push(ParameterDeclaration {
            index,
            name,
            type_name,
        });
    }

    Ok(declarations)
}

/// Collapse declarations into bindings, one per distinct name.
///
/// A repeated name keeps the index and type of its first declaration.
pub fn bindings(declarations: &[ParameterDeclaration<'_>]) -> Vec<VariableBinding> {
    let mut by_name: IndexMap<&str, VariableBinding> = IndexMap::with_capacity(declarations.len());

    for decl in declarations {
        if let Some(first) = by_name.get(decl.name) {
            warn!(
                name = decl.name,
                first_index = first.index,
                ignored_index = decl.index,
                "duplicate parameter name, keeping the first declaration"
            );
            continue;
        }
        by_name.insert(
            decl.name,
            VariableBinding {
                index: decl.index,
                name: decl.name.to_string(),
                type_name: decl.type_name.to_string(),
            },
        );
    }

    by_name.into_values().collect()
}
