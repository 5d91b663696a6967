//! Attribute parsing for `#[fnspec(...)]`.

use syn::{Attribute, LitStr, Path};

/// Parsed `#[fnspec(...)]` attributes on a type.
#[derive(Debug, Default)]
pub struct TypeAttrs {
    /// Override name (default: Rust struct name)
    pub name: Option<String>,
    /// Compare with `PartialEq` in `host_eq`
    pub eq: bool,
    /// Render with `Display`
    pub display: bool,
    /// Path to `fnspec_core` when it is re-exported under another name
    pub krate: Option<Path>,
}

/// Parsed `#[fnspec(...)]` attributes on a field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    pub get: bool,
    /// Override field name
    pub name: Option<String>,
}

fn attr_name(meta: &syn::meta::ParseNestedMeta<'_>) -> String {
    meta.path.get_ident().map(|i| i.to_string()).unwrap_or_default()
}

impl TypeAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("fnspec") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    if value.value().trim().is_empty() {
                        return Err(syn::Error::new(value.span(), "type name must not be empty"));
                    }
                    result.name = Some(value.value());
                } else if meta.path.is_ident("eq") {
                    result.eq = true;
                } else if meta.path.is_ident("display") {
                    result.display = true;
                } else if meta.path.is_ident("crate") {
                    let value: LitStr = meta.value()?.parse()?;
                    result.krate = Some(value.parse()?);
                } else {
                    return Err(meta.error(format!("unknown fnspec attribute: {}", attr_name(&meta))));
                }
                Ok(())
            })?;
        }

        Ok(result)
    }
}

impl FieldAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("fnspec") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("get") {
                    result.get = true;
                } else if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    result.name = Some(value.value());
                } else {
                    return Err(meta.error(format!(
                        "unknown fnspec field attribute: {}",
                        attr_name(&meta)
                    )));
                }
                Ok(())
            })?;
        }

        Ok(result)
    }
}
