//! fnspec proc macros
//!
//! `#[derive(HostObject)]` implements `fnspec_core::HostObject` for a struct,
//! so its values can travel through argument arrays and be read from
//! function bodies.
//!
//! # Example
//!
//! ```ignore
//! use fnspec::HostObject;
//!
//! #[derive(Debug, Clone, PartialEq, HostObject)]
//! #[fnspec(name = "geom.Point", eq)]
//! pub struct Point {
//!     #[fnspec(get)]
//!     pub x: i32,
//!     #[fnspec(get)]
//!     pub y: i32,
//! }
//! ```

use proc_macro::TokenStream;

mod attrs;
mod derive_host;

/// Derive `HostObject` for a struct with named fields.
///
/// # Attributes
///
/// - `#[fnspec(name = "...")]` - Type name seen by bodies (default: the Rust
///   struct name)
/// - `#[fnspec(eq)]` - Implement `host_eq` with the type's `PartialEq`
/// - `#[fnspec(display)]` - Render with the type's `Display` instead of `Debug`
/// - `#[fnspec(crate = "fnspec::core")]` - Where `fnspec_core` is reachable
///   from the deriving crate (default: `::fnspec_core`)
///
/// # Field Attributes
///
/// - `#[fnspec(get)]` - Expose the field for reading; its type must be
///   `Clone` and convert into `Value`
/// - `#[fnspec(get, name = "...")]` - Expose it under another name
#[proc_macro_derive(HostObject, attributes(fnspec))]
pub fn derive_host_object(input: TokenStream) -> TokenStream {
    derive_host::derive_host_impl(input)
}
