//! The function parser: spec string in, [`ParsedFunction`] out.
//!
//! ```text
//! split_signature → resolve_parameters → substitute → MethodSource → backend
//! ```
//!
//! Every step before the backend is pure text processing. The backend is
//! the only collaborator and is shared behind an [`Arc`], so one parser can
//! be used from many threads.

use std::fmt;
use std::sync::{Arc, LazyLock};

use fnspec_core::{EvaluationBackend, UnitRequest};
use fnspec_runtime::{InterpreterBackend, TypeRegistry};
use tracing::debug;

use crate::body::MethodSource;
use crate::error::{FunctionError, Result};
use crate::function::ParsedFunction;
use crate::params::{self, resolve_parameters};
use crate::signature::{DEFAULT_RETURN_TYPE, split_signature};
use crate::substitute::substitute;

/// Identifier generated bodies use for the argument array.
pub const DEFAULT_ARGS_IDENTIFIER: &str = "__fnspec_args";

static DEFAULT_PARSER: LazyLock<FunctionParser> = LazyLock::new(FunctionParser::new);

/// Knobs for the text pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Name of the argument array inside generated bodies. It must not clash
    /// with any parameter or local name.
    pub args_identifier: String,
    /// Return type assumed when a spec starts with `(`.
    pub default_return_type: String,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            args_identifier: DEFAULT_ARGS_IDENTIFIER.to_string(),
            default_return_type: DEFAULT_RETURN_TYPE.to_string(),
        }
    }
}

/// Turns spec strings into callables.
#[derive(Clone)]
pub struct FunctionParser {
    options: ParserOptions,
    backend: Arc<dyn EvaluationBackend>,
}

impl FunctionParser {
    /// A parser backed by the interpreter with only the builtin types.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> FunctionParserBuilder {
        FunctionParserBuilder::default()
    }

    /// Parse with the shared default parser.
    ///
    /// ```
    /// use fnspec::{FunctionParser, Value};
    ///
    /// let f = FunctionParser::from_str("double(Double x,y)->x * y").unwrap();
    /// assert_eq!(f.evaluate_to_double(&[Value::from(2.0), Value::from(4.0)]).unwrap(), 8.0);
    /// ```
    pub fn from_str(spec: &str) -> Result<ParsedFunction> {
        DEFAULT_PARSER.parse(spec)
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse(&self, spec: &str) -> Result<ParsedFunction> {
        let raw = split_signature(spec)?;
        let return_type = raw.return_type_or(&self.options.default_return_type);
        let declarations = resolve_parameters(spec, &raw.params)?;
        let bindings = params::bindings(&declarations);

        let args_identifier = self.options.args_identifier.as_str();
        let substituted = substitute(raw.body, &declarations, args_identifier);
        let source = MethodSource::resolve(&substituted, return_type, args_identifier);

        let request = UnitRequest {
            function_string: spec,
            return_type,
            entry_point: source.entry_point(),
            args_identifier,
            body: source.body(),
            bindings: &bindings,
        };
        let unit = self
            .backend
            .compile(&request)
            .map_err(|err| FunctionError::compilation(spec, err))?;

        debug!(
            spec,
            entry_point = %source.entry_point(),
            variables = bindings.len(),
            "parsed function"
        );
        Ok(ParsedFunction::new(spec, bindings, source, unit))
    }
}

impl Default for FunctionParser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FunctionParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionParser")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Builder for [`FunctionParser`].
///
/// Without a backend or registry, the interpreter with the builtin types is
/// used. A registry is ignored once a backend is set.
#[derive(Default)]
pub struct FunctionParserBuilder {
    options: ParserOptions,
    registry: Option<Arc<TypeRegistry>>,
    backend: Option<Arc<dyn EvaluationBackend>>,
}

impl FunctionParserBuilder {
    pub fn options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    pub fn args_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.options.args_identifier = identifier.into();
        self
    }

    pub fn default_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.options.default_return_type = return_type.into();
        self
    }

    /// Interpret bodies against `registry`, e.g. one with host types added.
    pub fn registry(mut self, registry: impl Into<Arc<TypeRegistry>>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    pub fn backend(mut self, backend: Arc<dyn EvaluationBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn build(self) -> FunctionParser {
        let backend = match (self.backend, self.registry) {
            (Some(backend), _) => backend,
            (None, Some(registry)) => Arc::new(InterpreterBackend::new(registry)),
            (None, None) => Arc::new(InterpreterBackend::with_builtins()),
        };
        FunctionParser {
            options: self.options,
            backend,
        }
    }
}
