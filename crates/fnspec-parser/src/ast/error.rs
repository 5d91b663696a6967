//! Error collection for the body parser.
//!
//! Individual errors are [`fnspec_core::ParseError`]; the parser keeps
//! going after an error and hands back every error it found.

use fnspec_core::ParseError;
use thiserror::Error;

/// Every error found while parsing one body.
#[derive(Debug, Clone, Default, PartialEq, Error)]
#[error("{}", render(.errors))]
pub struct ParseErrors {
    errors: Vec<ParseError>,
}

fn render(errors: &[ParseError]) -> String {
    match errors {
        [] => "no errors".to_string(),
        [single] => single.to_string(),
        many => {
            let mut out = format!("{} errors:", many.len());
            for (i, error) in many.iter().enumerate() {
                out.push_str(&format!("\n  {}: {}", i + 1, error));
            }
            out
        }
    }
}

impl ParseErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// The first error in source order, used as the headline diagnostic.
    pub fn first(&self) -> Option<&ParseError> {
        self.errors.first()
    }

    pub fn into_vec(self) -> Vec<ParseError> {
        self.errors
    }
}

impl From<ParseError> for ParseErrors {
    fn from(error: ParseError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl FromIterator<ParseError> for ParseErrors {
    fn from_iter<T: IntoIterator<Item = ParseError>>(iter: T) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}
