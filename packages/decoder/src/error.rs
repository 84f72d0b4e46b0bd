use crate::destination::Shape;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Boxed error returned by custom decoders and scalar conversions
pub type BoxError = Box<dyn StdError + Send + Sync>;

pub type UnmarshalResult<T> = Result<T, UnmarshalError>;
pub type DecodeResult<T> = Result<T, DecodeError>;
pub type SelectorResult<T> = Result<T, SelectorError>;

/// Errors from the document-level entry points
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Unmarshal(#[from] UnmarshalError),
}

/// A selector the document provider could not compile
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid selector '{selector}': {message}")]
pub struct SelectorError {
    pub selector: String,
    pub message: String,
}

impl SelectorError {
    pub fn new(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            message: message.into(),
        }
    }
}

/// Literal that could not be converted into a scalar
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot parse '{literal}' as {target}")]
pub struct ConversionError {
    pub literal: String,
    pub target: &'static str,
}

/// Why a decode failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    /// A custom decoder returned an error
    CustomUnmarshal,
    /// A scalar conversion failed, or a nested decode failed below this level
    TypeConversion,
    /// A fixed-size array received the wrong number of nodes
    ArrayLengthMismatch { expected: usize, found: usize },
    /// A map annotation has no key selector in slot 1
    MissingValueSelector,
    MapKeyUnmarshal,
    InvalidSelector,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::CustomUnmarshal => f.write_str("custom unmarshaler returned an error"),
            Reason::TypeConversion => f.write_str("type conversion failed"),
            Reason::ArrayLengthMismatch { expected, found } => write!(
                f,
                "array length does not match: expected {} nodes, found {}",
                expected, found
            ),
            Reason::MissingValueSelector => {
                f.write_str("at least one value selector must be passed to use as map index")
            }
            Reason::MapKeyUnmarshal => f.write_str("error unmarshaling map key"),
            Reason::InvalidSelector => f.write_str("invalid selector"),
        }
    }
}

/// Where inside its destination an error happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Field(String),
    Index(usize),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Field(name) => write!(f, ".{}", name),
            Location::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Error raised while decoding into a destination
///
/// Errors nest: a failure deep inside a record is wrapped once per level on
/// the way up, each level recording the field or index it was decoding. Use
/// [`UnmarshalError::path`] to get the full path and
/// [`UnmarshalError::innermost`] for the failure point.
#[derive(Error, Debug)]
#[error("could not unmarshal into {type_name} ({shape}): {reason}{}{}", fmt_location(.location), fmt_value(.value))]
pub struct UnmarshalError {
    pub reason: Reason,
    /// Rust type of the destination
    pub type_name: &'static str,
    pub shape: Shape,
    /// Literal string that was examined, if any
    pub value: Option<String>,
    pub location: Option<Location>,
    #[source]
    pub cause: Option<Cause>,
}

fn fmt_location(location: &Option<Location>) -> String {
    match location {
        Some(Location::Field(name)) => format!(" at field '{}'", name),
        Some(Location::Index(index)) => format!(" at index {}", index),
        None => String::new(),
    }
}

fn fmt_value(value: &Option<String>) -> String {
    match value {
        Some(value) => format!(" (value {:?})", value),
        None => String::new(),
    }
}

impl UnmarshalError {
    pub fn new(reason: Reason, type_name: &'static str, shape: Shape) -> Self {
        Self {
            reason,
            type_name,
            shape,
            value: None,
            location: None,
            cause: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn at_field(mut self, name: impl Into<String>) -> Self {
        self.location = Some(Location::Field(name.into()));
        self
    }

    pub fn at_index(mut self, index: usize) -> Self {
        self.location = Some(Location::Index(index));
        self
    }

    /// Wrap an inner decode failure
    pub fn wrapping(mut self, inner: UnmarshalError) -> Self {
        self.cause = Some(Cause::Nested(Box::new(inner)));
        self
    }

    pub fn with_cause(mut self, cause: BoxError) -> Self {
        self.cause = Some(Cause::External(cause));
        self
    }

    /// The nested decode failure, if this error wraps one
    pub fn nested(&self) -> Option<&UnmarshalError> {
        match &self.cause {
            Some(Cause::Nested(inner)) => Some(inner),
            _ => None,
        }
    }

    /// The deepest decode failure in the chain
    pub fn innermost(&self) -> &UnmarshalError {
        let mut current = self;
        while let Some(inner) = current.nested() {
            current = inner;
        }
        current
    }

    /// Field and index locations from the root down to the failure point
    pub fn path(&self) -> Vec<Location> {
        let mut path = Vec::new();
        let mut current = Some(self);
        while let Some(err) = current {
            if let Some(location) = &err.location {
                path.push(location.clone());
            }
            current = err.nested();
        }
        path
    }

    /// [`UnmarshalError::path`] rendered as `.items[1].title`
    pub fn path_string(&self) -> String {
        self.path().iter().map(ToString::to_string).collect()
    }
}

/// What an [`UnmarshalError`] wraps
#[derive(Debug)]
pub enum Cause {
    Nested(Box<UnmarshalError>),
    External(BoxError),
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Nested(inner) => fmt::Display::fmt(inner, f),
            Cause::External(inner) => fmt::Display::fmt(inner, f),
        }
    }
}

impl StdError for Cause {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Cause::Nested(inner) => inner.source(),
            Cause::External(inner) => inner.source(),
        }
    }
}
