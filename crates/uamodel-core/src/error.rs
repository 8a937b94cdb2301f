// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the typed node model.
//!
//! Absence of an optional property or component is never an error; it is
//! reported as `None`. Everything else that can go wrong is one of the
//! errors below, each of which maps to an OPC UA [`StatusCode`].
//!
//! # Error Categories
//!
//! ```text
//! UaError
//! ├── Conversion          - Variant shape or type disagrees with the Rust type
//! ├── Namespace           - Namespace URI or index cannot be resolved
//! ├── ArgumentResolution  - Method argument data type cannot be resolved
//! ├── Property            - Property write rejected
//! ├── MethodCall          - Method invocation rejected or handler failed
//! ├── Graph               - Node graph structure errors
//! └── Configuration       - Invalid settings
//! ```
//!
//! # Examples
//!
//! ```
//! use uamodel_core::error::{MethodCallError, UaError};
//! use uamodel_core::StatusCode;
//!
//! let error = UaError::from(MethodCallError::arguments_missing(2, 1));
//! assert_eq!(error.status_code(), StatusCode::BAD_ARGUMENTS_MISSING);
//! assert_eq!(error.category(), "method_call");
//!
//! for hint in error.recovery_hints() {
//!     println!("Hint: {}", hint);
//! }
//! ```

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;
use tracing::Level;

use crate::status::StatusCode;
use crate::variant::BuiltinType;

/// Result alias for the typed node model.
pub type UaResult<T> = Result<T, UaError>;

/// Boxed error returned by method handlers.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

// =============================================================================
// UaError - Main Error Type
// =============================================================================

/// The root error type.
#[derive(Debug, Error)]
pub enum UaError {
    /// Value conversion errors.
    #[error("{0}")]
    Conversion(#[from] ConversionError),

    /// Namespace resolution errors.
    #[error("{0}")]
    Namespace(#[from] NamespaceError),

    /// Method argument metadata resolution errors.
    #[error("{0}")]
    ArgumentResolution(#[from] ArgumentResolutionError),

    /// Property write errors.
    #[error("{0}")]
    Property(#[from] PropertyError),

    /// Method invocation errors.
    #[error("{0}")]
    MethodCall(#[from] MethodCallError),

    /// Node graph errors.
    #[error("{0}")]
    Graph(#[from] GraphError),

    /// Configuration errors.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message.
        message: String,
    },
}

impl UaError {
    // =========================================================================
    // Factory Methods
    // =========================================================================

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    // =========================================================================
    // Error Classification
    // =========================================================================

    /// Returns the OPC UA status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Conversion(e) => e.status_code(),
            Self::Namespace(e) => e.status_code(),
            Self::ArgumentResolution(e) => e.status_code(),
            Self::Property(e) => e.status_code(),
            Self::MethodCall(e) => e.status_code(),
            Self::Graph(e) => e.status_code(),
            Self::Configuration { .. } => StatusCode::BAD_CONFIGURATION_ERROR,
        }
    }

    /// Returns `true` if repeating the operation later may succeed.
    ///
    /// Only argument resolution qualifies: it succeeds once the missing
    /// namespace has been registered.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ArgumentResolution(_))
            || matches!(
                self,
                Self::MethodCall(MethodCallError::ArgumentResolution(_))
            )
    }

    /// Returns the severity level of this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Conversion(_) => ErrorSeverity::Error,
            Self::Namespace(_) => ErrorSeverity::Error,
            Self::ArgumentResolution(_) => ErrorSeverity::Error,
            Self::Property(e) => e.severity(),
            Self::MethodCall(e) => e.severity(),
            Self::Graph(e) => e.severity(),
            Self::Configuration { .. } => ErrorSeverity::Critical,
        }
    }

    /// Returns the error category for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Conversion(_) => "conversion",
            Self::Namespace(_) => "namespace",
            Self::ArgumentResolution(_) => "argument_resolution",
            Self::Property(_) => "property",
            Self::MethodCall(_) => "method_call",
            Self::Graph(_) => "graph",
            Self::Configuration { .. } => "configuration",
        }
    }

    /// Returns a unique error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Conversion(e) => e.error_code(),
            Self::Namespace(e) => e.error_code(),
            Self::ArgumentResolution(_) => ErrorCode::new(3, 1),
            Self::Property(e) => e.error_code(),
            Self::MethodCall(e) => e.error_code(),
            Self::Graph(e) => e.error_code(),
            Self::Configuration { .. } => ErrorCode::new(7, 1),
        }
    }

    /// Returns recovery hints for this error.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::Conversion(_) => vec![
                "Check that the stored value matches the declared data type",
                "Check that the value rank matches the declared shape",
            ],
            Self::Namespace(_) | Self::ArgumentResolution(_) => vec![
                "Register the namespace URI in the namespace table",
                "Check the namespace URI for typos",
            ],
            Self::Property(_) => vec![
                "Check the value against the property's data type and value rank",
                "Check the configured property write policy",
            ],
            Self::MethodCall(e) => e.recovery_hints(),
            Self::Graph(_) => vec!["Check the node id and the node's class"],
            Self::Configuration { .. } => vec!["Review the configuration file"],
        }
    }

    /// Returns the tracing level for this error.
    pub fn tracing_level(&self) -> Level {
        self.severity().to_tracing_level()
    }

    /// Logs this error with appropriate level and context.
    pub fn log(&self, context: &str) {
        log_at(
            self.tracing_level(),
            self.error_code(),
            self.category(),
            self.status_code(),
            context,
            self,
        );
    }
}

fn log_at(
    level: Level,
    code: ErrorCode,
    category: &'static str,
    status: StatusCode,
    context: &str,
    error: &dyn fmt::Display,
) {
    match level {
        Level::ERROR => tracing::error!(
            error_code = %code,
            category = category,
            status = %status,
            context = context,
            "{error}"
        ),
        Level::WARN => tracing::warn!(
            error_code = %code,
            category = category,
            status = %status,
            context = context,
            "{error}"
        ),
        _ => tracing::debug!(
            error_code = %code,
            category = category,
            status = %status,
            context = context,
            "{error}"
        ),
    }
}

// =============================================================================
// ConversionError
// =============================================================================

/// A value could not be converted between [`Variant`](crate::Variant) and a
/// Rust type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The runtime shape differs from the declared shape.
    #[error("Shape mismatch: expected {expected}, found {actual}")]
    ShapeMismatch {
        /// Expected shape.
        expected: &'static str,
        /// Actual shape description.
        actual: String,
    },

    /// The builtin type differs from the declared type.
    #[error("Type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        /// Expected builtin type.
        expected: BuiltinType,
        /// Actual type description.
        actual: String,
    },

    /// An empty variant was converted to a concrete type.
    #[error("Empty value where {expected} was expected")]
    Empty {
        /// Expected builtin type.
        expected: BuiltinType,
    },

    /// An array is malformed.
    #[error("Invalid array: {reason}")]
    InvalidArray {
        /// Reason.
        reason: String,
    },

    /// A textual form could not be parsed.
    #[error("Cannot parse '{input}': {reason}")]
    Parse {
        /// The input.
        input: String,
        /// Reason.
        reason: String,
    },
}

impl ConversionError {
    /// Creates an invalid array error.
    pub fn invalid_array(reason: impl Into<String>) -> Self {
        Self::InvalidArray {
            reason: reason.into(),
        }
    }

    /// Creates a parse error.
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Returns the OPC UA status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Parse { .. } => StatusCode::BAD_NODE_ID_INVALID,
            _ => StatusCode::BAD_TYPE_MISMATCH,
        }
    }

    /// Returns a unique error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::ShapeMismatch { .. } => ErrorCode::new(1, 1),
            Self::TypeMismatch { .. } => ErrorCode::new(1, 2),
            Self::Empty { .. } => ErrorCode::new(1, 3),
            Self::InvalidArray { .. } => ErrorCode::new(1, 4),
            Self::Parse { .. } => ErrorCode::new(1, 5),
        }
    }
}

// =============================================================================
// NamespaceError
// =============================================================================

/// A namespace could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamespaceError {
    /// The URI is not registered.
    #[error("Namespace URI not registered: {uri}")]
    UnknownUri {
        /// The URI.
        uri: String,
    },

    /// The index is not in the table.
    #[error("Namespace index not in table: {index}")]
    UnknownIndex {
        /// The index.
        index: u16,
    },

    /// The expanded node id refers to another server.
    #[error("Node id refers to server {server_index}, not the local server")]
    NotLocal {
        /// Server index.
        server_index: u32,
    },

    /// No more indexes are available.
    #[error("Namespace table is full")]
    TableFull,
}

impl NamespaceError {
    /// Creates an unknown URI error.
    pub fn unknown_uri(uri: impl Into<String>) -> Self {
        Self::UnknownUri { uri: uri.into() }
    }

    /// Returns the OPC UA status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::TableFull => StatusCode::BAD_INTERNAL_ERROR,
            _ => StatusCode::BAD_NODE_ID_UNKNOWN,
        }
    }

    /// Returns a unique error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnknownUri { .. } => ErrorCode::new(2, 1),
            Self::UnknownIndex { .. } => ErrorCode::new(2, 2),
            Self::NotLocal { .. } => ErrorCode::new(2, 3),
            Self::TableFull => ErrorCode::new(2, 4),
        }
    }
}

// =============================================================================
// ArgumentResolutionError
// =============================================================================

/// The data type of a method argument could not be resolved to a local node
/// id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot resolve data type of argument '{argument}' of method '{method}': {source}")]
pub struct ArgumentResolutionError {
    /// Browse name of the method.
    pub method: String,
    /// Name of the argument.
    pub argument: String,
    /// Underlying namespace error.
    #[source]
    pub source: NamespaceError,
}

impl ArgumentResolutionError {
    /// Creates a new resolution error.
    pub fn new(method: impl Into<String>, argument: impl Into<String>, source: NamespaceError) -> Self {
        Self {
            method: method.into(),
            argument: argument.into(),
            source,
        }
    }

    /// Returns the OPC UA status code for this error.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_INTERNAL_ERROR
    }
}

// =============================================================================
// PropertyError
// =============================================================================

/// A property write was rejected.
#[derive(Debug, Error)]
pub enum PropertyError {
    /// The value's shape disagrees with the property's value rank.
    #[error("Property '{property}' has value rank {value_rank}, value has shape {actual}")]
    ShapeMismatch {
        /// Browse name of the property.
        property: String,
        /// Declared value rank.
        value_rank: i32,
        /// Actual shape description.
        actual: String,
    },

    /// The value's builtin type is not assignable to the property's data type.
    #[error("Property '{property}' has data type {data_type}, value is {actual}")]
    TypeMismatch {
        /// Browse name of the property.
        property: String,
        /// Declared data type.
        data_type: String,
        /// Actual type description.
        actual: String,
    },

    /// The property's namespace could not be resolved.
    #[error("{0}")]
    Namespace(#[from] NamespaceError),

    /// Materializing the property node failed.
    #[error("{0}")]
    Graph(#[from] GraphError),
}

impl PropertyError {
    /// Returns the OPC UA status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ShapeMismatch { .. } | Self::TypeMismatch { .. } => StatusCode::BAD_TYPE_MISMATCH,
            Self::Namespace(e) => e.status_code(),
            Self::Graph(e) => e.status_code(),
        }
    }

    /// Returns the severity level of this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ShapeMismatch { .. } | Self::TypeMismatch { .. } => ErrorSeverity::Warning,
            Self::Namespace(_) | Self::Graph(_) => ErrorSeverity::Error,
        }
    }

    /// Returns a unique error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::ShapeMismatch { .. } => ErrorCode::new(4, 1),
            Self::TypeMismatch { .. } => ErrorCode::new(4, 2),
            Self::Namespace(_) => ErrorCode::new(4, 3),
            Self::Graph(_) => ErrorCode::new(4, 4),
        }
    }
}

// =============================================================================
// MethodCallError
// =============================================================================

/// A method invocation failed.
///
/// Every variant except [`Handler`](Self::Handler) is raised before the
/// method handler runs.
#[derive(Debug, Error)]
pub enum MethodCallError {
    /// Argument metadata could not be resolved.
    #[error("{0}")]
    ArgumentResolution(#[from] ArgumentResolutionError),

    /// Fewer input values than input arguments.
    #[error("Arguments missing: expected {expected}, got {actual}")]
    ArgumentsMissing {
        /// Declared input count.
        expected: usize,
        /// Supplied input count.
        actual: usize,
    },

    /// More input values than input arguments.
    #[error("Too many arguments: expected {expected}, got {actual}")]
    TooManyArguments {
        /// Declared input count.
        expected: usize,
        /// Supplied input count.
        actual: usize,
    },

    /// One or more input values failed the data type or value rank check.
    #[error("Invalid arguments: {}", format_results(.results))]
    InvalidArguments {
        /// One result per input argument, `Good` for the accepted ones.
        results: Vec<StatusCode>,
    },

    /// The caller may not execute the method.
    #[error("Method not executable: {status}")]
    NotExecutable {
        /// `Bad_NotExecutable` or `Bad_UserAccessDenied`.
        status: StatusCode,
    },

    /// The handler failed; the original error is preserved.
    #[error("Method handler failed: {0}")]
    Handler(#[source] BoxError),
}

fn format_results(results: &[StatusCode]) -> String {
    results
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_bad())
        .map(|(i, s)| format!("#{} {}", i, s.name()))
        .collect::<Vec<_>>()
        .join(", ")
}

impl MethodCallError {
    /// Creates an arguments missing error.
    pub fn arguments_missing(expected: usize, actual: usize) -> Self {
        Self::ArgumentsMissing { expected, actual }
    }

    /// Creates a too many arguments error.
    pub fn too_many_arguments(expected: usize, actual: usize) -> Self {
        Self::TooManyArguments { expected, actual }
    }

    /// Wraps a handler error.
    pub fn handler(error: impl Into<BoxError>) -> Self {
        Self::Handler(error.into())
    }

    /// Returns the handler error downcast to `E`, if it is one.
    pub fn handler_error<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            Self::Handler(source) => source.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Returns per-argument results for [`InvalidArguments`](Self::InvalidArguments).
    pub fn input_argument_results(&self) -> &[StatusCode] {
        match self {
            Self::InvalidArguments { results } => results,
            _ => &[],
        }
    }

    /// Returns `true` if the handler ran.
    pub fn handler_ran(&self) -> bool {
        matches!(self, Self::Handler(_))
    }

    /// Returns the OPC UA status code for this error.
    ///
    /// Handler errors that are a [`UaException`] keep their status; any
    /// other handler error maps to `Bad_UnexpectedError`.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ArgumentResolution(e) => e.status_code(),
            Self::ArgumentsMissing { .. } => StatusCode::BAD_ARGUMENTS_MISSING,
            Self::TooManyArguments { .. } => StatusCode::BAD_TOO_MANY_ARGUMENTS,
            Self::InvalidArguments { .. } => StatusCode::BAD_INVALID_ARGUMENT,
            Self::NotExecutable { status } => *status,
            Self::Handler(source) => source
                .downcast_ref::<UaException>()
                .map(UaException::status_code)
                .unwrap_or(StatusCode::BAD_UNEXPECTED_ERROR),
        }
    }

    /// Returns the severity level of this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ArgumentResolution(_) => ErrorSeverity::Error,
            Self::Handler(_) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Info,
        }
    }

    /// Returns a unique error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::ArgumentResolution(_) => ErrorCode::new(5, 1),
            Self::ArgumentsMissing { .. } => ErrorCode::new(5, 2),
            Self::TooManyArguments { .. } => ErrorCode::new(5, 3),
            Self::InvalidArguments { .. } => ErrorCode::new(5, 4),
            Self::NotExecutable { .. } => ErrorCode::new(5, 5),
            Self::Handler(_) => ErrorCode::new(5, 6),
        }
    }

    /// Returns recovery hints for this error.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::ArgumentResolution(_) => {
                vec!["Register the namespace of the argument data type before serving calls"]
            }
            Self::ArgumentsMissing { .. } | Self::TooManyArguments { .. } => {
                vec!["Supply exactly one value per declared input argument"]
            }
            Self::InvalidArguments { .. } => {
                vec!["Check the input argument results for the rejected positions"]
            }
            Self::NotExecutable { .. } => vec!["Check the Executable and UserExecutable attributes"],
            Self::Handler(_) => vec!["Inspect the handler error"],
        }
    }

    /// Logs this error with appropriate level and context.
    pub fn log(&self, context: &str) {
        log_at(
            self.severity().to_tracing_level(),
            self.error_code(),
            "method_call",
            self.status_code(),
            context,
            self,
        );
    }
}

// =============================================================================
// GraphError
// =============================================================================

/// Errors raised by node graph mutation and lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// No node with the id exists.
    #[error("Node not found: {node_id}")]
    NodeNotFound {
        /// The node id.
        node_id: String,
    },

    /// A node with the id already exists.
    #[error("Node already exists: {node_id}")]
    NodeExists {
        /// The node id.
        node_id: String,
    },

    /// The node is of another class than required.
    #[error("Node {node_id} is a {actual}, expected a {expected}")]
    WrongNodeClass {
        /// The node id.
        node_id: String,
        /// Required class.
        expected: &'static str,
        /// Actual class.
        actual: &'static str,
    },
}

impl GraphError {
    /// Creates a node not found error.
    pub fn node_not_found(node_id: impl fmt::Display) -> Self {
        Self::NodeNotFound {
            node_id: node_id.to_string(),
        }
    }

    /// Creates a node exists error.
    pub fn node_exists(node_id: impl fmt::Display) -> Self {
        Self::NodeExists {
            node_id: node_id.to_string(),
        }
    }

    /// Returns the OPC UA status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NodeNotFound { .. } => StatusCode::BAD_NODE_ID_UNKNOWN,
            Self::NodeExists { .. } => StatusCode::BAD_NODE_ID_EXISTS,
            Self::WrongNodeClass { .. } => StatusCode::BAD_METHOD_INVALID,
        }
    }

    /// Returns the severity level of this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NodeNotFound { .. } => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Returns a unique error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::NodeNotFound { .. } => ErrorCode::new(6, 1),
            Self::NodeExists { .. } => ErrorCode::new(6, 2),
            Self::WrongNodeClass { .. } => ErrorCode::new(6, 3),
        }
    }
}

// =============================================================================
// UaException
// =============================================================================

/// Error a method handler returns to fail with a specific status code.
///
/// # Examples
///
/// ```
/// use uamodel_core::error::{MethodCallError, UaException};
/// use uamodel_core::StatusCode;
///
/// let err = MethodCallError::handler(UaException::new(StatusCode::BAD_INVALID_STATE, "closed"));
/// assert_eq!(err.status_code(), StatusCode::BAD_INVALID_STATE);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status}: {message}")]
pub struct UaException {
    status: StatusCode,
    message: String,
}

impl UaException {
    /// Creates an exception with a status and message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Creates an exception carrying only a status.
    pub fn from_status(status: StatusCode) -> Self {
        Self::new(status, status.name())
    }

    /// Returns the status code.
    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    /// Returns the message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<StatusCode> for UaException {
    fn from(status: StatusCode) -> Self {
        Self::from_status(status)
    }
}

// =============================================================================
// ErrorSeverity
// =============================================================================

/// Error severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Informational - expected outcome of bad input.
    Info,
    /// Warning - action may be required.
    Warning,
    /// Error - action required, but recoverable.
    Error,
    /// Critical - immediate action required.
    Critical,
}

impl ErrorSeverity {
    /// Converts to tracing level.
    pub fn to_tracing_level(self) -> Level {
        match self {
            Self::Info => Level::DEBUG,
            Self::Warning => Level::WARN,
            Self::Error => Level::ERROR,
            Self::Critical => Level::ERROR,
        }
    }

    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// ErrorCode
// =============================================================================

/// Structured error code for categorization.
///
/// Format: `UM-XXYY` where XX is category and YY is specific error.
///
/// Categories:
/// - 1: Conversion
/// - 2: Namespace
/// - 3: Argument resolution
/// - 4: Property
/// - 5: Method call
/// - 6: Graph
/// - 7: Configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode {
    /// Category (1-7).
    pub category: u8,
    /// Specific error within category.
    pub code: u8,
}

impl ErrorCode {
    /// Creates a new error code.
    pub const fn new(category: u8, code: u8) -> Self {
        Self { category, code }
    }

    /// Returns the full error code as a u16.
    pub fn as_u16(&self) -> u16 {
        ((self.category as u16) << 8) | (self.code as u16)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UM-{:02X}{:02X}", self.category, self.code)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("disk on fire")]
    struct DiskError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            MethodCallError::too_many_arguments(1, 2).status_code(),
            StatusCode::BAD_TOO_MANY_ARGUMENTS
        );
        assert_eq!(
            MethodCallError::InvalidArguments {
                results: vec![StatusCode::GOOD, StatusCode::BAD_TYPE_MISMATCH],
            }
            .status_code(),
            StatusCode::BAD_INVALID_ARGUMENT
        );
        assert_eq!(
            UaError::from(NamespaceError::unknown_uri("urn:x")).status_code(),
            StatusCode::BAD_NODE_ID_UNKNOWN
        );
    }

    #[test]
    fn test_handler_error_preserved() {
        let err = MethodCallError::handler(DiskError);
        assert!(err.handler_ran());
        assert!(err.handler_error::<DiskError>().is_some());
        assert_eq!(err.status_code(), StatusCode::BAD_UNEXPECTED_ERROR);

        let err = MethodCallError::handler(UaException::from(StatusCode::BAD_NOT_WRITABLE));
        assert_eq!(err.status_code(), StatusCode::BAD_NOT_WRITABLE);
    }

    #[test]
    fn test_invalid_arguments_display() {
        let err = MethodCallError::InvalidArguments {
            results: vec![StatusCode::GOOD, StatusCode::BAD_TYPE_MISMATCH],
        };
        assert_eq!(err.to_string(), "Invalid arguments: #1 Bad_TypeMismatch");
        assert_eq!(err.input_argument_results().len(), 2);
    }

    #[test]
    fn test_retryable() {
        let resolution = ArgumentResolutionError::new(
            "AddComment",
            "Comment",
            NamespaceError::unknown_uri("urn:x"),
        );
        assert!(UaError::from(resolution.clone()).is_retryable());
        assert!(UaError::from(MethodCallError::from(resolution)).is_retryable());
        assert!(!UaError::from(MethodCallError::arguments_missing(1, 0)).is_retryable());
    }

    #[test]
    fn test_category_and_code() {
        let err = UaError::from(GraphError::node_not_found("ns=2;i=1"));
        assert_eq!(err.category(), "graph");
        assert_eq!(err.error_code().to_string(), "UM-0601");
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert!(!err.recovery_hints().is_empty());
    }

    #[test]
    fn test_error_severity() {
        assert_eq!(ErrorSeverity::Warning.to_tracing_level(), Level::WARN);
        assert_eq!(ErrorSeverity::Critical.as_str(), "critical");
    }
}
