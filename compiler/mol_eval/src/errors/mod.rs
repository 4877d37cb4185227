//! Runtime errors.
//!
//! Every failure during evaluation is an [`EvalError`] carrying a structured
//! [`EvalErrorKind`]. The kind decides the user-facing category
//! ([`ErrorCategory`]) and the diagnostic code; factory functions below are
//! the way the rest of the crate builds errors.

use std::fmt;

use mol_diagnostic::{Diagnostic, ErrorCode};
use mol_ir::ast::{BinaryOp, UnaryOp};
use mol_ir::Span;

use crate::value::Value;

/// Result of evaluating an expression.
pub type EvalResult = Result<Value, EvalError>;

/// The error taxonomy visible to MOL programs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Runtime,
    /// A typed `let` or parameter annotation did not match.
    Type,
    /// A `guard` (or `assert_*` helper) failed.
    Guard,
    /// `access` to a resource outside the allow-list.
    Security,
}

impl ErrorCategory {
    pub fn name(self) -> &'static str {
        match self {
            ErrorCategory::Runtime => "RuntimeError",
            ErrorCategory::Type => "TypeError",
            ErrorCategory::Guard => "GuardError",
            ErrorCategory::Security => "SecurityError",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Structured error condition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Arithmetic
    DivisionByZero,
    ModuloByZero,

    // Operators
    InvalidBinaryOp {
        op: BinaryOp,
        left: String,
        right: String,
    },
    InvalidUnaryOp {
        op: UnaryOp,
        operand: String,
    },

    // Names
    UndefinedVariable {
        name: String,
    },
    AssignToUndefined {
        name: String,
    },

    // Access
    UndefinedField {
        field: String,
        type_name: String,
    },
    UndefinedMethod {
        method: String,
        type_name: String,
    },
    IndexOutOfBounds {
        index: i64,
        len: usize,
    },
    KeyNotFound {
        key: String,
    },
    NotIndexable {
        type_name: String,
    },
    NotIterable {
        type_name: String,
    },

    // Calls
    NotCallable {
        name: String,
    },
    ArityMismatch {
        name: String,
        expected: String,
        got: usize,
    },
    WrongArgType {
        function: String,
        expected: String,
        got: String,
    },
    RecursionLimitExceeded {
        depth: usize,
    },

    // Loops
    IterationLimitExceeded {
        limit: usize,
    },

    // Declared types
    TypeAnnotationMismatch {
        name: String,
        expected: String,
        got: String,
    },
    ConversionFailed {
        value: String,
        target: &'static str,
    },

    // Assertions and access control
    GuardFailed {
        message: String,
    },
    AccessDenied {
        resource: String,
        allowed: String,
    },

    /// Anything without a dedicated variant.
    Custom {
        message: String,
    },
}

impl EvalErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TypeAnnotationMismatch { .. } | Self::ConversionFailed { .. } => {
                ErrorCategory::Type
            }
            Self::GuardFailed { .. } => ErrorCategory::Guard,
            Self::AccessDenied { .. } => ErrorCategory::Security,
            _ => ErrorCategory::Runtime,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::DivisionByZero | Self::ModuloByZero => ErrorCode::E6001,
            Self::UndefinedVariable { .. } | Self::AssignToUndefined { .. } => ErrorCode::E6002,
            Self::NotCallable { .. } => ErrorCode::E6003,
            Self::ArityMismatch { .. } => ErrorCode::E6004,
            Self::InvalidBinaryOp { .. }
            | Self::InvalidUnaryOp { .. }
            | Self::WrongArgType { .. }
            | Self::NotIndexable { .. }
            | Self::NotIterable { .. } => ErrorCode::E6005,
            Self::IndexOutOfBounds { .. } => ErrorCode::E6006,
            Self::KeyNotFound { .. } => ErrorCode::E6007,
            Self::UndefinedField { .. } | Self::UndefinedMethod { .. } => ErrorCode::E6008,
            Self::IterationLimitExceeded { .. } => ErrorCode::E6010,
            Self::RecursionLimitExceeded { .. } => ErrorCode::E6011,
            Self::TypeAnnotationMismatch { .. } | Self::ConversionFailed { .. } => {
                ErrorCode::E6020
            }
            Self::GuardFailed { .. } => ErrorCode::E6030,
            Self::AccessDenied { .. } => ErrorCode::E6040,
            Self::Custom { .. } => ErrorCode::E6099,
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::ModuloByZero => write!(f, "modulo by zero"),

            Self::InvalidBinaryOp { op, left, right } => write!(
                f,
                "unsupported operand types for `{}`: {left} and {right}",
                op.as_symbol()
            ),
            Self::InvalidUnaryOp { op, operand } => {
                write!(f, "bad operand type for `{}`: {operand}", op.as_symbol())
            }

            Self::UndefinedVariable { name } => write!(f, "undefined variable: '{name}'"),
            Self::AssignToUndefined { name } => {
                write!(f, "cannot set undefined variable: '{name}'; use 'let' first")
            }

            Self::UndefinedField { field, type_name } => {
                write!(f, "no field '{field}' on {type_name}")
            }
            Self::UndefinedMethod { method, type_name } => {
                write!(f, "no method '{method}' on {type_name}")
            }
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::KeyNotFound { key } => write!(f, "key not found: '{key}'"),
            Self::NotIndexable { type_name } => write!(f, "{type_name} cannot be indexed"),
            Self::NotIterable { type_name } => write!(f, "cannot iterate over {type_name}"),

            Self::NotCallable { name } => write!(f, "'{name}' is not callable"),
            Self::ArityMismatch {
                name,
                expected,
                got,
            } => write!(f, "'{name}' expects {expected} args, got {got}"),
            Self::WrongArgType {
                function,
                expected,
                got,
            } => write!(f, "{function}() expects {expected}, got {got}"),
            Self::RecursionLimitExceeded { depth } => {
                write!(f, "maximum recursion depth exceeded (limit: {depth})")
            }

            Self::IterationLimitExceeded { limit } => write!(
                f,
                "infinite loop detected (exceeded {} iterations)",
                group_thousands(*limit)
            ),

            Self::TypeAnnotationMismatch {
                name,
                expected,
                got,
            } => write!(f, "'{name}' expected {expected}, got {got}"),
            Self::ConversionFailed { value, target } => {
                write!(f, "cannot convert '{value}' to {target}")
            }

            Self::GuardFailed { message } | Self::Custom { message } => f.write_str(message),
            Self::AccessDenied { resource, allowed } => write!(
                f,
                "Access denied: '{resource}' is not an authorized resource. Allowed: {allowed}"
            ),
        }
    }
}

/// `1000000` -> `1,000,000`
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Equals `kind.to_string()`.
    pub message: String,
    /// Source location, attached by the evaluator at the failing node.
    pub span: Option<Span>,
    /// Names of the user functions active when the error was raised,
    /// innermost last.
    pub call_stack: Vec<String>,
}

impl EvalError {
    /// An error with just a message.
    #[cold]
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_kind(EvalErrorKind::Custom {
            message: message.into(),
        })
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError {
            kind,
            message,
            span: None,
            call_stack: Vec::new(),
        }
    }

    /// Attach a span unless a more precise one is already present.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    #[must_use]
    pub fn with_call_stack(mut self, frames: Vec<String>) -> Self {
        if self.call_stack.is_empty() {
            self.call_stack = frames;
        }
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn error_code(&self) -> ErrorCode {
        self.kind.error_code()
    }

    /// Convert to a diagnostic for terminal rendering.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.error_code()).with_message(self.to_string());
        if let Some(span) = self.span {
            diag = diag.with_label(span, self.primary_label());
        }
        if !self.call_stack.is_empty() {
            diag = diag.with_note(format!("in {}", self.call_stack.join(" -> ")));
        }
        if let EvalErrorKind::AssignToUndefined { name } = &self.kind {
            diag = diag.with_suggestion(format!("declare it first with `let {name} be ...`"));
        }
        diag
    }

    fn primary_label(&self) -> &'static str {
        match self.kind {
            EvalErrorKind::DivisionByZero | EvalErrorKind::ModuloByZero => "divisor is zero",
            EvalErrorKind::UndefinedVariable { .. } | EvalErrorKind::AssignToUndefined { .. } => {
                "not found in this scope"
            }
            EvalErrorKind::NotCallable { .. } => "called here",
            EvalErrorKind::ArityMismatch { .. } => "wrong number of arguments",
            EvalErrorKind::IterationLimitExceeded { .. } => "this loop never finished",
            EvalErrorKind::GuardFailed { .. } => "guard failed here",
            EvalErrorKind::AccessDenied { .. } => "access denied",
            EvalErrorKind::TypeAnnotationMismatch { .. } => "declared type does not match",
            _ => "here",
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category(), self.message)
    }
}

impl std::error::Error for EvalError {}

// Factories

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn modulo_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ModuloByZero)
}

#[cold]
pub fn invalid_binary_op(op: BinaryOp, left: &str, right: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidBinaryOp {
        op,
        left: left.to_string(),
        right: right.to_string(),
    })
}

#[cold]
pub fn invalid_unary_op(op: UnaryOp, operand: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidUnaryOp {
        op,
        operand: operand.to_string(),
    })
}

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn assign_to_undefined(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AssignToUndefined {
        name: name.to_string(),
    })
}

#[cold]
pub fn undefined_field(field: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedField {
        field: field.to_string(),
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn no_such_method(method: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedMethod {
        method: method.to_string(),
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds { index, len })
}

#[cold]
pub fn key_not_found(key: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::KeyNotFound {
        key: key.to_string(),
    })
}

#[cold]
pub fn not_indexable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotIndexable {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn not_iterable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotIterable {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn not_callable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        name: name.to_string(),
    })
}

/// `min..=max` accepted arguments; `max == None` means variadic.
#[cold]
pub fn arity_mismatch(name: &str, min: usize, max: Option<usize>, got: usize) -> EvalError {
    let expected = match max {
        Some(max) if max == min => min.to_string(),
        Some(max) => format!("{min} to {max}"),
        None => format!("at least {min}"),
    };
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected,
        got,
    })
}

#[cold]
pub fn wrong_arg_type(function: &str, expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::WrongArgType {
        function: function.to_string(),
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

#[cold]
pub fn recursion_limit_exceeded(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::RecursionLimitExceeded { depth })
}

#[cold]
pub fn iteration_limit_exceeded(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IterationLimitExceeded { limit })
}

#[cold]
pub fn type_annotation_mismatch(name: &str, expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeAnnotationMismatch {
        name: name.to_string(),
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

#[cold]
pub fn conversion_failed(value: &str, target: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ConversionFailed {
        value: value.to_string(),
        target,
    })
}

#[cold]
pub fn guard_failed(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::GuardFailed {
        message: message.into(),
    })
}

#[cold]
pub fn access_denied(resource: &str, allowed: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AccessDenied {
        resource: resource.to_string(),
        allowed: allowed.to_string(),
    })
}
