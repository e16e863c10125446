//! Unified error types for deepdiff.
//!
//! The compare/render pipeline is a pure computation, so the taxonomy is
//! small: configuration rejected at call time, resource exhaustion on
//! pathological depth, and internal invariant violations that abort the
//! current call instead of producing corrupted output.

use thiserror::Error;

/// Main error type for deepdiff operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DeepDiffError {
    /// Errors during difference computation
    #[error("Diff computation failed: {context}")]
    Compare {
        context: String,
        #[source]
        source: CompareErrorKind,
    },

    /// Errors during three-column rendering
    #[error("Render failed: {context}")]
    Render {
        context: String,
        #[source]
        source: RenderErrorKind,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Specific compare error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CompareErrorKind {
    #[error("maximum depth {max_depth} exceeded at {path}")]
    TooDeep { max_depth: usize, path: String },

    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}

/// Specific render error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RenderErrorKind {
    #[error("difference entry has no value on either side")]
    EmptyDifference,

    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),

    #[error("formatting failed: {0}")]
    Format(#[from] std::fmt::Error),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for deepdiff operations
pub type Result<T> = std::result::Result<T, DeepDiffError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl DeepDiffError {
    /// Create a compare error with context
    pub fn compare(context: impl Into<String>, source: CompareErrorKind) -> Self {
        Self::Compare {
            context: context.into(),
            source,
        }
    }

    /// Create a compare error for exceeding the depth cap
    pub fn too_deep(max_depth: usize, path: impl Into<String>) -> Self {
        Self::compare(
            "structure too deep",
            CompareErrorKind::TooDeep {
                max_depth,
                path: path.into(),
            },
        )
    }

    /// Create a render error with context
    pub fn render(context: impl Into<String>, source: RenderErrorKind) -> Self {
        Self::Render {
            context: context.into(),
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a compare-side invariant violation
    pub fn compare_invariant(message: impl Into<String>) -> Self {
        Self::compare(
            "programming defect",
            CompareErrorKind::InvariantViolation(message.into()),
        )
    }

    /// Create a render-side invariant violation
    pub fn render_invariant(message: impl Into<String>) -> Self {
        Self::render(
            "programming defect",
            RenderErrorKind::InvariantViolation(message.into()),
        )
    }
}

impl From<std::fmt::Error> for DeepDiffError {
    fn from(err: std::fmt::Error) -> Self {
        Self::render("writing output", RenderErrorKind::Format(err))
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to the error's existing context,
/// creating a chain that shows the path through the code.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (lazy evaluation).
    ///
    /// The closure is only called if the result is an error, which is more
    /// efficient when the context string is expensive to compute.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<DeepDiffError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: DeepDiffError, new_ctx: &str) -> DeepDiffError {
    match err {
        DeepDiffError::Compare {
            context: existing,
            source,
        } => DeepDiffError::Compare {
            context: chain_context(new_ctx, &existing),
            source,
        },
        DeepDiffError::Render {
            context: existing,
            source,
        } => DeepDiffError::Render {
            context: chain_context(new_ctx, &existing),
            source,
        },
        DeepDiffError::Config(msg) => DeepDiffError::Config(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
