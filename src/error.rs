use thiserror::Error;

/// Aggregates every failure mode exposed by the relay.
///
/// Configuration and lookup errors are raised synchronously by constructors, the
/// [`crate::factory::ProviderFactory`] and the [`crate::registry::ProviderRegistry`].
/// Transport, status and format errors surface from a generation call after the HTTP
/// exchange. None of them are retried by the crate.
#[derive(Debug, Error)]
pub enum LLMError {
    /// Raised when building or validating configuration fails.
    #[error("invalid configuration for {field}: {reason}")]
    InvalidConfig {
        /// Name of the configuration field that failed validation.
        field: String,
        /// Additional context explaining why the field is invalid.
        reason: String,
    },
    /// An argument passed to the factory or registry was empty or otherwise unusable.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
    /// A provider id or scenario could not be resolved.
    #[error("not found: {message}")]
    NotFound { message: String },
    /// Represents networking failures that produced no HTTP status.
    #[error("transport error: {message}")]
    Transport { message: String },
    /// The vendor answered with a non-success HTTP status.
    #[error("API request failed with status code {status}. Response: {body}")]
    Status {
        /// Numeric HTTP status code.
        status: u16,
        /// Raw response body, kept verbatim for debugging.
        body: String,
    },
    /// The response body did not match the shape the adapter expects.
    #[error("unexpected response format from {provider}: {message}. Response: {body}")]
    Format {
        /// Name of the provider, such as `OpenAI`.
        provider: &'static str,
        /// What was missing or malformed.
        message: String,
        /// Raw response body.
        body: String,
    },
    /// Signals that the request payload could not be serialized.
    #[error("invalid request: {message}")]
    Validation { message: String },
}

impl LLMError {
    /// Creates an [`LLMError::Transport`] from a textual description.
    ///
    /// # Examples
    ///
    /// ```
    /// use llm_relay::error::LLMError;
    ///
    /// let err = LLMError::transport("dns lookup failed");
    /// assert!(matches!(err, LLMError::Transport { .. }));
    /// ```
    pub fn transport<T: Into<String>>(message: T) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an [`LLMError::NotFound`].
    pub fn not_found<T: Into<String>>(message: T) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates an [`LLMError::InvalidArgument`].
    pub fn invalid_argument<T: Into<String>>(message: T) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an [`LLMError::InvalidConfig`] for the named field.
    pub fn invalid_config<F: Into<String>, R: Into<String>>(field: F, reason: R) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`LLMError::Format`] carrying the raw body that failed to match.
    ///
    /// # Examples
    ///
    /// ```
    /// use llm_relay::error::LLMError;
    ///
    /// let err = LLMError::format("OpenAI", "missing output", "{}");
    /// assert!(err.to_string().contains("missing output"));
    /// ```
    pub fn format<M: Into<String>, B: Into<String>>(
        provider: &'static str,
        message: M,
        body: B,
    ) -> Self {
        Self::Format {
            provider,
            message: message.into(),
            body: body.into(),
        }
    }
}

/// Rejects empty or whitespace-only configuration values.
pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), LLMError> {
    if value.trim().is_empty() {
        Err(LLMError::invalid_config(field, "must not be empty"))
    } else {
        Ok(())
    }
}
