//! Generation error types.
//!
//! An unconstructible type is *not* an error: it yields `Value::Null` and the
//! caller carries on. Everything below terminates the enclosing call and
//! propagates to the top-level caller unchanged.

/// Structured errors raised while generating a value.
#[derive(Debug)]
pub enum GenerateError {
    /// Assigning or accumulating into a member failed.
    Population {
        /// Member path, `"<TypeName>.<MemberName>"`
        path: String,
        /// Underlying failure from the setter or `add` method
        source: anyhow::Error,
    },

    /// A custom constructor body failed, or no usable constructor exists for a
    /// strategy that requires one.
    Construction {
        /// Type being constructed
        type_name: String,
        source: anyhow::Error,
    },

    /// Enum selection had no values left after exclusion.
    EnumExhausted {
        /// Enum type name
        type_name: String,
    },

    /// Lower bound is greater than the upper bound.
    InvalidRange {
        /// Lower bound, formatted
        min: String,
        /// Upper bound, formatted
        max: String,
    },

    /// Any other invalid argument to the random source or the configuration.
    InvalidArgument {
        /// Argument name
        name: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// Recursion reached the configured `max_depth`.
    DepthExceeded {
        /// Type requested at the limit
        type_name: String,
        /// Configured limit
        max_depth: usize,
    },
}

impl GenerateError {
    pub fn population(path: impl Into<String>, source: anyhow::Error) -> Self {
        GenerateError::Population {
            path: path.into(),
            source,
        }
    }

    pub fn construction(type_name: impl Into<String>, source: anyhow::Error) -> Self {
        GenerateError::Construction {
            type_name: type_name.into(),
            source,
        }
    }

    pub fn invalid_range<T: std::fmt::Display>(min: T, max: T) -> Self {
        GenerateError::InvalidRange {
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    pub fn invalid_argument(name: &'static str, message: impl Into<String>) -> Self {
        GenerateError::InvalidArgument {
            name,
            message: message.into(),
        }
    }

    /// True for the argument-error family (exhausted enum, invalid range, invalid argument).
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            GenerateError::EnumExhausted { .. }
                | GenerateError::InvalidRange { .. }
                | GenerateError::InvalidArgument { .. }
        )
    }

    /// Member path of a population failure.
    pub fn member_path(&self) -> Option<&str> {
        match self {
            GenerateError::Population { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::Population { path, source } => {
                write!(f, "failed to populate member '{}': {}", path, source)
            }
            GenerateError::Construction { type_name, source } => {
                write!(f, "failed to construct '{}': {}", type_name, source)
            }
            GenerateError::EnumExhausted { type_name } => write!(
                f,
                "there are no values of '{}' left after exclusion to choose from",
                type_name
            ),
            GenerateError::InvalidRange { min, max } => {
                write!(f, "invalid range: min ({}) must not exceed max ({})", min, max)
            }
            GenerateError::InvalidArgument { name, message } => {
                write!(f, "invalid argument '{}': {}", name, message)
            }
            GenerateError::DepthExceeded {
                type_name,
                max_depth,
            } => write!(
                f,
                "maximum generation depth {} exceeded while generating '{}' (exclude a member to break the cycle)",
                max_depth, type_name
            ),
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerateError::Population { source, .. } | GenerateError::Construction { source, .. } => {
                Some(&**source)
            }
            _ => None,
        }
    }
}

pub type GenerateResult<T> = std::result::Result<T, GenerateError>;
