#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error("Unknown field `{field}` for resource {resource}")]
    UnknownField { resource: &'static str, field: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
