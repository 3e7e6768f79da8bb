/// Keyword generation errors.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generation request to {provider} failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("malformed model response: {reason}")]
    MalformedResponse { reason: String },

    #[error("model returned no usable text")]
    EmptyResponse,
}
