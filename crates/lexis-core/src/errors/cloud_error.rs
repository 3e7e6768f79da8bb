/// Google Cloud REST transport errors.
#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    #[error("network error: {reason}")]
    Network { reason: String },

    #[error("request rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("response decode failed: {reason}")]
    Decode { reason: String },
}
