pub type SoftmaskResult<T> = Result<T, SoftmaskError>;

#[derive(thiserror::Error, Debug)]
pub enum SoftmaskError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("geometry error: {0}")]
    Geometry(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error("image error: {0}")]
    Image(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SoftmaskError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }
}

impl From<serde_json::Error> for SoftmaskError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}
