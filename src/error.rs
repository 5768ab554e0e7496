use kstring::KString;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    /// The element tree is misused: rendered outside of a `Figure`,
    /// bound to the wrong kind of node, attached twice, etc.
    #[error("structural error: {0}")]
    Structural(KString),
    #[error("node id from another document used: {0}")]
    ForeignNode(KString),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RenderError {
    pub fn structural(msg: impl Into<String>) -> Self {
        RenderError::Structural(KString::from_string(msg.into()))
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, RenderError::Structural(_))
    }
}

/// Like `anyhow::bail!`, returning a `RenderError::Structural`.
#[macro_export]
macro_rules! structural_bail {
    ($formatstr:expr $(,$arg:expr)*) => {
        return Err($crate::error::RenderError::structural(
            format!($formatstr $(,$arg)*)))
    }
}
