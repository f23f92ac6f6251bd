use thiserror::Error;

// ---------------------------------------------------------------------------
// Pipeline error taxonomy
// ---------------------------------------------------------------------------

/// Every way a profile analysis can fail.  One variant per pipeline stage;
/// the boundary layer turns any of them into a single error message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// The uploaded table is empty or its first column is not numeric.
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// The profile is numerically degenerate for a statistic (e.g. too short).
    #[error("Computation error: {0}")]
    Computation(String),

    /// Filtering, spectral estimation, drawing or PNG encoding failed.
    #[error("Render error: {0}")]
    Render(String),
}

impl ProfileError {
    pub fn data_format(msg: impl Into<String>) -> Self {
        ProfileError::DataFormat(msg.into())
    }

    pub fn computation(msg: impl Into<String>) -> Self {
        ProfileError::Computation(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        ProfileError::Render(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ProfileError>;
