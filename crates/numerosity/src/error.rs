use thiserror::Error;

pub type Result<T> = std::result::Result<T, StimulusError>;

/// Error type shared by the packer, the scheduler and the pair builder.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StimulusError {
    #[error("invalid configuration: {reason}")]
    Configuration { reason: String },

    #[error(
        "packing infeasible: placed {placed} of {requested} dots, \
         next dot found no free spot in {attempts} attempts"
    )]
    PackingInfeasible {
        requested: usize,
        placed: usize,
        attempts: u32,
    },

    #[error("invalid pair request: {reason}")]
    InvalidPairRequest { reason: String },
}

impl StimulusError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    pub(crate) fn request(reason: impl Into<String>) -> Self {
        Self::InvalidPairRequest {
            reason: reason.into(),
        }
    }
}
