/// Errors raised by the effects helpers.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EffectsError {
    #[error("'{input}' is not a #rrggbb colour")]
    InvalidHex { input: String },

    #[error("particle burst needs at least one colour")]
    EmptyPalette,
}

impl EffectsError {
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidHex { .. } => "parse",
            Self::EmptyPalette => "config",
        }
    }
}
