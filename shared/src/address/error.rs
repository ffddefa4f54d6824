use thiserror::Error;

#[derive(Debug, Error)]
pub enum AddressError {
    #[error("Burn prefixes must be 5 bytes, got {len}")]
    InvalidBurnPrefix { len: usize },

    #[error("Application data of {len} bytes exceeds the {max} bytes available")]
    DataTooLong { len: usize, max: usize },

    #[error("Failed to encode bech32 address: {0}")]
    Bech32(#[from] bech32::Error),
}
