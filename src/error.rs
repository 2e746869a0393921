use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The key has bits set above the configured width.
    #[error("key {key:#x} does not fit in {bits} bits")]
    KeyOutOfRange { key: u64, bits: u32 },

    #[error("key width must be between 1 and 64 bits, got {0}")]
    InvalidKeyBits(u32),

    /// Node or leaf storage ran out of `u32` indices.
    #[error("trie storage is full: at most {} slots are addressable", u32::MAX)]
    CapacityExceeded,
}
