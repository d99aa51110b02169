//! Error types for the synthetic board emulator.

use thiserror::Error;

/// Errors that can occur while building or operating synthetic boards.
#[derive(Error, Debug)]
pub enum Hm2TestError {
    #[error("Unknown test pattern: {0}")]
    UnknownPattern(u8),

    #[error("Registration failed: {0}")]
    Registration(String),

    #[error("Access out of range: address 0x{addr:08X}, length {len}")]
    OutOfRange { addr: u32, len: usize },

    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),

    #[error("Invalid board slot: {0}")]
    InvalidSlot(usize),

    #[error("Board slot already occupied: {0}")]
    SlotOccupied(usize),

    #[error("No board in slot: {0}")]
    EmptySlot(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for synthetic board operations.
pub type Hm2TestResult<T> = Result<T, Hm2TestError>;
