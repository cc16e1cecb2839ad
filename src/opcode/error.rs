use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("byte 0x{0:02X} is not an opcode of the active table")]
    UnknownOpcode(u8),
    #[error("no opcode named `{0}` in the active table")]
    UnknownName(String),
}

pub type Result<T> = std::result::Result<T, Error>;
