use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("serial I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("transceiver line control failed: {0}")]
    Lines(#[source] io::Error),
    #[error("serial stream closed")]
    Closed,
    #[error("{0} is not a command and is never sent")]
    NotACommand(&'static str),
    #[error("invalid line timing: {0}")]
    InvalidTiming(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
