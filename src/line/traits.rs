use std::io::Result;

use mockall::automock;

/// The two transceiver control outputs of a board.
///
/// A level of `true` drives the line to its active state; polarity is a
/// wiring detail of the implementation.
#[automock]
pub trait LineDriver {
    fn set_direction_line(&mut self, level: bool) -> Result<()>;
    fn set_enable_line(&mut self, level: bool) -> Result<()>;
}
