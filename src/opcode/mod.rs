//! Opcodes carried in the first byte of every bus frame.
//!
//! Two revisions of the table exist and they disagree on every code. Both are
//! compiled so each can be checked on its own, but a build puts exactly one of
//! them on the wire: the one selected by the `opcodes-v1` or `opcodes-v2`
//! feature, re-exported here as [`Opcode`].

mod error;
pub mod v1;
pub mod v2;

use std::fmt::{Debug, Display};

use nom::{combinator::map_res, number::streaming::u8, IResult};

pub use error::{Error, Result};

#[cfg(all(feature = "opcodes-v1", feature = "opcodes-v2"))]
compile_error!(
    "features `opcodes-v1` and `opcodes-v2` are mutually exclusive, \
     boards built against different opcode tables cannot share a bus"
);

#[cfg(not(any(feature = "opcodes-v1", feature = "opcodes-v2")))]
compile_error!("select an opcode table with the `opcodes-v1` or `opcodes-v2` feature");

#[cfg(feature = "opcodes-v1")]
pub use v1::Opcode;

#[cfg(all(feature = "opcodes-v2", not(feature = "opcodes-v1")))]
pub use v2::Opcode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRevision {
    V1,
    V2,
}

impl Display for TableRevision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableRevision::V1 => f.write_str("v1"),
            TableRevision::V2 => f.write_str("v2"),
        }
    }
}

/// The side of the bus that sends an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Master,
    Board,
}

impl Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Master => f.write_str("master"),
            Origin::Board => f.write_str("board"),
        }
    }
}

pub trait OpcodeTable:
    Copy + Eq + Debug + Display + Into<u8> + TryFrom<u8, Error = Error> + 'static
{
    const REVISION: TableRevision;

    /// Every opcode of the table, in ascending code order.
    const ALL: &'static [Self];

    fn name(&self) -> &'static str;

    /// `None` for entries that are never sent, like the v2 sentinel.
    fn origin(&self) -> Option<Origin>;
}

/// Find the table entry whose code is `value`.
pub(crate) fn decode<T: OpcodeTable>(value: u8) -> Result<T> {
    T::ALL
        .iter()
        .copied()
        .find(|op| Into::<u8>::into(*op) == value)
        .ok_or(Error::UnknownOpcode(value))
}

/// Find the table entry with the given symbolic name, ignoring case.
pub(crate) fn lookup_name<T: OpcodeTable>(name: &str) -> Result<T> {
    T::ALL
        .iter()
        .copied()
        .find(|op| op.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::UnknownName(name.to_owned()))
}

/// Parse the opcode byte at the head of a frame.
///
/// An empty input is reported as incomplete, so the parser can be fed from a
/// stream one byte at a time.
pub fn parse_header<T: OpcodeTable>(input: &[u8]) -> IResult<&[u8], T> {
    map_res(u8, |byte: u8| T::try_from(byte))(input)
}

pub(crate) const fn codes_are_unique(codes: &[u8]) -> bool {
    let mut i = 0;
    while i < codes.len() {
        let mut j = i + 1;
        while j < codes.len() {
            if codes[i] == codes[j] {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

pub(crate) const fn codes_within(codes: &[u8], low: u8, high: u8) -> bool {
    let mut i = 0;
    while i < codes.len() {
        if codes[i] < low || codes[i] > high {
            return false;
        }
        i += 1;
    }
    true
}
