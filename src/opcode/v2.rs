//! Second revision of the opcode table.
//!
//! Codes move into 0x20 to 0x3F and keep the low bits they had in v1. Zero is
//! reserved as a sentinel that never names a command. LedData, ReqInfo and
//! Info have no v2 code.

use std::{fmt::Display, str::FromStr};

use super::{
    codes_are_unique, codes_within, decode, lookup_name, Error, OpcodeTable, Origin,
    TableRevision,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    Unused = 0x00,
    ResetId = 0x21,
    RequestId = 0x22,
    OfferId = 0x23,
    PingFromMaster = 0x24,
    PongToMaster = 0x25,
    OfferSeqNo = 0x26,
    ReqSensor = 0x31,
    SensorData = 0x32,
    DebugData = 0x3F,
}

const ENTRIES: [Opcode; 10] = [
    Opcode::Unused,
    Opcode::ResetId,
    Opcode::RequestId,
    Opcode::OfferId,
    Opcode::PingFromMaster,
    Opcode::PongToMaster,
    Opcode::OfferSeqNo,
    Opcode::ReqSensor,
    Opcode::SensorData,
    Opcode::DebugData,
];

// Codes of the commands, without the sentinel.
const fn command_codes() -> [u8; 9] {
    let mut codes = [0; 9];
    let mut i = 1;
    while i < ENTRIES.len() {
        codes[i - 1] = ENTRIES[i] as u8;
        i += 1;
    }
    codes
}

const COMMAND_CODES: [u8; 9] = command_codes();

const _: () = assert!(Opcode::Unused as u8 == 0x00, "v2 sentinel must be zero");
const _: () = assert!(
    codes_are_unique(&COMMAND_CODES),
    "v2 opcodes must be pairwise distinct"
);
const _: () = assert!(
    codes_within(&COMMAND_CODES, 0x20, 0x3F),
    "v2 opcodes must stay within 0x20..=0x3F"
);

impl Opcode {
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Opcode::Unused)
    }
}

impl OpcodeTable for Opcode {
    const REVISION: TableRevision = TableRevision::V2;
    const ALL: &'static [Self] = &ENTRIES;

    fn name(&self) -> &'static str {
        match self {
            Opcode::Unused => "UNUSED",
            Opcode::ResetId => "ResetID",
            Opcode::RequestId => "RequestID",
            Opcode::OfferId => "OfferID",
            Opcode::PingFromMaster => "PingFromMaster",
            Opcode::PongToMaster => "PongToMaster",
            Opcode::OfferSeqNo => "OfferSeqNo",
            Opcode::ReqSensor => "ReqSensor",
            Opcode::SensorData => "SensorData",
            Opcode::DebugData => "DebugData",
        }
    }

    fn origin(&self) -> Option<Origin> {
        match self {
            Opcode::Unused => None,
            Opcode::ResetId
            | Opcode::OfferId
            | Opcode::PingFromMaster
            | Opcode::OfferSeqNo
            | Opcode::ReqSensor => Some(Origin::Master),
            Opcode::RequestId
            | Opcode::PongToMaster
            | Opcode::SensorData
            | Opcode::DebugData => Some(Origin::Board),
        }
    }
}

impl From<Opcode> for u8 {
    fn from(val: Opcode) -> Self {
        val as u8
    }
}

impl TryFrom<u8> for Opcode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        decode(value)
    }
}

impl FromStr for Opcode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup_name(s)
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}
