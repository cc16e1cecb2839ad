//! First revision of the opcode table, codes 0x01 to 0x1F.

use std::{fmt::Display, str::FromStr};

use super::{
    codes_are_unique, codes_within, decode, lookup_name, Error, OpcodeTable, Origin,
    TableRevision,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Master forces boards to drop their ID.
    ResetId = 0x01,
    /// Board asks the master for an ID.
    RequestId = 0x02,
    /// Master offers a new ID.
    OfferId = 0x03,
    PingFromMaster = 0x04,
    PongToMaster = 0x05,
    /// Master offers a bus sequence number.
    OfferSeqNo = 0x06,
    LedData = 0x10,
    /// Master asks for the current sensor value.
    ReqSensor = 0x11,
    SensorData = 0x12,
    /// Master asks for board information (version, ID).
    ReqInfo = 0x1D,
    Info = 0x1E,
    DebugData = 0x1F,
}

const ENTRIES: [Opcode; 12] = [
    Opcode::ResetId,
    Opcode::RequestId,
    Opcode::OfferId,
    Opcode::PingFromMaster,
    Opcode::PongToMaster,
    Opcode::OfferSeqNo,
    Opcode::LedData,
    Opcode::ReqSensor,
    Opcode::SensorData,
    Opcode::ReqInfo,
    Opcode::Info,
    Opcode::DebugData,
];

const fn codes() -> [u8; 12] {
    let mut codes = [0; 12];
    let mut i = 0;
    while i < ENTRIES.len() {
        codes[i] = ENTRIES[i] as u8;
        i += 1;
    }
    codes
}

const CODES: [u8; 12] = codes();

const _: () = assert!(codes_are_unique(&CODES), "v1 opcodes must be pairwise distinct");
const _: () = assert!(
    codes_within(&CODES, 0x01, 0x1F),
    "v1 opcodes must stay within 0x01..=0x1F"
);

impl OpcodeTable for Opcode {
    const REVISION: TableRevision = TableRevision::V1;
    const ALL: &'static [Self] = &ENTRIES;

    fn name(&self) -> &'static str {
        match self {
            Opcode::ResetId => "ResetID",
            Opcode::RequestId => "RequestID",
            Opcode::OfferId => "OfferID",
            Opcode::PingFromMaster => "PingFromMaster",
            Opcode::PongToMaster => "PongToMaster",
            Opcode::OfferSeqNo => "OfferSeqNo",
            Opcode::LedData => "LedData",
            Opcode::ReqSensor => "ReqSensor",
            Opcode::SensorData => "SensorData",
            Opcode::ReqInfo => "ReqInfo",
            Opcode::Info => "Info",
            Opcode::DebugData => "DebugData",
        }
    }

    fn origin(&self) -> Option<Origin> {
        match self {
            Opcode::ResetId
            | Opcode::OfferId
            | Opcode::PingFromMaster
            | Opcode::OfferSeqNo
            | Opcode::LedData
            | Opcode::ReqSensor
            | Opcode::ReqInfo => Some(Origin::Master),
            Opcode::RequestId
            | Opcode::PongToMaster
            | Opcode::SensorData
            | Opcode::Info
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
