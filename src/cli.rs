use argh::FromArgs;

use crate::{line::SerialMode, opcode::Opcode};

#[derive(FromArgs, Debug)]
/// Drive the RS-485 LED board bus transceiver.
pub struct Cli {
    /// settings file, extension optional
    #[argh(option, default = "String::from(\"config\")")]
    pub config: String,

    #[argh(subcommand)]
    pub cmd: Cmd,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
pub enum Cmd {
    Mode(ModeCmd),
    Send(SendCmd),
    Listen(ListenCmd),
    Opcodes(OpcodesCmd),
}

#[derive(FromArgs, Debug)]
/// Put the transceiver into a mode and exit.
#[argh(subcommand, name = "mode")]
pub struct ModeCmd {
    /// off, send, receive or send-receive
    #[argh(positional)]
    pub mode: SerialMode,
}

#[derive(FromArgs, Debug)]
/// Transmit one frame: an opcode followed by payload bytes.
#[argh(subcommand, name = "send")]
pub struct SendCmd {
    /// opcode name from the active table, e.g. PingFromMaster
    #[argh(positional)]
    pub opcode: Opcode,

    /// payload bytes in hex, e.g. 0x1f or 1f
    #[argh(positional, from_str_fn(parse_hex_byte))]
    pub payload: Vec<u8>,
}

#[derive(FromArgs, Debug)]
/// Receive and log bytes from the bus.
#[argh(subcommand, name = "listen")]
pub struct ListenCmd {
    /// stop after this many bytes
    #[argh(option)]
    pub count: Option<usize>,
}

#[derive(FromArgs, Debug)]
/// Print the opcode table this build speaks.
#[argh(subcommand, name = "opcodes")]
pub struct OpcodesCmd {}

fn parse_hex_byte(value: &str) -> Result<u8, String> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u8::from_str_radix(digits, 16)
        .map_err(|e| format!("invalid payload byte `{}`: {}", value, e))
}
