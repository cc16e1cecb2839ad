#![allow(dead_code)]

mod bus;
mod cli;
mod line;
mod logging;
mod opcode;
mod settings;
#[cfg(test)]
mod test;

use anyhow::{Context, Result};
use bus::{open_serial, HalfDuplexPort};
use cli::{Cli, Cmd, ListenCmd, SendCmd};
use line::{open_gpio_lines, set_serial_mode, GpioLines, LineDriver};
use logging::setup_logging;
use opcode::{parse_header, Opcode, OpcodeTable};
use settings::Settings;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    signal::ctrl_c,
};
use tokio_serial::SerialStream;
use tracing::{debug, info, instrument, warn};

/// The host end of an RS-485 bus of LED boards.
///
/// Every frame on the bus starts with an opcode byte. Which opcode table the
/// bytes belong to is fixed when this binary is built, and is logged at
/// startup: a host and boards built against different tables cannot talk.
///
/// ## Transceiver
///
/// The bus is half-duplex. Two GPIO lines select the transceiver mode and the
/// host only enables its driver while one of its own frames is on the wire.
/// Between frames it listens in `Receive` mode.
#[tokio::main]
async fn main() -> Result<()> {
    let cli: Cli = argh::from_env();
    let settings = Settings::new(&cli.config).context("Unable to load settings")?;
    setup_logging(settings.loglevel);
    info!(table = %Opcode::REVISION, "Using opcode table {}", Opcode::REVISION);

    match cli.cmd {
        Cmd::Mode(cmd) => {
            let mut lines = open_lines(&settings)?;
            set_serial_mode(&mut lines, cmd.mode)
                .with_context(|| format!("Unable to switch transceiver to {}", cmd.mode))?;
            info!(mode = %cmd.mode, "Transceiver switched");
            Ok(())
        }
        Cmd::Send(cmd) => send(open_port(&settings)?, cmd).await,
        Cmd::Listen(cmd) => listen(open_port(&settings)?, cmd).await,
        Cmd::Opcodes(_) => {
            print_opcodes();
            Ok(())
        }
    }
}

fn open_lines(settings: &Settings) -> Result<GpioLines> {
    open_gpio_lines(&settings.lines).with_context(|| {
        format!(
            "Unable to request transceiver lines on {}",
            settings.lines.gpiochip.display()
        )
    })
}

fn open_port(settings: &Settings) -> Result<HalfDuplexPort<GpioLines, SerialStream>> {
    let timing = settings.serial.line_timing()?;
    let lines = open_lines(settings)?;
    let stream = open_serial(&settings.serial)?;
    Ok(HalfDuplexPort::new(lines, stream, timing))
}

#[instrument(skip_all, fields(opcode = %cmd.opcode))]
async fn send(mut port: HalfDuplexPort<GpioLines, SerialStream>, cmd: SendCmd) -> Result<()> {
    port.transmit(cmd.opcode, &cmd.payload)
        .await
        .with_context(|| format!("Unable to transmit {}", cmd.opcode))?;
    info!(len = cmd.payload.len() + 1, "Frame sent");
    Ok(())
}

async fn listen<L, S>(mut port: HalfDuplexPort<L, S>, cmd: ListenCmd) -> Result<()>
where
    L: LineDriver,
    S: AsyncRead + AsyncWrite + Unpin,
{
    port.listen()?;
    info!("Listening for frames");

    let received = receive(&mut port, cmd.count).await;
    if let Err(e) = port.shutdown() {
        warn!(error = %e, "Unable to turn the transceiver off: {}", e);
    }
    received
}

async fn receive<L, S>(port: &mut HalfDuplexPort<L, S>, count: Option<usize>) -> Result<()>
where
    L: LineDriver,
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut received = 0;
    while count.map_or(true, |count| received < count) {
        let byte = tokio::select! {
            res = port.read_byte() => res?,
            _ = ctrl_c() => {
                debug!("Interrupted");
                break;
            }
        };
        received += 1;
        log_byte(byte);
    }
    Ok(())
}

/// The opcode `byte` stands for when it heads a frame.
fn header_opcode(byte: u8) -> Option<Opcode> {
    parse_header::<Opcode>(&[byte]).ok().map(|(_, opcode)| opcode)
}

fn log_byte(byte: u8) {
    match header_opcode(byte) {
        Some(opcode) => match opcode.origin() {
            Some(origin) => info!(%opcode, %origin, code = byte, "Opcode from {}", origin),
            None => debug!(%opcode, code = byte, "Sentinel byte"),
        },
        None => debug!(byte, "Data byte"),
    }
}

fn print_opcodes() {
    println!("opcode table {}", Opcode::REVISION);
    for opcode in Opcode::ALL {
        let origin = opcode
            .origin()
            .map_or_else(|| String::from("-"), |origin| origin.to_string());
        println!("  0x{:02X}  {:<16} {}", u8::from(*opcode), opcode, origin);
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        bus::LineTiming,
        test::{Event, Journal, JournalStream, LatchedLines},
    };

    use super::*;

    fn journaled_port(input: &[u8]) -> (HalfDuplexPort<LatchedLines, JournalStream>, Journal) {
        let stream = JournalStream::with_input(input);
        let journal = stream.journal();
        let lines = LatchedLines::with_journal(journal.clone());
        (
            HalfDuplexPort::new(lines, stream, LineTiming::default()),
            journal,
        )
    }

    #[test]
    fn it_decodes_header_bytes_of_the_active_table() {
        for opcode in Opcode::ALL {
            assert_eq!(header_opcode(u8::from(*opcode)), Some(*opcode));
        }
        assert_eq!(header_opcode(0xFF), None);
    }

    #[tokio::test]
    async fn it_turns_the_transceiver_off_when_the_stream_fails() {
        let (port, journal) = journaled_port(&[u8::from(Opcode::ALL[1]), 0x7F]);

        let err = listen(port, ListenCmd { count: None }).await.unwrap_err();

        assert_eq!(err.to_string(), "serial stream closed");
        assert_eq!(
            journal.events(),
            vec![
                Event::Enable(false),
                Event::Direction(false),
                Event::Enable(false),
                Event::Direction(true),
            ]
        );
    }

    #[tokio::test]
    async fn it_stops_listening_after_count_bytes() {
        let (port, journal) = journaled_port(&[0x01, 0x02, 0x03]);

        listen(port, ListenCmd { count: Some(2) }).await.unwrap();

        assert_eq!(journal.events().last(), Some(&Event::Direction(true)));
    }
}
