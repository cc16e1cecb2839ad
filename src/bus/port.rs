use bytes::{BufMut, BytesMut};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    time::sleep,
};
use tracing::{debug, instrument, trace, warn};

use super::{
    error::{Error, Result},
    timing::LineTiming,
};
use crate::{
    line::{set_serial_mode, LineDriver, SerialMode},
    opcode::{Opcode, OpcodeTable},
};

/// A serial stream shared with other boards through a half-duplex
/// transceiver.
///
/// The port owns the transceiver lines and switches them around each
/// transmission: the driver is enabled only while a frame is on the wire and
/// the bus is handed back to the other boards once the last bit is out.
#[derive(Debug)]
pub struct HalfDuplexPort<L, S> {
    lines: L,
    stream: S,
    timing: LineTiming,
}

impl<L, S> HalfDuplexPort<L, S>
where
    L: LineDriver,
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(lines: L, stream: S, timing: LineTiming) -> HalfDuplexPort<L, S> {
        HalfDuplexPort {
            lines,
            stream,
            timing,
        }
    }

    pub fn set_mode(&mut self, mode: SerialMode) -> Result<()> {
        switch(&mut self.lines, mode)
    }

    pub fn listen(&mut self) -> Result<()> {
        self.set_mode(SerialMode::Receive)
    }

    /// Send a frame made of `opcode` followed by `payload`, then return the
    /// transceiver to `Receive`.
    ///
    /// The transceiver is switched back even when the write fails, and when
    /// the returned future is dropped before it completes. A write error
    /// takes precedence over a line error. Opcodes without an origin, like
    /// the v2 sentinel, are refused before the lines are touched.
    #[instrument(skip_all, fields(opcode = %opcode, len = payload.len() + 1))]
    pub async fn transmit(&mut self, opcode: Opcode, payload: &[u8]) -> Result<()> {
        if opcode.origin().is_none() {
            return Err(Error::NotACommand(opcode.name()));
        }

        let mut frame = BytesMut::with_capacity(payload.len() + 1);
        frame.put_u8(opcode.into());
        frame.put_slice(payload);

        self.set_mode(SerialMode::Send)?;
        let guard = SendGuard::new(&mut self.lines);
        let written = write_frame(&mut self.stream, &frame).await;
        if written.is_ok() {
            let drain = self.timing.drain_time(frame.len());
            trace!(?drain, "Waiting for frame to leave the line");
            sleep(drain).await;
        }
        let restored = guard.release();

        if let Err(e) = written {
            warn!(error = %e, "Failed to write frame");
            return Err(e);
        }
        restored
    }

    /// Read the next byte from the bus in the current mode.
    pub async fn read_byte(&mut self) -> Result<u8> {
        let mut buf = [0u8];
        match self.stream.read(&mut buf).await? {
            0 => Err(Error::Closed),
            _ => Ok(buf[0]),
        }
    }

    /// Turn the transceiver off and hand back the lines and stream.
    pub fn shutdown(mut self) -> Result<(L, S)> {
        self.set_mode(SerialMode::Off)?;
        let HalfDuplexPort { lines, stream, .. } = self;
        Ok((lines, stream))
    }
}

fn switch<L: LineDriver>(lines: &mut L, mode: SerialMode) -> Result<()> {
    debug!(%mode, "Switching transceiver mode");
    set_serial_mode(lines, mode).map_err(Error::Lines)
}

async fn write_frame<S: AsyncWrite + Unpin>(stream: &mut S, frame: &[u8]) -> Result<()> {
    stream.write_all(frame).await?;
    stream.flush().await?;
    Ok(())
}

/// Holds the transceiver in `Send` and puts it back into `Receive` when
/// released or dropped.
struct SendGuard<'a, L: LineDriver> {
    lines: Option<&'a mut L>,
}

impl<'a, L: LineDriver> SendGuard<'a, L> {
    fn new(lines: &'a mut L) -> SendGuard<'a, L> {
        SendGuard { lines: Some(lines) }
    }

    fn release(mut self) -> Result<()> {
        match self.lines.take() {
            Some(lines) => switch(lines, SerialMode::Receive),
            None => Ok(()),
        }
    }
}

impl<'a, L: LineDriver> Drop for SendGuard<'a, L> {
    fn drop(&mut self) {
        if let Some(lines) = self.lines.take() {
            warn!("Transmission abandoned, releasing the bus");
            if let Err(e) = switch(lines, SerialMode::Receive) {
                warn!(error = %e, "Unable to release the bus: {}", e);
            }
        }
    }
}
