mod error;
mod port;
mod timing;

use anyhow::{Context, Result as AnyResult};
use tokio_serial::{DataBits, Parity, SerialPortBuilderExt, SerialStream, StopBits};

pub use error::Result;
pub use port::HalfDuplexPort;
pub use timing::LineTiming;

use crate::settings::Serial;

/// Open the RS-485 UART as 8N1 at the configured rate.
pub fn open_serial(settings: &Serial) -> AnyResult<SerialStream> {
    let device = settings.device.to_string_lossy();
    tokio_serial::new(device.as_ref(), settings.baud)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .open_native_async()
        .with_context(|| format!("Unable to open serial device {}", device))
}
