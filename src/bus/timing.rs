use std::time::Duration;

use super::error::{Error, Result};

const DEFAULT_BAUD: u32 = 500_000;
const DEFAULT_BITS_PER_BYTE: u32 = 10;
const DEFAULT_TURNAROUND_GUARD: Duration = Duration::from_micros(50);

/// How long bytes take to leave the line after the UART accepted them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTiming {
    baud: u32,
    bits_per_byte: u32,
    turnaround_guard: Duration,
}

impl LineTiming {
    pub fn new(baud: u32, bits_per_byte: u32, turnaround_guard: Duration) -> Result<LineTiming> {
        if baud == 0 {
            return Err(Error::InvalidTiming("baud rate must be non-zero"));
        }
        if bits_per_byte == 0 {
            return Err(Error::InvalidTiming("bits per byte must be non-zero"));
        }
        Ok(LineTiming {
            baud,
            bits_per_byte,
            turnaround_guard,
        })
    }

    /// Time for `bytes` to be shifted out, rounded up to the microsecond, plus
    /// the turnaround guard.
    pub fn drain_time(&self, bytes: usize) -> Duration {
        let bits = bytes as u64 * u64::from(self.bits_per_byte);
        let micros = (bits * 1_000_000).div_ceil(u64::from(self.baud));
        Duration::from_micros(micros) + self.turnaround_guard
    }
}

impl Default for LineTiming {
    fn default() -> Self {
        LineTiming {
            baud: DEFAULT_BAUD,
            bits_per_byte: DEFAULT_BITS_PER_BYTE,
            turnaround_guard: DEFAULT_TURNAROUND_GUARD,
        }
    }
}
