use std::{io, path::Path};

use gpiod::{Active, Chip, LineId, Lines, Options, Output};
use tracing::debug;

use super::{traits::LineDriver, SerialMode};

const GPIO_CONSUMER: &'static str = "ledbus";

/// One output line and the level that counts as active on this board.
#[derive(Debug, Clone, Copy)]
pub struct LineSpec {
    pub id: LineId,
    pub active_low: bool,
}

fn request_output(chip: &Chip, line: LineSpec, initial: bool) -> io::Result<Lines<Output>> {
    let active = if line.active_low {
        Active::Low
    } else {
        Active::High
    };
    chip.request_lines(
        Options::output([line.id])
            .active(active)
            .values([initial])
            .consumer(GPIO_CONSUMER),
    )
}

/// Transceiver control lines on a Linux GPIO character device.
///
/// Both lines start out at the `Off` levels, so the driver stays disabled
/// until a mode is set.
pub struct GpioLines {
    direction: Lines<Output>,
    enable: Lines<Output>,
}

impl GpioLines {
    pub fn new(
        chip: impl AsRef<Path>,
        direction: LineSpec,
        enable: LineSpec,
    ) -> io::Result<GpioLines> {
        let chip = Chip::new(chip)?;
        let initial = SerialMode::Off.levels();
        let direction = request_output(&chip, direction, initial.direction)?;
        let enable = request_output(&chip, enable, initial.enable)?;
        debug!(chip = %chip.name(), "Requested transceiver control lines");
        Ok(GpioLines { direction, enable })
    }
}

impl LineDriver for GpioLines {
    fn set_direction_line(&mut self, level: bool) -> io::Result<()> {
        self.direction.set_values([level])
    }

    fn set_enable_line(&mut self, level: bool) -> io::Result<()> {
        self.enable.set_values([level])
    }
}
