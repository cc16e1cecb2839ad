mod gpio;
mod traits;

use std::{fmt::Display, io::Result, str::FromStr};

use tracing::trace;

use crate::settings::Lines;

pub use gpio::{GpioLines, LineSpec};
pub use traits::LineDriver;
#[cfg(test)]
pub use traits::MockLineDriver;

/// Electrical state of the half-duplex transceiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerialMode {
    Off,
    Send,
    Receive,
    SendReceive,
}

/// Levels of the direction and enable lines for one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineLevels {
    pub direction: bool,
    pub enable: bool,
}

impl SerialMode {
    pub const ALL: [SerialMode; 4] = [
        SerialMode::Off,
        SerialMode::Send,
        SerialMode::Receive,
        SerialMode::SendReceive,
    ];

    pub fn levels(&self) -> LineLevels {
        let (direction, enable) = match self {
            SerialMode::Off => (true, false),
            SerialMode::Send => (true, true),
            SerialMode::Receive => (false, false),
            SerialMode::SendReceive => (false, true),
        };
        LineLevels { direction, enable }
    }

    fn as_str(&self) -> &'static str {
        match self {
            SerialMode::Off => "off",
            SerialMode::Send => "send",
            SerialMode::Receive => "receive",
            SerialMode::SendReceive => "send-receive",
        }
    }
}

impl Display for SerialMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SerialMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        SerialMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown serial mode `{}`, expected off, send, receive or send-receive",
                    s
                )
            })
    }
}

pub fn open_gpio_lines(settings: &Lines) -> Result<GpioLines> {
    GpioLines::new(
        &settings.gpiochip,
        LineSpec {
            id: settings.direction_line,
            active_low: settings.direction_active_low,
        },
        LineSpec {
            id: settings.enable_line,
            active_low: settings.enable_active_low,
        },
    )
}

/// Drive the transceiver lines into `mode`.
///
/// The result depends on `mode` alone. When entering `Send` the direction is
/// written before the driver is enabled; every other mode writes the enable
/// line first.
pub fn set_serial_mode<L: LineDriver + ?Sized>(lines: &mut L, mode: SerialMode) -> Result<()> {
    let LineLevels { direction, enable } = mode.levels();
    trace!(%mode, direction, enable, "Setting serial mode");
    match mode {
        SerialMode::Send => {
            lines.set_direction_line(direction)?;
            lines.set_enable_line(enable)?;
        }
        SerialMode::Off | SerialMode::Receive | SerialMode::SendReceive => {
            lines.set_enable_line(enable)?;
            lines.set_direction_line(direction)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::{Error, ErrorKind};

    use mockall::{predicate::eq, Sequence};

    use super::*;
    use crate::test::LatchedLines;

    fn levels_after(modes: &[SerialMode]) -> LineLevels {
        let mut lines = LatchedLines::default();
        for mode in modes {
            set_serial_mode(&mut lines, *mode).unwrap();
        }
        lines.levels()
    }

    #[test]
    fn it_drives_the_lines_for_every_mode() {
        let expected = [
            (SerialMode::Off, true, false),
            (SerialMode::Send, true, true),
            (SerialMode::Receive, false, false),
            (SerialMode::SendReceive, false, true),
        ];
        for (mode, direction, enable) in expected {
            assert_eq!(
                levels_after(&[mode]),
                LineLevels { direction, enable },
                "mode {}",
                mode
            );
        }
    }

    #[test]
    fn it_is_idempotent() {
        for mode in SerialMode::ALL {
            assert_eq!(levels_after(&[mode, mode]), levels_after(&[mode]));
        }
    }

    #[test]
    fn it_does_not_depend_on_the_previous_mode() {
        let with_history =
            levels_after(&[SerialMode::Send, SerialMode::Off, SerialMode::SendReceive]);
        let direct = levels_after(&[SerialMode::Off, SerialMode::SendReceive]);

        assert_eq!(with_history, direct);
        assert_eq!(with_history, SerialMode::SendReceive.levels());
    }

    #[test]
    fn it_ends_in_the_same_state_from_any_starting_mode() {
        for from in SerialMode::ALL {
            for to in SerialMode::ALL {
                assert_eq!(levels_after(&[from, to]), to.levels());
            }
        }
    }

    #[test]
    fn it_sets_direction_before_enabling_the_driver_for_send() {
        let mut seq = Sequence::new();
        let mut lines = MockLineDriver::new();
        lines
            .expect_set_direction_line()
            .with(eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        lines
            .expect_set_enable_line()
            .with(eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        assert!(set_serial_mode(&mut lines, SerialMode::Send).is_ok());
    }

    #[test]
    fn it_writes_enable_first_when_leaving_send() {
        let mut seq = Sequence::new();
        let mut lines = MockLineDriver::new();
        lines
            .expect_set_enable_line()
            .with(eq(false))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        lines
            .expect_set_direction_line()
            .with(eq(false))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        assert!(set_serial_mode(&mut lines, SerialMode::Receive).is_ok());
    }

    #[test]
    fn it_propagates_line_errors() {
        let mut lines = MockLineDriver::new();
        lines
            .expect_set_enable_line()
            .returning(|_| Err(Error::new(ErrorKind::Other, "line busy")));
        lines.expect_set_direction_line().never();

        let err = set_serial_mode(&mut lines, SerialMode::Off).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }

    #[test]
    fn it_parses_mode_names() {
        assert_eq!("send-receive".parse::<SerialMode>(), Ok(SerialMode::SendReceive));
        assert_eq!("OFF".parse::<SerialMode>(), Ok(SerialMode::Off));
        assert!("transmit".parse::<SerialMode>().is_err());
    }

    #[test]
    fn it_displays_the_names_it_parses() {
        for mode in SerialMode::ALL {
            assert_eq!(mode.to_string().parse::<SerialMode>(), Ok(mode));
        }
    }
}
