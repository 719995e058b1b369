//! # Elapsed-time rendering.
//!
//! Reports show durations as `H:MM:SS`, with a `.ffffff` microsecond fraction when the
//! duration is not a whole number of seconds, and a `N day(s), ` prefix past 24 hours.

use std::fmt;
use std::time::Duration;

const MICROS_PER_SEC: u128 = 1_000_000;
const SECS_PER_DAY: u128 = 86_400;

/// `Display` adapter rendering a [`Duration`] as `H:MM:SS[.ffffff]`.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use waitvisor::Elapsed;
///
/// assert_eq!(Elapsed(Duration::ZERO).to_string(), "0:00:00");
/// assert_eq!(Elapsed(Duration::from_millis(200)).to_string(), "0:00:00.200000");
/// assert_eq!(Elapsed(Duration::from_secs(3725)).to_string(), "1:02:05");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Elapsed(pub Duration);

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_micros = (self.0.as_nanos() + 500) / 1_000;
        let micros = total_micros % MICROS_PER_SEC;
        let total_secs = total_micros / MICROS_PER_SEC;

        let days = total_secs / SECS_PER_DAY;
        let rem = total_secs % SECS_PER_DAY;
        let (hours, minutes, seconds) = (rem / 3600, rem % 3600 / 60, rem % 60);

        if days > 0 {
            let plural = if days == 1 { "" } else { "s" };
            write!(f, "{days} day{plural}, ")?;
        }
        write!(f, "{hours}:{minutes:02}:{seconds:02}")?;
        if micros > 0 {
            write!(f, ".{micros:06}")?;
        }
        Ok(())
    }
}
