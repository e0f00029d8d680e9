use std::fmt;

/// Time of day parsed from a DICOM TM value (e.g. AcquisitionTime)
///
/// Stored as microseconds since midnight so values compare numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct AcquisitionTime {
    micros: u64,
}

impl AcquisitionTime {
    /// Creates a time from its components
    pub fn from_hms_micro(hour: u32, minute: u32, second: u32, micro: u32) -> Self {
        Self {
            micros: ((u64::from(hour) * 60 + u64::from(minute)) * 60 + u64::from(second))
                * 1_000_000
                + u64::from(micro),
        }
    }

    /// Parses a TM value
    ///
    /// Accepts `HH`, `HHMM`, `HHMMSS` and `HHMMSS.F` up to six fraction
    /// digits, as well as the ACR-NEMA form `HH:MM:SS.F`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a valid time of day
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let (clock, fraction) = match s.split_once('.') {
            Some((clock, fraction)) => (clock, fraction),
            None => (s, ""),
        };
        let digits: String = clock.chars().filter(|c| *c != ':').collect();

        if digits.is_empty()
            || digits.len() % 2 != 0
            || digits.len() > 6
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(format!("Failed to parse time from '{}'", s));
        }
        if fraction.len() > 6 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("Invalid fractional seconds in '{}'", s));
        }

        let component = |i: usize| -> u32 {
            digits
                .get(i..i + 2)
                .and_then(|c| c.parse().ok())
                .unwrap_or(0)
        };
        let (hour, minute, second) = (component(0), component(2), component(4));
        // leap second 60 is legal in TM
        if hour > 23 || minute > 59 || second > 60 {
            return Err(format!("Time out of range in '{}'", s));
        }

        let micro = if fraction.is_empty() {
            0
        } else {
            format!("{:0<6}", fraction)
                .parse::<u32>()
                .map_err(|e| format!("Invalid fractional seconds in '{}': {}", s, e))?
        };

        Ok(Self::from_hms_micro(hour, minute, second, micro))
    }

    /// Microseconds since midnight
    pub fn as_micros(&self) -> u64 {
        self.micros
    }
}

impl fmt::Display for AcquisitionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_seconds = self.micros / 1_000_000;
        write!(
            f,
            "{:02}{:02}{:02}.{:06}",
            total_seconds / 3600,
            (total_seconds / 60) % 60,
            total_seconds % 60,
            self.micros % 1_000_000
        )
    }
}
