//! Windows FILETIME: 100-ns intervals since 1601-01-01 UTC.

use std::fmt::Display;

use time::OffsetDateTime;
use time::macros::datetime;

const FILETIME_EPOCH: OffsetDateTime = datetime!(1601-01-01 0:00 UTC);

const NEVER_ZERO: u64 = 0;
const NEVER_MAX: u64 = 0x7FFF_FFFF_FFFF_FFFF;

/// A decoded FILETIME value: either a concrete UTC instant, or one of the
/// two sentinel values ADExplorer snapshots use to mean "no expiry".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileTime {
    Instant(i128),
    Never,
}

impl FileTime {
    /// Decodes the raw little-endian 100-ns interval count read off the wire.
    pub fn from_filetime_units(units: u64) -> Self {
        if units == NEVER_ZERO || units == NEVER_MAX {
            return FileTime::Never;
        }
        FileTime::Instant(units as i128)
    }

    /// The UTC instant this value represents, if it is not a sentinel.
    pub fn to_offset_date_time(self) -> Option<OffsetDateTime> {
        match self {
            FileTime::Never => None,
            FileTime::Instant(units) => {
                let secs = (units / 10_000_000) as i64;
                let subsec_nanos = ((units % 10_000_000) * 100) as i32;
                Some(FILETIME_EPOCH + time::Duration::new(secs, subsec_nanos))
            }
        }
    }
}

impl Display for FileTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_offset_date_time() {
            None => write!(f, "never"),
            Some(dt) => {
                let format = time::format_description::well_known::Rfc3339;
                write!(
                    f,
                    "{}",
                    dt.format(&format).map_err(|_| std::fmt::Error)?
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_max_render_as_never() {
        assert_eq!(FileTime::from_filetime_units(0), FileTime::Never);
        assert_eq!(FileTime::from_filetime_units(NEVER_MAX), FileTime::Never);
        assert_eq!(FileTime::Never.to_string(), "never");
    }

    #[test]
    fn decodes_a_known_instant() {
        // 2021-01-01T00:00:00Z in FILETIME units.
        let target = datetime!(2021-01-01 0:00 UTC);
        let units = ((target - FILETIME_EPOCH).whole_nanoseconds() / 100) as u64;
        let decoded = FileTime::from_filetime_units(units);
        assert_eq!(decoded.to_offset_date_time().unwrap(), target);
    }
}
