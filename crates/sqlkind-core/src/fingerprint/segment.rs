//! Clause selection for fingerprints.

use core::fmt;
use core::str::FromStr;

use crate::error::FingerprintError;

bitflags::bitflags! {
    /// Selects which clauses contribute to a fingerprint, and whether
    /// literal values are erased.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SegmentMask: u8 {
        /// The selected columns.
        const COLUMNS = 1;
        /// FROM sources.
        const FROM = 1 << 1;
        /// JOIN clauses.
        const JOIN = 1 << 2;
        /// WHERE conditions.
        const WHERE = 1 << 3;
        /// GROUP BY items.
        const GROUP = 1 << 4;
        /// ORDER BY items.
        const ORDER = 1 << 5;
        /// Render clauses structurally, with values replaced by `?`.
        const SKIP_VALUES = 1 << 6;
        /// Every clause; does not include `SKIP_VALUES`.
        const ALL = Self::COLUMNS.bits()
            | Self::FROM.bits()
            | Self::JOIN.bits()
            | Self::WHERE.bits()
            | Self::GROUP.bits()
            | Self::ORDER.bits();
    }
}

const NAMES: &[(&str, SegmentMask)] = &[
    ("columns", SegmentMask::COLUMNS),
    ("from", SegmentMask::FROM),
    ("join", SegmentMask::JOIN),
    ("where", SegmentMask::WHERE),
    ("group", SegmentMask::GROUP),
    ("order", SegmentMask::ORDER),
    ("skip-values", SegmentMask::SKIP_VALUES),
];

impl Default for SegmentMask {
    fn default() -> Self {
        Self::ALL | Self::SKIP_VALUES
    }
}

impl FromStr for SegmentMask {
    type Err = FingerprintError;

    /// Parses a comma-separated list such as `"from,where,skip-values"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mask = Self::empty();
        for part in s.split(',') {
            let name = part.trim().to_ascii_lowercase().replace('_', "-");
            mask |= match name.as_str() {
                "all" => Self::ALL,
                "none" => Self::empty(),
                other => NAMES
                    .iter()
                    .find(|(n, _)| *n == other)
                    .map(|&(_, flag)| flag)
                    .ok_or_else(|| FingerprintError::UnknownSegment(part.trim().to_string()))?,
            };
        }
        Ok(mask)
    }
}

impl fmt::Display for SegmentMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut names = Vec::new();
        if self.contains(Self::ALL) {
            names.push("all");
        }
        for &(name, flag) in NAMES {
            let covered = self.contains(Self::ALL) && Self::ALL.contains(flag);
            if self.contains(flag) && !covered {
                names.push(name);
            }
        }
        f.write_str(&names.join(","))
    }
}
