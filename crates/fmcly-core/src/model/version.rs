// ── Controller software version ──

use std::fmt;

/// `major.minor.patch` as reported by the controller. Missing or
/// non-numeric trailing components count as zero; build suffixes such as
/// `6.6.0 (build 90)` are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ControllerVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ControllerVersion {
    /// FQDN network objects appeared in 6.4.
    pub const FQDN_OBJECTS: Self = Self::new(6, 4, 0);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string; `None` when the major component is not numeric.
    pub fn parse(raw: &str) -> Option<Self> {
        let head = raw.split_whitespace().next()?;
        let mut parts = head.split('.').map(leading_number);
        let major = parts.next().flatten()?;
        let minor = parts.next().flatten().unwrap_or(0);
        let patch = parts.next().flatten().unwrap_or(0);
        Some(Self::new(major, minor, patch))
    }

    pub fn supports_fqdn_objects(self) -> bool {
        self >= Self::FQDN_OBJECTS
    }
}

fn leading_number(part: &str) -> Option<u32> {
    let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

impl fmt::Display for ControllerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
