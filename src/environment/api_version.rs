//! Engine API version pinning (`DOCKER_API_VERSION`).

use std::fmt;
use std::str::FromStr;

/// A `major.minor` engine API version such as `1.41`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    major: usize,
    minor: usize,
}

impl ApiVersion {
    /// Creates a version from its components.
    #[must_use]
    pub const fn new(major: usize, minor: usize) -> Self {
        Self { major, minor }
    }

    /// The major component.
    #[must_use]
    pub const fn major(self) -> usize {
        self.major
    }

    /// The minor component.
    #[must_use]
    pub const fn minor(self) -> usize {
        self.minor
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ApiVersion {
    type Err = String;

    /// Parses `1.41` or `v1.41`. The error is a reason suitable for
    /// `ConfigError::InvalidValue`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let version = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let invalid = || format!("expected major.minor (for example 1.41), got '{raw}'");

        let (major, minor) = version.split_once('.').ok_or_else(invalid)?;
        let major_number = major.parse::<usize>().map_err(|_| invalid())?;
        let minor_number = minor.parse::<usize>().map_err(|_| invalid())?;
        Ok(Self::new(major_number, minor_number))
    }
}
