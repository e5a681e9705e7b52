//! Reissue Target
//!
//! Which cookies a token reissue writes.

use std::fmt;
use std::str::FromStr;

use crate::error::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReissueTarget {
    Access,
    Refresh,
    All,
}

impl ReissueTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReissueTarget::Access => "access",
            ReissueTarget::Refresh => "refresh",
            ReissueTarget::All => "all",
        }
    }

    pub fn includes_access(&self) -> bool {
        matches!(self, ReissueTarget::Access | ReissueTarget::All)
    }

    pub fn includes_refresh(&self) -> bool {
        matches!(self, ReissueTarget::Refresh | ReissueTarget::All)
    }
}

impl FromStr for ReissueTarget {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "access" => Ok(ReissueTarget::Access),
            "refresh" => Ok(ReissueTarget::Refresh),
            "all" => Ok(ReissueTarget::All),
            other => Err(AuthError::BadRequest(format!(
                "Unknown token type '{other}'; expected access, refresh or all"
            ))),
        }
    }
}

impl fmt::Display for ReissueTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
