//! Coordinate Reference System identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TilerError;

/// An `AUTHORITY:CODE` coordinate reference system identifier.
///
/// The authority is normalized to upper case, so `epsg:4326` and
/// `EPSG:4326` compare equal. Serialized as its string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CrsId {
    authority: String,
    code: String,
}

impl CrsId {
    /// WGS84 geographic coordinates (degrees).
    pub fn wgs84() -> Self {
        Self::epsg(4326)
    }

    /// Build an EPSG identifier from its numeric code.
    pub fn epsg(code: u32) -> Self {
        Self {
            authority: "EPSG".to_string(),
            code: code.to_string(),
        }
    }

    /// Parse identifiers like `EPSG:32633`, `epsg:4326` or `LOCAL:grid`.
    pub fn parse(s: &str) -> Result<Self, TilerError> {
        let trimmed = s.trim();
        let (authority, code) = trimmed
            .split_once(':')
            .ok_or_else(|| TilerError::Projection(format!("Invalid CRS identifier: '{}'", s)))?;

        let authority = authority.trim().to_uppercase();
        let code = code.trim();
        if authority.is_empty() || code.is_empty() {
            return Err(TilerError::Projection(format!(
                "Invalid CRS identifier: '{}'",
                s
            )));
        }
        if authority == "EPSG" && code.parse::<u32>().is_err() {
            return Err(TilerError::Projection(format!(
                "EPSG code must be numeric: '{}'",
                s
            )));
        }

        Ok(Self {
            authority,
            code: code.to_string(),
        })
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Numeric EPSG code, if this is an EPSG identifier.
    pub fn epsg_code(&self) -> Option<u32> {
        if self.authority == "EPSG" {
            self.code.parse().ok()
        } else {
            None
        }
    }
}

impl fmt::Display for CrsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.authority, self.code)
    }
}

impl FromStr for CrsId {
    type Err = TilerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CrsId::parse(s)
    }
}

impl TryFrom<String> for CrsId {
    type Error = TilerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CrsId::parse(&value)
    }
}

impl From<CrsId> for String {
    fn from(id: CrsId) -> Self {
        id.to_string()
    }
}
