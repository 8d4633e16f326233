use crate::error::UnknownPlacetype;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Administrative level of a boundary, doubling as the name of its layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placetype {
    Country,
    Region,
    County,
    Locality,
    LocalAdmin,
    Neighbourhood,
}

impl Placetype {
    /// All layers, country first.
    pub fn all() -> &'static [Placetype] {
        &[
            Placetype::Country,
            Placetype::Region,
            Placetype::County,
            Placetype::Locality,
            Placetype::LocalAdmin,
            Placetype::Neighbourhood,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Placetype::Country => "country",
            Placetype::Region => "region",
            Placetype::County => "county",
            Placetype::Locality => "locality",
            Placetype::LocalAdmin => "localadmin",
            Placetype::Neighbourhood => "neighbourhood",
        }
    }

    /// Name of the admin field a document carries for this level.
    pub fn admin_field(&self) -> &'static str {
        match self {
            Placetype::Country => "admin0",
            Placetype::Region => "admin1",
            Placetype::County => "admin2",
            Placetype::Locality => "locality",
            Placetype::LocalAdmin => "local_admin",
            Placetype::Neighbourhood => "neighbourhood",
        }
    }
}

impl fmt::Display for Placetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Placetype {
    type Err = UnknownPlacetype;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Placetype::all()
            .iter()
            .find(|placetype| placetype.as_str() == s.trim())
            .copied()
            .ok_or_else(|| UnknownPlacetype(s.to_string()))
    }
}
