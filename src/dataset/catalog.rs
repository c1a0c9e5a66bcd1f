//! Borough catalog
//!
//! The fixed mapping between NYC borough codes and their canonical names.
//! This is the only place the five codes are known; every lookup in the
//! crate goes through [`Borough`].

use serde::{Serialize, Serializer};

/// One of the five NYC boroughs, discriminant = dataset borough code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Borough {
    Manhattan = 1,
    Bronx = 2,
    Brooklyn = 3,
    Queens = 4,
    StatenIsland = 5,
}

impl Borough {
    /// Every borough in code order
    pub const ALL: [Borough; 5] = [
        Borough::Manhattan,
        Borough::Bronx,
        Borough::Brooklyn,
        Borough::Queens,
        Borough::StatenIsland,
    ];

    /// Look up a borough by its dataset code (1-5)
    pub fn from_code(code: u8) -> Option<Borough> {
        Self::ALL.iter().copied().find(|b| b.code() == code)
    }

    /// Look up a borough by name.
    ///
    /// Matches the canonical names, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Borough> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|b| b.name().eq_ignore_ascii_case(name))
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Canonical name, as used by the dropdown and the boundary document
    pub fn name(self) -> &'static str {
        match self {
            Borough::Manhattan => "Manhattan",
            Borough::Bronx => "Bronx",
            Borough::Brooklyn => "Brooklyn",
            Borough::Queens => "Queens",
            Borough::StatenIsland => "Staten Island",
        }
    }
}

impl std::fmt::Display for Borough {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Borough {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for borough in Borough::ALL {
            assert_eq!(Borough::from_code(borough.code()), Some(borough));
        }
        assert_eq!(Borough::from_code(1), Some(Borough::Manhattan));
        assert_eq!(Borough::from_code(5), Some(Borough::StatenIsland));
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(Borough::from_code(0), None);
        assert_eq!(Borough::from_code(6), None);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Borough::from_name("Bronx"), Some(Borough::Bronx));
        assert_eq!(Borough::from_name(" staten island "), Some(Borough::StatenIsland));
        assert_eq!(Borough::from_name("BROOKLYN"), Some(Borough::Brooklyn));
        assert_eq!(Borough::from_name("Jersey City"), None);
        assert_eq!(Borough::from_name(""), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Borough::StatenIsland.to_string(), "Staten Island");
    }
}
