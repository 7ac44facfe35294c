use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifies a residue (or any addressable chemical entity) by name, number and chain.
///
/// The canonical string form is `NAME<number>.CHAIN`, e.g. `TYR109.A` or `LIG1.G`.
/// When no chain is assigned the `.CHAIN` suffix is omitted (`WAT42`).
///
/// The string form is for labels and user input. A name ending in digits or containing
/// `.` does not parse back to the same id, so serde stores the three fields instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResidueId {
    pub name: String,
    pub number: isize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
}

impl ResidueId {
    pub fn new(name: &str, number: isize, chain: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            number,
            chain: chain.map(str::to_string),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseResidueIdError {
    #[error("Empty residue identifier")]
    Empty,
    #[error("Residue identifier '{0}' has an empty chain label")]
    EmptyChain(String),
    #[error("Residue identifier '{0}' has an invalid residue number")]
    InvalidNumber(String),
}

impl FromStr for ResidueId {
    type Err = ParseResidueIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseResidueIdError::Empty);
        }

        let (body, chain) = match s.rsplit_once('.') {
            Some((_, "")) => return Err(ParseResidueIdError::EmptyChain(s.to_string())),
            Some((body, chain)) => (body, Some(chain.to_string())),
            None => (s, None),
        };

        let digits_start = body
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_digit())
            .last()
            .map(|(i, _)| i);

        let (name, number) = match digits_start {
            Some(start) => {
                // A '-' directly before the digits is a sign only if something precedes it.
                let start = match body[..start].strip_suffix('-') {
                    Some(rest) if !rest.is_empty() => start - 1,
                    _ => start,
                };
                let number = body[start..]
                    .parse::<isize>()
                    .map_err(|_| ParseResidueIdError::InvalidNumber(s.to_string()))?;
                (&body[..start], number)
            }
            None => (body, 0),
        };

        Ok(Self {
            name: name.to_string(),
            number,
            chain,
        })
    }
}

impl fmt::Display for ResidueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.number)?;
        if let Some(chain) = &self.chain {
            write!(f, ".{chain}")?;
        }
        Ok(())
    }
}

/// A (ligand residue, target residue) key of a frame fingerprint.
pub type ResiduePair = (ResidueId, ResidueId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_number_and_chain() {
        let id: ResidueId = "TYR109.A".parse().unwrap();
        assert_eq!(id, ResidueId::new("TYR", 109, Some("A")));
    }

    #[test]
    fn parses_identifier_without_chain() {
        let id: ResidueId = "WAT42".parse().unwrap();
        assert_eq!(id, ResidueId::new("WAT", 42, None));
    }

    #[test]
    fn parses_negative_residue_number() {
        let id: ResidueId = "ALA-3.B".parse().unwrap();
        assert_eq!(id, ResidueId::new("ALA", -3, Some("B")));
    }

    #[test]
    fn name_without_number_defaults_to_zero() {
        let id: ResidueId = "LIG.G".parse().unwrap();
        assert_eq!(id, ResidueId::new("LIG", 0, Some("G")));
    }

    #[test]
    fn display_and_parse_round_trip() {
        for text in ["LIG1.G", "ASP129.A", "HOH1001", "ALA-3.B", "T3P12.W"] {
            let id: ResidueId = text.parse().unwrap();
            assert_eq!(id.to_string(), text);
        }
    }

    #[test]
    fn rejects_empty_and_dangling_chain() {
        assert_eq!("".parse::<ResidueId>(), Err(ParseResidueIdError::Empty));
        assert!(matches!(
            "ALA1.".parse::<ResidueId>(),
            Err(ParseResidueIdError::EmptyChain(_))
        ));
    }

    #[test]
    fn serde_keeps_names_the_string_form_cannot() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Keyed {
            id: ResidueId,
        }

        for id in [
            ResidueId::new("LG2", 1, Some("A")),
            ResidueId::new("A.B", 1, None),
            ResidueId::new("ALA", -3, Some("B")),
        ] {
            let text = toml::to_string(&Keyed { id: id.clone() }).unwrap();
            let back: Keyed = toml::from_str(&text).unwrap();
            assert_eq!(back.id, id);
        }
    }

    #[test]
    fn ordering_compares_name_then_number() {
        let a = ResidueId::new("ALA", 1, Some("A"));
        let b = ResidueId::new("ALA", 2, Some("A"));
        assert!(a < b);
    }
}
