//! Machine quality variant and its one-hot encoding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Product quality variant of the machine: low, medium or high.
///
/// `H` is the reference level of the one-hot encoding: it has no indicator
/// flag of its own and is represented by both flags being zero.
///
/// Serializes as the bare letter. Deserialization goes through [`FromStr`],
/// so JSON accepts the same spellings as the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum MachineType {
    #[default]
    L,
    M,
    H,
}

/// Indicator flags for a [`MachineType`]. At most one flag is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneHot {
    pub is_l: bool,
    pub is_m: bool,
}

impl OneHot {
    pub fn is_l_value(self) -> f64 {
        if self.is_l {
            1.0
        } else {
            0.0
        }
    }

    pub fn is_m_value(self) -> f64 {
        if self.is_m {
            1.0
        } else {
            0.0
        }
    }
}

impl MachineType {
    /// Selector options in display order. The first one is the form default.
    pub const ALL: [MachineType; 3] = [MachineType::L, MachineType::M, MachineType::H];

    pub fn as_str(&self) -> &'static str {
        match self {
            MachineType::L => "L",
            MachineType::M => "M",
            MachineType::H => "H",
        }
    }

    pub fn one_hot(self) -> OneHot {
        OneHot {
            is_l: self == MachineType::L,
            is_m: self == MachineType::M,
        }
    }
}

impl fmt::Display for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MachineType {
    type Err = CoreError;

    /// Accepts the single letter in either case, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "L" | "l" => Ok(MachineType::L),
            "M" | "m" => Ok(MachineType::M),
            "H" | "h" => Ok(MachineType::H),
            other => Err(CoreError::Validation(format!(
                "machine_type must be one of L, M, H, got '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for MachineType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn one_hot_sets_exactly_the_matching_flag() {
        assert_eq!(
            MachineType::L.one_hot(),
            OneHot {
                is_l: true,
                is_m: false
            }
        );
        assert_eq!(
            MachineType::M.one_hot(),
            OneHot {
                is_l: false,
                is_m: true
            }
        );
    }

    #[test]
    fn reference_level_has_no_flags() {
        let flags = MachineType::H.one_hot();
        assert!(!flags.is_l && !flags.is_m);
        assert_eq!(flags.is_l_value(), 0.0);
        assert_eq!(flags.is_m_value(), 0.0);
    }

    #[test]
    fn never_sets_both_flags() {
        for t in MachineType::ALL {
            let flags = t.one_hot();
            assert!(!(flags.is_l && flags.is_m), "{t} set both flags");
        }
    }

    #[test]
    fn default_is_first_selector_option() {
        assert_eq!(MachineType::default(), MachineType::ALL[0]);
    }

    #[test]
    fn parses_either_case() {
        assert_eq!("m".parse::<MachineType>().unwrap(), MachineType::M);
        assert_eq!(" H ".parse::<MachineType>().unwrap(), MachineType::H);
    }

    #[test]
    fn rejects_unknown_letter() {
        assert_matches!("X".parse::<MachineType>(), Err(CoreError::Validation(_)));
        assert_matches!("".parse::<MachineType>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn serializes_as_bare_letter() {
        assert_eq!(serde_json::to_string(&MachineType::M).unwrap(), "\"M\"");
        let parsed: MachineType = serde_json::from_str("\"H\"").unwrap();
        assert_eq!(parsed, MachineType::H);
    }

    #[test]
    fn deserializes_either_case() {
        let parsed: MachineType = serde_json::from_str("\"l\"").unwrap();
        assert_eq!(parsed, MachineType::L);
        assert!(serde_json::from_str::<MachineType>("\"X\"").is_err());
    }
}
