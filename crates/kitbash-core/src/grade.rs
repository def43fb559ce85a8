use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality tier of a component. Purely descriptive: aggregation never looks
/// at it.
///
/// The ordinals are a stable contract with storage and view layers:
/// `Ungraded = 0`, `Basic = 1`, `Proficient = 2`, `Master = 3`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Grade {
    #[default]
    Ungraded = 0,
    Basic = 1,
    Proficient = 2,
    Master = 3,
}

impl Grade {
    /// Every grade, in ordinal order.
    pub const ALL: [Grade; 4] = [
        Grade::Ungraded,
        Grade::Basic,
        Grade::Proficient,
        Grade::Master,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Grade::Ungraded => "Ungraded",
            Grade::Basic => "Basic",
            Grade::Proficient => "Proficient",
            Grade::Master => "Master",
        }
    }

    /// `(ordinal, name)` pairs for select widgets and stored choice columns.
    pub fn choices() -> Vec<(u8, &'static str)> {
        Self::ALL.iter().map(|g| (g.ordinal(), g.name())).collect()
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when an integer does not name a known variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} ordinal: {ordinal}")]
pub struct UnknownOrdinal {
    pub kind: &'static str,
    pub ordinal: u8,
}

impl TryFrom<u8> for Grade {
    type Error = UnknownOrdinal;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_ordinal(value).ok_or(UnknownOrdinal {
            kind: "grade",
            ordinal: value,
        })
    }
}

/// Returned when text names neither a grade nor a grade ordinal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown grade: {0}")]
pub struct UnknownGrade(pub String);

impl std::str::FromStr for Grade {
    type Err = UnknownGrade;

    /// Case-insensitive name lookup, also accepting the ordinal as digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let found = match s.parse::<u8>() {
            Ok(ordinal) => Self::from_ordinal(ordinal),
            Err(_) => Self::ALL
                .iter()
                .copied()
                .find(|g| g.name().eq_ignore_ascii_case(s)),
        };
        found.ok_or_else(|| UnknownGrade(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_are_stable() {
        assert_eq!(Grade::Ungraded.ordinal(), 0);
        assert_eq!(Grade::Basic.ordinal(), 1);
        assert_eq!(Grade::Proficient.ordinal(), 2);
        assert_eq!(Grade::Master.ordinal(), 3);
    }

    #[test]
    fn try_from_round_trips_every_grade() {
        for grade in Grade::ALL {
            assert_eq!(Grade::try_from(grade.ordinal()).unwrap(), grade);
        }
    }

    #[test]
    fn try_from_unknown_ordinal_fails() {
        let err = Grade::try_from(4).unwrap_err();
        assert_eq!(err.ordinal, 4);
        assert!(err.to_string().contains("grade"));
    }

    #[test]
    fn default_is_ungraded() {
        assert_eq!(Grade::default(), Grade::Ungraded);
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(Grade::Proficient.to_string(), "Proficient");
    }

    #[test]
    fn choices_list_all_grades_in_order() {
        let choices = Grade::choices();
        assert_eq!(
            choices,
            vec![
                (0, "Ungraded"),
                (1, "Basic"),
                (2, "Proficient"),
                (3, "Master")
            ]
        );
    }

    #[test]
    fn parse_accepts_names_and_ordinals() {
        assert_eq!("master".parse::<Grade>().unwrap(), Grade::Master);
        assert_eq!("Basic".parse::<Grade>().unwrap(), Grade::Basic);
        assert_eq!("2".parse::<Grade>().unwrap(), Grade::Proficient);
        assert!("legendary".parse::<Grade>().is_err());
        assert!("9".parse::<Grade>().is_err());
    }

    #[test]
    fn parse_error_names_the_input() {
        let err = "legendary".parse::<Grade>().unwrap_err();
        assert_eq!(err, UnknownGrade("legendary".to_string()));
        assert_eq!(err.to_string(), "unknown grade: legendary");
        assert_eq!(
            "9".parse::<Grade>().unwrap_err().to_string(),
            "unknown grade: 9"
        );
    }

    #[test]
    fn grades_order_by_tier() {
        assert!(Grade::Basic < Grade::Proficient);
        assert!(Grade::Proficient < Grade::Master);
    }

    #[test]
    fn serializes_by_name() {
        let json = serde_json::to_string(&Grade::Master).unwrap();
        assert_eq!(json, "\"Master\"");
        let back: Grade = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Grade::Master);
    }
}
