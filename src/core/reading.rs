//! Cut-off readings on the extended real line

use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Compact store token for a reading with no cut-off.
pub const ALWAYS_TOKEN: &str = "a";
/// Compact store token for a reading with no valid window.
pub const NEVER_TOKEN: &str = "n";

const ALWAYS_TEXT: &str = "Always possible";
const NEVER_TEXT: &str = "Never possible";

/// A single cut-off reading for one currency on one day bucket.
///
/// Ordered as `NeverPossible < Finite(_) < AlwaysPossible`. Finite hours are
/// always in `[0, 24)` when produced through [`CutOffReading::from_str`] or
/// [`CutOffReading::finite`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CutOffReading {
    NeverPossible,
    Finite(f64),
    AlwaysPossible,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReadingParseError {
    #[error("'{0}' is neither a reserved token nor a number")]
    NotANumber(String),
    #[error("{0} is outside the [0, 24) hour range")]
    OutOfRange(f64),
}

impl CutOffReading {
    pub fn finite(hours: f64) -> Result<Self, ReadingParseError> {
        if hours.is_finite() && (0.0..24.0).contains(&hours) {
            Ok(CutOffReading::Finite(hours))
        } else {
            Err(ReadingParseError::OutOfRange(hours))
        }
    }

    /// The earlier of two readings. Never-possible absorbs everything,
    /// always-possible yields to anything else.
    pub fn earlier(self, other: Self) -> Self {
        use CutOffReading::*;
        match (self, other) {
            (NeverPossible, _) | (_, NeverPossible) => NeverPossible,
            (AlwaysPossible, x) | (x, AlwaysPossible) => x,
            (Finite(a), Finite(b)) => Finite(a.min(b)),
        }
    }

    /// Token used when the reading is written back to a store. Finite hours
    /// keep full precision so the token parses back to the same value.
    pub fn to_token(&self) -> String {
        match self {
            CutOffReading::NeverPossible => NEVER_TOKEN.to_string(),
            CutOffReading::AlwaysPossible => ALWAYS_TOKEN.to_string(),
            CutOffReading::Finite(hours) => hours.to_string(),
        }
    }
}

impl FromStr for CutOffReading {
    type Err = ReadingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            NEVER_TOKEN | NEVER_TEXT => Ok(CutOffReading::NeverPossible),
            ALWAYS_TOKEN | ALWAYS_TEXT => Ok(CutOffReading::AlwaysPossible),
            other => {
                let hours: f64 = other
                    .parse()
                    .map_err(|_| ReadingParseError::NotANumber(other.to_string()))?;
                CutOffReading::finite(hours)
            }
        }
    }
}

impl Display for CutOffReading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CutOffReading::NeverPossible => write!(f, "{NEVER_TEXT}"),
            CutOffReading::AlwaysPossible => write!(f, "{ALWAYS_TEXT}"),
            CutOffReading::Finite(hours) => write!(f, "{hours:.2}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CutOffReading::*;

    #[test]
    fn test_parse_tokens_and_numbers() {
        assert_eq!("n".parse::<CutOffReading>().unwrap(), NeverPossible);
        assert_eq!("a".parse::<CutOffReading>().unwrap(), AlwaysPossible);
        assert_eq!(
            "Never possible".parse::<CutOffReading>().unwrap(),
            NeverPossible
        );
        assert_eq!(
            " Always possible ".parse::<CutOffReading>().unwrap(),
            AlwaysPossible
        );
        assert_eq!("16.00".parse::<CutOffReading>().unwrap(), Finite(16.0));
        assert_eq!("0".parse::<CutOffReading>().unwrap(), Finite(0.0));
        assert_eq!("9.5".parse::<CutOffReading>().unwrap(), Finite(9.5));
    }

    #[test]
    fn test_parse_rejects_invalid_values() {
        assert!(matches!(
            "soon".parse::<CutOffReading>(),
            Err(ReadingParseError::NotANumber(_))
        ));
        assert!(matches!(
            "".parse::<CutOffReading>(),
            Err(ReadingParseError::NotANumber(_))
        ));
        assert_eq!(
            "24".parse::<CutOffReading>(),
            Err(ReadingParseError::OutOfRange(24.0))
        );
        assert_eq!(
            "-1".parse::<CutOffReading>(),
            Err(ReadingParseError::OutOfRange(-1.0))
        );
        // Float infinities are not accepted in place of the sentinels
        assert!("inf".parse::<CutOffReading>().is_err());
        assert!("NaN".parse::<CutOffReading>().is_err());
    }

    #[test]
    fn test_earlier_is_commutative_with_sentinels() {
        let samples = [NeverPossible, Finite(0.0), Finite(13.5), Finite(21.0), AlwaysPossible];
        for a in samples {
            for b in samples {
                assert_eq!(a.earlier(b), b.earlier(a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_earlier_sentinel_rules() {
        assert_eq!(NeverPossible.earlier(Finite(10.0)), NeverPossible);
        assert_eq!(NeverPossible.earlier(AlwaysPossible), NeverPossible);
        assert_eq!(AlwaysPossible.earlier(Finite(10.0)), Finite(10.0));
        assert_eq!(AlwaysPossible.earlier(AlwaysPossible), AlwaysPossible);
        assert_eq!(Finite(16.0).earlier(Finite(21.0)), Finite(16.0));
        assert_eq!(Finite(16.0).earlier(Finite(16.0)), Finite(16.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Finite(16.0).to_string(), "16.00");
        assert_eq!(Finite(9.5).to_string(), "9.50");
        assert_eq!(NeverPossible.to_string(), "Never possible");
        assert_eq!(AlwaysPossible.to_string(), "Always possible");
    }

    #[test]
    fn test_token_is_parseable() {
        let samples = [
            NeverPossible,
            Finite(0.0),
            Finite(14.25),
            Finite(9.125),
            Finite(23.999),
            Finite(23.999_999_999),
            AlwaysPossible,
        ];
        for reading in samples {
            assert_eq!(reading.to_token().parse::<CutOffReading>().unwrap(), reading);
        }
        assert_eq!(Finite(23.999).to_token(), "23.999");
        assert_eq!(Finite(16.0).to_token(), "16");
    }
}
