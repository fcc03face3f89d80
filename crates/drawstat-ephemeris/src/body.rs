use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A solar-system body the ephemeris can locate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
}

impl Body {
    pub const ALL: [Body; 8] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
    ];

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Body::Sun => "sun",
            Body::Moon => "moon",
            Body::Mercury => "mercury",
            Body::Venus => "venus",
            Body::Earth => "earth",
            Body::Mars => "mars",
            Body::Jupiter => "jupiter",
            Body::Saturn => "saturn",
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.id(), f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown celestial body '{input}'")]
pub struct ParseBodyError {
    pub input: String,
}

impl FromStr for Body {
    type Err = ParseBodyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Body::ALL
            .into_iter()
            .find(|body| body.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseBodyError {
                input: s.to_owned(),
            })
    }
}

/// An unordered pair of bodies whose separation is tracked, written `a-b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct BodyPair {
    pub a: Body,
    pub b: Body,
}

impl BodyPair {
    #[must_use]
    pub const fn new(a: Body, b: Body) -> Self {
        Self { a, b }
    }

    /// Name of the enriched-table column holding this pair's distance.
    #[must_use]
    pub fn column_name(&self) -> String {
        format!("dist_{}_{}", self.a, self.b)
    }
}

impl fmt::Display for BodyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.a, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBodyPairError {
    #[display("body pair '{input}' must have the form 'a-b'")]
    Format { input: String },
    #[display("invalid body pair: {source}")]
    Body { source: ParseBodyError },
}

impl FromStr for BodyPair {
    type Err = ParseBodyPairError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s.split_once('-').ok_or_else(|| ParseBodyPairError::Format {
            input: s.to_owned(),
        })?;
        let a = a
            .parse()
            .map_err(|source| ParseBodyPairError::Body { source })?;
        let b = b
            .parse()
            .map_err(|source| ParseBodyPairError::Body { source })?;
        Ok(Self { a, b })
    }
}

impl TryFrom<String> for BodyPair {
    type Error = ParseBodyPairError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BodyPair> for String {
    fn from(pair: BodyPair) -> Self {
        pair.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_ids_round_trip() {
        for body in Body::ALL {
            assert_eq!(body.id().parse::<Body>().unwrap(), body);
        }
        assert_eq!("  Mars ".parse::<Body>().unwrap(), Body::Mars);
        assert!("pluto".parse::<Body>().is_err());
    }

    #[test]
    fn test_pair_parse_and_column_name() {
        let pair = "earth-moon".parse::<BodyPair>().unwrap();
        assert_eq!(pair, BodyPair::new(Body::Earth, Body::Moon));
        assert_eq!(pair.to_string(), "earth-moon");
        assert_eq!(pair.column_name(), "dist_earth_moon");
    }

    #[test]
    fn test_pair_parse_errors() {
        assert!(matches!(
            "earth".parse::<BodyPair>(),
            Err(ParseBodyPairError::Format { .. })
        ));
        assert!(matches!(
            "earth-pluto".parse::<BodyPair>(),
            Err(ParseBodyPairError::Body { .. })
        ));
    }

    #[test]
    fn test_pair_serde_as_string() {
        let pairs: Vec<BodyPair> = serde_json::from_str(r#"["moon-sun", "earth-mars"]"#).unwrap();
        assert_eq!(
            pairs,
            vec![
                BodyPair::new(Body::Moon, Body::Sun),
                BodyPair::new(Body::Earth, Body::Mars)
            ]
        );
        assert_eq!(serde_json::to_string(&pairs[0]).unwrap(), r#""moon-sun""#);
    }
}
