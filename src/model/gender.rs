// Gender labels and the two encodings they arrive in.
//
// The raw gender log stores a two-flag string "<isMale> <isFemale>". The
// frequency strategy instead reads a three-slot probability vector
// "pM pF pU", one slot per gender in fixed order. Both parse here, and both
// failure modes surface as MalformedRecord rather than defaulting.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ModelError;

/// A gender label. `Unknown` covers rows where neither flag is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "U")]
    Unknown,
}

impl Gender {
    /// All genders, in probability-vector slot order.
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Unknown];

    /// Fixed slot of this gender in a probability vector.
    pub fn position(self) -> usize {
        match self {
            Gender::Male => 0,
            Gender::Female => 1,
            Gender::Unknown => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Unknown => "U",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Decode a two-flag gender string: "1 0" is male, "0 1" is female, neither
/// flag set is unknown. If both flags are set the male flag wins — it is
/// checked first. Extra tokens are ignored; fewer than two is malformed.
pub fn decode_flags(code: &str) -> Result<Gender, ModelError> {
    let flags: Vec<&str> = code.split_whitespace().collect();
    if flags.len() < 2 {
        return Err(ModelError::MalformedRecord {
            record: code.to_string(),
            detail: format!("expected 2 gender flags, found {}", flags.len()),
        });
    }
    if flags[0].eq_ignore_ascii_case("1") {
        Ok(Gender::Male)
    } else if flags[1].eq_ignore_ascii_case("1") {
        Ok(Gender::Female)
    } else {
        Ok(Gender::Unknown)
    }
}

/// Parse a three-slot probability vector "pM pF pU".
pub fn parse_probabilities(code: &str) -> Result<[f64; 3], ModelError> {
    let slots: Vec<&str> = code.split_whitespace().collect();
    if slots.len() != 3 {
        return Err(ModelError::MalformedRecord {
            record: code.to_string(),
            detail: format!("expected 3 probability slots, found {}", slots.len()),
        });
    }
    let mut probabilities = [0.0; 3];
    for (slot, token) in probabilities.iter_mut().zip(&slots) {
        *slot = token.parse().map_err(|_| ModelError::MalformedRecord {
            record: code.to_string(),
            detail: format!("probability '{token}' is not a number"),
        })?;
    }
    Ok(probabilities)
}
