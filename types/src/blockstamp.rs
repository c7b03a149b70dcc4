//! Blockstamp: a `number-HASH` reference to a block.

use crate::{DocumentHash, TrustmeshError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Points a document at the block context it was emitted in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Blockstamp {
    pub number: u64,
    pub hash: DocumentHash,
}

impl Blockstamp {
    pub fn new(number: u64, hash: DocumentHash) -> Self {
        Self { number, hash }
    }
}

impl fmt::Display for Blockstamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.number, self.hash)
    }
}

impl FromStr for Blockstamp {
    type Err = TrustmeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (number, hash) = s
            .split_once('-')
            .ok_or_else(|| TrustmeshError::InvalidBlockstamp(s.to_string()))?;
        let number = number
            .parse::<u64>()
            .map_err(|_| TrustmeshError::InvalidBlockstamp(s.to_string()))?;
        let hash = DocumentHash::new(hash);
        if !hash.is_well_formed() {
            return Err(TrustmeshError::InvalidBlockstamp(s.to_string()));
        }
        Ok(Self { number, hash })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: &str = "E2E2E2E2E2E2E2E2E2E2E2E2E2E2E2E2E2E2E2E2E2E2E2E2E2E2E2E2E2E2E2E2";

    #[test]
    fn parse_and_display() {
        let stamp: Blockstamp = format!("42-{H}").parse().unwrap();
        assert_eq!(stamp.number, 42);
        assert_eq!(stamp.to_string(), format!("42-{H}"));
    }

    #[test]
    fn rejects_missing_dash_or_bad_hash() {
        assert!("42".parse::<Blockstamp>().is_err());
        assert!("x-ABC".parse::<Blockstamp>().is_err());
        assert!("1-ABC".parse::<Blockstamp>().is_err());
    }
}
