// Copyright (C) 2020-2025  The Blockhouse Technology Limited (TBTL).
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public
// License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::str::FromStr;

use bherror::Error;
use serde::{Deserialize, Serialize};

use crate::DecodingError;

pub(crate) const SHA_256_ALG_NAME: &str = "sha-256";
pub(crate) const SHA_384_ALG_NAME: &str = "sha-384";
pub(crate) const SHA_512_ALG_NAME: &str = "sha-512";

/// Hash algorithm used to compute the disclosure digests, recorded in the
/// `_sd_alg` payload claim.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashingAlgorithm {
    /// SHA-256 algorithm for hashing.
    #[serde(rename = "sha-256")]
    #[default]
    Sha256,
    /// SHA-384 algorithm for hashing.
    #[serde(rename = "sha-384")]
    Sha384,
    /// SHA-512 algorithm for hashing.
    #[serde(rename = "sha-512")]
    Sha512,
}

impl HashingAlgorithm {
    /// Returns the string value of the algorithm, formatted as specified in the
    /// *IANA* [Named Information Hash Algorithm Registry].
    ///
    /// [Named Information Hash Algorithm Registry]: https://www.iana.org/assignments/named-information/named-information.xhtml
    pub fn as_str(&self) -> &'static str {
        match self {
            HashingAlgorithm::Sha256 => SHA_256_ALG_NAME,
            HashingAlgorithm::Sha384 => SHA_384_ALG_NAME,
            HashingAlgorithm::Sha512 => SHA_512_ALG_NAME,
        }
    }
}

impl FromStr for HashingAlgorithm {
    type Err = bherror::Error<DecodingError>;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            SHA_256_ALG_NAME => Ok(Self::Sha256),
            SHA_384_ALG_NAME => Ok(Self::Sha384),
            SHA_512_ALG_NAME => Ok(Self::Sha512),
            _ => Err(Error::root(DecodingError::InvalidHashAlgorithmName(
                value.to_owned(),
            ))),
        }
    }
}

impl std::fmt::Display for HashingAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computes hash digests for disclosures and decoys.
pub trait Hasher: Send + Sync {
    /// Returns the algorithm used for calculating the hash digest within the
    /// [`Hasher::digest`] method.
    fn algorithm(&self) -> HashingAlgorithm;

    /// Computes the hash digest of the given `input` using the algorithm as
    /// returned from the [`Hasher::algorithm`] method.
    fn digest(&self, input: &[u8]) -> Vec<u8>;
}

impl<H: Hasher + ?Sized> Hasher for &H {
    fn algorithm(&self) -> HashingAlgorithm {
        (**self).algorithm()
    }

    fn digest(&self, input: &[u8]) -> Vec<u8> {
        (**self).digest(input)
    }
}

impl<H: Hasher + ?Sized> Hasher for Box<H> {
    fn algorithm(&self) -> HashingAlgorithm {
        self.as_ref().algorithm()
    }

    fn digest(&self, input: &[u8]) -> Vec<u8> {
        self.as_ref().digest(input)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn hashing_algorithm_serializes_correctly() {
        for (alg, name) in [
            (HashingAlgorithm::Sha256, SHA_256_ALG_NAME),
            (HashingAlgorithm::Sha384, SHA_384_ALG_NAME),
            (HashingAlgorithm::Sha512, SHA_512_ALG_NAME),
        ] {
            let expected = format!("\"{}\"", name);

            let serialized = serde_json::to_string(&alg).unwrap();
            assert_eq!(serialized, expected);

            let deserialized: HashingAlgorithm = serde_json::from_str(&expected).unwrap();
            assert_eq!(deserialized, alg);

            assert_eq!(name.parse::<HashingAlgorithm>().unwrap(), alg);
            assert_eq!(alg.to_string(), name);
        }
    }

    #[test]
    fn hashing_algorithm_defaults_to_sha256() {
        assert_eq!(HashingAlgorithm::default(), HashingAlgorithm::Sha256);
    }

    #[test]
    fn unknown_hashing_algorithm_is_rejected() {
        for name in ["sha-1", "SHA-256", "sha256", ""] {
            let error = name.parse::<HashingAlgorithm>().unwrap_err();
            assert_matches!(error.error, DecodingError::InvalidHashAlgorithmName(n) if n == name);

            assert!(serde_json::from_str::<HashingAlgorithm>(&format!("\"{name}\"")).is_err());
        }
    }
}
