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

use core::fmt;

use bh_vc_keys::{base64_url_decode, base64_url_encode};
use bherror::{
    traits::{ErrorContext, ForeignError},
    Error,
};
use serde_json::Value;

use super::{
    error::{DecodingResult, TokenSegment},
    ClaimValue, Digest, Salt,
};
use crate::{utils, DecodingError, Hasher};

/// A disclosure of a single credential subject claim, in both parsed form and
/// the original serialized form.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Disclosure {
    salt: Salt,
    claim_name: String,
    claim_value: ClaimValue,
    // serialized-as-hashed
    serialized: String,
}

impl Disclosure {
    /// Construct a new [`Disclosure`] from the given `salt`, `claim_name` and
    /// `claim_value`.
    ///
    /// The serialized form is the `base64url` encoding of the JSON array
    /// `[salt, claim_name, claim_value]` written with `", "` separators.
    pub fn new(salt: Salt, claim_name: String, claim_value: ClaimValue) -> Self {
        let input = format!(
            "[{}, {}, {}]",
            Value::from(salt.as_str()),
            Value::from(claim_name.as_str()),
            claim_value
        );

        let serialized = base64_url_encode(input);

        Self {
            salt,
            claim_name,
            claim_value,
            serialized,
        }
    }

    /// Parses a `base64url`-encoded disclosure.
    ///
    /// The decoded JSON must be an array of exactly three elements: a string
    /// salt, a string claim name and a supported [`ClaimValue`].
    pub fn parse(serialized: &str) -> DecodingResult<Self> {
        Self::try_from(serialized.to_owned())
    }

    /// Disclosure hash salt.
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Disclosure claim name.
    pub fn claim_name(&self) -> &str {
        &self.claim_name
    }

    /// Disclosure claim value.
    pub fn claim_value(&self) -> &ClaimValue {
        &self.claim_value
    }

    /// Serialized form of [`Self`]
    pub fn as_str(&self) -> &str {
        &self.serialized
    }

    /// Serialize [`Self`] into an owned [`String`].
    pub fn into_string(self) -> String {
        self.serialized
    }

    /// Returns the `base64url`-encoded digest of the serialized form, as
    /// committed to in the `_sd` array.
    pub fn digest(&self, hasher: impl Hasher) -> Digest {
        utils::base64_url_digest(self.serialized.as_bytes(), hasher)
    }
}

impl TryFrom<String> for Disclosure {
    type Error = Error<DecodingError>;

    fn try_from(serialized: String) -> Result<Self, Self::Error> {
        let decoded = base64_url_decode(&serialized)
            .foreign_err(|| DecodingError::InvalidBase64(TokenSegment::Disclosure))
            .ctx(|| serialized.clone())?;

        let array: Vec<Value> = serde_json::from_slice(&decoded)
            .foreign_err(|| DecodingError::InvalidJson(TokenSegment::Disclosure))
            .ctx(|| serialized.clone())?;

        let [salt, claim_name, claim_value] = <[Value; 3]>::try_from(array).map_err(|array| {
            Error::root(DecodingError::InvalidDisclosure(format!(
                "deserialized disclosure array has invalid length {}",
                array.len(),
            )))
        })?;

        let Value::String(salt) = salt else {
            return Err(Error::root(DecodingError::InvalidDisclosure(
                "salt value is not a string".to_string(),
            )));
        };
        let Value::String(claim_name) = claim_name else {
            return Err(Error::root(DecodingError::InvalidDisclosure(
                "claim name is not a string".to_string(),
            )));
        };
        let claim_value = ClaimValue::try_from(claim_value)
            .ctx(|| format!("value of disclosed claim {claim_name}"))?;

        Ok(Self {
            salt,
            claim_name,
            claim_value,
            serialized,
        })
    }
}

impl fmt::Display for Disclosure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}]",
            self.salt, self.claim_name, self.claim_value
        )
    }
}
