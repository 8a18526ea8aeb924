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

//! Provides the [`ParsedSdJwt`] type for parsing and verifying SD-JWTs.

use std::collections::{BTreeMap, HashSet};

use bh_vc_keys::{base64_url_decode, SignatureVerifier};
use bherror::{
    traits::{ErrorContext, ForeignError, PropagateError},
    Error,
};
use serde::de::DeserializeOwned;

use crate::{
    error::{FormatError, Result},
    models::DecodingResult,
    sd_jwt::SdJwt,
    ClaimValue, DecodingError, Disclosure, IssuerJwtHeader, SdJwtPayload, SecondsSinceEpoch,
    TokenSegment,
};

/// Error type for the validity checks of a parsed SD-JWT.
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum VerifierError {
    /// JWT not yet valid error, indicating the JWT's `nbf` (not before) claim is in the future.
    #[strum(to_string = "Jwt not yet valid: current time is {0}, nbf is {1}")]
    JwtNotYetValid(u64, u64),

    /// JWT expired error, indicating the JWT's `exp` (expiration) claim is in the past.
    #[strum(to_string = "Jwt expired, current time is {0}, expiration is {1}")]
    JwtExpired(u64, u64),
}

impl bherror::BhError for VerifierError {}

/// Message reported by [`ParsedSdJwt::verify_disclosure_content`] when the
/// payload has no `_sd` array.
pub const NO_SD_MESSAGE: &str = "No _sd found in SD-JWT payload";

/// An SD-JWT parsed from its wire string.
///
/// Parsing only decodes the token; the signature and the disclosures are
/// checked separately with [`ParsedSdJwt::verify_signature`] and
/// [`ParsedSdJwt::verify_disclosure_content`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSdJwt {
    sd_jwt: SdJwt,
    header: IssuerJwtHeader,
    payload: SdJwtPayload,
    disclosures: Vec<Disclosure>,
}

impl ParsedSdJwt {
    /// Parses the wire string `<header>.<payload>.<signature>~<d1>~...~<dn>`.
    ///
    /// # Errors
    ///
    /// - [`FormatError::MalformedToken`] if the string does not have exactly
    ///   three `.`-separated segments,
    /// - [`FormatError::Decoding`] if the header, the payload or any of the
    ///   disclosures fails to decode.
    pub fn parse(wire: &str) -> Result<Self, FormatError> {
        let sd_jwt: SdJwt = wire.parse()?;

        let header = decode_segment(&sd_jwt.header, TokenSegment::Header)
            .match_err(|error| FormatError::Decoding(error.clone()))?;
        let payload = decode_segment(&sd_jwt.payload, TokenSegment::Payload)
            .match_err(|error| FormatError::Decoding(error.clone()))?;
        let disclosures = sd_jwt
            .disclosures
            .iter()
            .enumerate()
            .map(|(index, disclosure)| {
                Disclosure::parse(disclosure)
                    .match_err(|error| FormatError::Decoding(error.clone()))
                    .ctx(|| format!("disclosure at index {index}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            sd_jwt,
            header,
            payload,
            disclosures,
        })
    }

    /// JWT header of the token.
    pub fn header(&self) -> &IssuerJwtHeader {
        &self.header
    }

    /// Payload of the token.
    pub fn payload(&self) -> &SdJwtPayload {
        &self.payload
    }

    /// Disclosures in the order they appear in the wire string.
    pub fn disclosures(&self) -> &[Disclosure] {
        &self.disclosures
    }

    /// Whether the token carries a signature segment.
    pub fn is_signed(&self) -> bool {
        self.sd_jwt.signature.is_some()
    }

    /// Verifies the signature over `<header>.<payload>` with `verifier`.
    ///
    /// Returns `false` if the token is unsigned or the signature segment is
    /// not valid `base64url`.
    pub fn verify_signature(&self, verifier: &dyn SignatureVerifier) -> bool {
        let Some(signature) = &self.sd_jwt.signature else {
            tracing::debug!("SD-JWT has no signature");
            return false;
        };
        let Ok(signature) = base64_url_decode(signature) else {
            tracing::debug!("SD-JWT signature is not valid base64url");
            return false;
        };

        let message = self.sd_jwt.signing_input();
        verifier.verify(message.as_bytes(), &signature)
    }

    /// Checks that every disclosure is committed to in the `_sd` array,
    /// hashing with the algorithm named by `_sd_alg` (SHA-256 if absent).
    ///
    /// Returns one message per disclosure whose digest is not in `_sd`, or
    /// [`NO_SD_MESSAGE`] if the payload has no `_sd` array. An empty result
    /// means all disclosures are committed to.
    pub fn verify_disclosure_content(&self) -> Vec<String> {
        let Some(sd) = &self.payload.sd else {
            tracing::debug!("{NO_SD_MESSAGE}");
            return vec![NO_SD_MESSAGE.to_owned()];
        };

        let hasher = self.payload.sd_alg.unwrap_or_default().hasher();
        let sd: HashSet<&str> = sd.iter().map(String::as_str).collect();

        self.disclosures
            .iter()
            .filter(|disclosure| !sd.contains(disclosure.digest(&hasher).as_str()))
            .map(|disclosure| {
                let message =
                    format!("Disclosure {disclosure} not contained in _sd array in the SD-JWT");
                tracing::debug!("{message}");
                message
            })
            .collect()
    }

    /// Returns the disclosed claims by name.
    ///
    /// If several disclosures have the same claim name, the later one wins.
    /// The claims are not checked against `_sd`, use
    /// [`ParsedSdJwt::verify_disclosure_content`] for that.
    pub fn disclosed_claims(&self) -> BTreeMap<String, ClaimValue> {
        self.disclosures
            .iter()
            .map(|disclosure| {
                (
                    disclosure.claim_name().to_owned(),
                    disclosure.claim_value().clone(),
                )
            })
            .collect()
    }

    /// Checks the `nbf` and `exp` claims, if present, against `current_time`.
    ///
    /// # Errors
    ///
    /// - [`VerifierError::JwtExpired`] if `current_time` is on or after `exp`,
    /// - [`VerifierError::JwtNotYetValid`] if `current_time` is before `nbf`.
    pub fn check_validity(&self, current_time: SecondsSinceEpoch) -> Result<(), VerifierError> {
        // check that the JWT did not expire
        // https://www.rfc-editor.org/rfc/rfc7519.html#section-4.1.4
        if let Some(exp) = self.payload.exp {
            // RFC: "on or after"
            if current_time >= exp {
                return Err(Error::root(VerifierError::JwtExpired(current_time, exp)));
            };
        };

        // check that `nbf`, if present, is in the past
        if let Some(nbf) = self.payload.nbf {
            if current_time < nbf {
                return Err(Error::root(VerifierError::JwtNotYetValid(
                    current_time,
                    nbf,
                )));
            };
        };

        Ok(())
    }
}

impl std::str::FromStr for ParsedSdJwt {
    type Err = Error<FormatError>;

    fn from_str(wire: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(wire)
    }
}

fn decode_segment<T: DeserializeOwned>(segment: &str, kind: TokenSegment) -> DecodingResult<T> {
    let bytes =
        base64_url_decode(segment).foreign_err(|| DecodingError::InvalidBase64(kind))?;

    serde_json::from_slice(&bytes).foreign_err(|| DecodingError::InvalidJson(kind))
}
