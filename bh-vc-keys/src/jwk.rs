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

use bherror::{
    traits::{ErrorContext as _, ForeignError as _},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::KeyError, utils::base64_url_decode, SigningAlgorithm};

/// JWK `"kty"` value for elliptic curve keys, as specified in [RFC7518].
///
/// [RFC7518]: https://datatracker.ietf.org/doc/html/rfc7518#section-6.1
pub const KTY_EC: &str = "EC";
/// JWK `"kty"` value for octet key pairs, as specified in [RFC8037].
///
/// [RFC8037]: https://datatracker.ietf.org/doc/html/rfc8037#section-2
pub const KTY_OKP: &str = "OKP";

/// Curves supported for the `EC` key type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcCurve {
    /// NIST P-256, also known as `secp256r1` or `prime256v1`.
    P256,
    /// NIST P-384, also known as `secp384r1`.
    P384,
    /// NIST P-521, also known as `secp521r1`.
    P521,
}

impl EcCurve {
    /// Returns the JWK `"crv"` value of the curve.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P256 => "P-256",
            Self::P384 => "P-384",
            Self::P521 => "P-521",
        }
    }

    /// Returns the length in bytes of a single coordinate (and of the private
    /// scalar) of a key on this curve.
    pub fn coordinate_len(&self) -> usize {
        match self {
            Self::P256 => 32,
            Self::P384 => 48,
            Self::P521 => 66,
        }
    }

    /// Returns the signing algorithm used with keys on this curve.
    pub fn signing_algorithm(&self) -> SigningAlgorithm {
        match self {
            Self::P256 => SigningAlgorithm::Es256,
            Self::P384 => SigningAlgorithm::Es384,
            Self::P521 => SigningAlgorithm::Es512,
        }
    }
}

impl FromStr for EcCurve {
    type Err = Error<KeyError>;

    fn from_str(value: &str) -> Result<Self, KeyError> {
        [Self::P256, Self::P384, Self::P521]
            .into_iter()
            .find(|curve| curve.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| Error::root(KeyError::UnsupportedCurve(value.to_owned())))
            .ctx(|| format!("not a curve of the {KTY_EC} key type"))
    }
}

impl std::fmt::Display for EcCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Curves supported for the `OKP` key type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OkpCurve {
    /// Edwards25519, used for `EdDSA` signatures.
    Ed25519,
}

impl OkpCurve {
    /// Returns the JWK `"crv"` value of the curve.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ed25519 => "Ed25519",
        }
    }

    /// Returns the length in bytes of both the public key and the private
    /// seed on this curve.
    pub fn key_len(&self) -> usize {
        match self {
            Self::Ed25519 => 32,
        }
    }

    /// Returns the signing algorithm used with keys on this curve.
    pub fn signing_algorithm(&self) -> SigningAlgorithm {
        match self {
            Self::Ed25519 => SigningAlgorithm::EdDsa,
        }
    }
}

impl FromStr for OkpCurve {
    type Err = Error<KeyError>;

    fn from_str(value: &str) -> Result<Self, KeyError> {
        if Self::Ed25519.as_str().eq_ignore_ascii_case(value) {
            return Ok(Self::Ed25519);
        }
        Err(Error::root(KeyError::UnsupportedCurve(value.to_owned())))
            .ctx(|| format!("not a curve of the {KTY_OKP} key type"))
    }
}

impl std::fmt::Display for OkpCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional JWK members which do not describe the key itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JwkParams {
    /// The `"kid"` (key ID) member.
    pub kid: Option<String>,
    /// The `"use"` (public key use) member.
    pub key_use: Option<String>,
    /// The `"alg"` (algorithm) member.
    pub alg: Option<String>,
}

/// Key material of an `EC` JWK.
///
/// Coordinates are kept in their `base64url` form, exactly as received, and
/// are only decoded when a key is extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcKeyMaterial {
    /// The curve of the key.
    pub crv: EcCurve,
    /// The `base64url`-encoded x coordinate.
    pub x: String,
    /// The `base64url`-encoded y coordinate.
    pub y: String,
    /// The `base64url`-encoded private scalar, present only for private keys.
    pub d: Option<String>,
    /// Other JWK members.
    pub params: JwkParams,
}

/// Key material of an `OKP` JWK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OkpKeyMaterial {
    /// The curve of the key.
    pub crv: OkpCurve,
    /// The `base64url`-encoded public key.
    pub x: String,
    /// The `base64url`-encoded private seed, present only for private keys.
    pub d: Option<String>,
    /// Other JWK members.
    pub params: JwkParams,
}

/// Key material decoded from a JSON Web Key.
///
/// The variant is selected by the `"kty"` member of the JWK. Adding support
/// for another key type means adding another variant.
///
/// [`KeyMaterial`] (de)serializes as the JWK JSON object, so it can be
/// embedded directly into other structures, e.g. the `cnf` claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "JwkUnverified", into = "JwkUnverified")]
pub enum KeyMaterial {
    /// Elliptic curve key (`"kty": "EC"`).
    Ec(EcKeyMaterial),
    /// Octet key pair (`"kty": "OKP"`).
    Okp(OkpKeyMaterial),
}

impl KeyMaterial {
    /// Decodes the key material from a JWK JSON string.
    ///
    /// # Errors
    ///
    /// - [`KeyError::UnsupportedKeyType`] if `"kty"` is neither `EC` nor `OKP`
    ///   (compared case-insensitively, like the curve names),
    /// - [`KeyError::UnsupportedCurve`] if `"crv"` is not supported for the
    ///   key type,
    /// - [`KeyError::KeyDecoding`] if the input is not a JWK object or
    ///   required members are missing.
    pub fn decode(jwk: &str) -> Result<Self, KeyError> {
        Self::from_slice(jwk.as_bytes())
    }

    /// Decodes the key material from the bytes of a JWK JSON document, e.g.
    /// as already extracted from a key identifier.
    ///
    /// See [`KeyMaterial::decode`] for the possible errors.
    pub fn from_slice(jwk: &[u8]) -> Result<Self, KeyError> {
        let jwk: JwkUnverified = serde_json::from_slice(jwk).foreign_err(|| {
            KeyError::KeyDecoding("input is not a well-formed JWK object".to_owned())
        })?;
        Self::try_from(jwk)
    }

    /// Decodes the key material from a parsed JWK JSON value.
    ///
    /// See [`KeyMaterial::decode`] for the possible errors.
    pub fn from_value(jwk: Value) -> Result<Self, KeyError> {
        let jwk: JwkUnverified = serde_json::from_value(jwk).foreign_err(|| {
            KeyError::KeyDecoding("input is not a well-formed JWK object".to_owned())
        })?;
        Self::try_from(jwk)
    }

    /// Returns the JWK `"kty"` value of this key material.
    pub fn key_type(&self) -> &'static str {
        match self {
            Self::Ec(_) => KTY_EC,
            Self::Okp(_) => KTY_OKP,
        }
    }

    /// Returns the JWK `"crv"` value of this key material.
    pub fn curve_name(&self) -> &'static str {
        match self {
            Self::Ec(ec) => ec.crv.as_str(),
            Self::Okp(okp) => okp.crv.as_str(),
        }
    }

    /// Returns the signing algorithm implied by the curve.
    pub fn signing_algorithm(&self) -> SigningAlgorithm {
        match self {
            Self::Ec(ec) => ec.crv.signing_algorithm(),
            Self::Okp(okp) => okp.crv.signing_algorithm(),
        }
    }

    /// Returns the JWK members which do not describe the key itself.
    pub fn params(&self) -> &JwkParams {
        match self {
            Self::Ec(ec) => &ec.params,
            Self::Okp(okp) => &okp.params,
        }
    }

    /// Returns the `"kid"` member, if present.
    pub fn kid(&self) -> Option<&str> {
        self.params().kid.as_deref()
    }

    /// Returns `true` if this key material carries the private part (`"d"`).
    pub fn has_private_key(&self) -> bool {
        match self {
            Self::Ec(ec) => ec.d.is_some(),
            Self::Okp(okp) => okp.d.is_some(),
        }
    }

    /// Returns a copy of this key material without the private part.
    pub fn to_public(&self) -> Self {
        match self {
            Self::Ec(ec) => Self::Ec(EcKeyMaterial {
                d: None,
                ..ec.clone()
            }),
            Self::Okp(okp) => Self::Okp(OkpKeyMaterial {
                d: None,
                ..okp.clone()
            }),
        }
    }
}

impl FromStr for KeyMaterial {
    type Err = Error<KeyError>;

    fn from_str(jwk: &str) -> Result<Self, KeyError> {
        Self::decode(jwk)
    }
}

/// The JWK as it appears on the wire, before the key type and curve are
/// checked. It exists only to drive the (de)serialization of [`KeyMaterial`].
#[derive(Serialize, Deserialize)]
struct JwkUnverified {
    kty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kid: Option<String>,
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    key_use: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    crv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    y: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    d: Option<String>,
}

fn required_member(value: Option<String>, member: &'static str) -> Result<String, KeyError> {
    value.ok_or_else(|| Error::root(KeyError::KeyDecoding(format!("missing \"{member}\" member"))))
}

impl TryFrom<JwkUnverified> for KeyMaterial {
    type Error = Error<KeyError>;

    fn try_from(jwk: JwkUnverified) -> Result<Self, KeyError> {
        let params = JwkParams {
            kid: jwk.kid,
            key_use: jwk.key_use,
            alg: jwk.alg,
        };

        match jwk.kty.as_str() {
            kty if kty.eq_ignore_ascii_case(KTY_EC) => Ok(Self::Ec(EcKeyMaterial {
                crv: required_member(jwk.crv, "crv")?.parse()?,
                x: required_member(jwk.x, "x")?,
                y: required_member(jwk.y, "y")?,
                d: jwk.d,
                params,
            })),
            kty if kty.eq_ignore_ascii_case(KTY_OKP) => Ok(Self::Okp(OkpKeyMaterial {
                crv: required_member(jwk.crv, "crv")?.parse()?,
                x: required_member(jwk.x, "x")?,
                d: jwk.d,
                params,
            })),
            other => Err(Error::root(KeyError::UnsupportedKeyType(other.to_owned()))),
        }
    }
}

impl From<KeyMaterial> for JwkUnverified {
    fn from(key: KeyMaterial) -> Self {
        match key {
            KeyMaterial::Ec(ec) => Self {
                kty: KTY_EC.to_owned(),
                kid: ec.params.kid,
                key_use: ec.params.key_use,
                alg: ec.params.alg,
                crv: Some(ec.crv.as_str().to_owned()),
                x: Some(ec.x),
                y: Some(ec.y),
                d: ec.d,
            },
            KeyMaterial::Okp(okp) => Self {
                kty: KTY_OKP.to_owned(),
                kid: okp.params.kid,
                key_use: okp.params.key_use,
                alg: okp.params.alg,
                crv: Some(okp.crv.as_str().to_owned()),
                x: Some(okp.x),
                y: None,
                d: okp.d,
            },
        }
    }
}

/// Decodes a `base64url` key member and checks it has exactly the length the
/// curve requires.
pub(crate) fn decode_key_bytes(
    member: &'static str,
    value: &str,
    expected_len: usize,
) -> Result<Vec<u8>, KeyError> {
    let bytes = base64_url_decode(value)
        .foreign_err(|| KeyError::KeyDecoding(format!("\"{member}\" is not valid base64url")))?;

    if bytes.len() != expected_len {
        return Err(Error::root(KeyError::KeyDecoding(format!(
            "\"{member}\" has {} bytes, expected {expected_len}",
            bytes.len()
        ))));
    }

    Ok(bytes)
}

#[cfg(test)]
pub(crate) mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    pub(crate) const ED25519_JWK: &str = r#"{
        "kty": "OKP",
        "d": "yxinTCG98GILOk2A_eWber7nxyPWK6pAC9bEoZOgLZo",
        "use": "sig",
        "crv": "Ed25519",
        "kid": "ee0750b0-5f2a-4eef-9cb3-999ed6c4cd5d",
        "x": "rU9K49C18p2OiCTdPqfY9teM1IlT6Zqs7YTsE87GXi8",
        "alg": "EdDSA"
    }"#;

    pub(crate) const P256_JWK: &str = r#"{
        "kty": "EC",
        "d": "EqTTeRxKxq6mgir94l5v85SPaPNa2nFjjsF4f_F01wk",
        "use": "sig",
        "crv": "P-256",
        "kid": "sig-2023-11-29T09:47:41Z",
        "x": "3ntPwz46eNFy2D0IPa5K-bRVmgRyz0OIoda0qB1Quig",
        "y": "Rvcw8Gc-oXI9mlEaHw9SnOKIjHshuYBxy9Aws5ZmmQw",
        "alg": "ES256"
    }"#;

    pub(crate) const P384_JWK: &str = r#"{
        "kty": "EC",
        "d": "COtsb8N08bR-FcdbPNd3COsq2RKPuFOdeOC4ObkkILOy8bC7Z_GuvRwfbrfHedbb",
        "use": "sig",
        "crv": "P-384",
        "kid": "sig-2023-11-29T09:47:41Z",
        "x": "76WMpVgussZfUDkMPCurUErPTpYvnEH5vKA78fbHpZ1Oe1twbCS47ufg8WvtY-Ig",
        "y": "eKP4hqO5QcMOoFzw5t2NwmVnOBFjD78s8nsHhHYO5RgSR0kcWJn_RCZSgxxvKrN-",
        "alg": "ES384"
    }"#;

    pub(crate) const P521_JWK: &str = r#"{
        "kty": "EC",
        "d": "APtpz8owejNWpYT9n4cilu1ehkUlhYbvHtDKIlCZ4-s_QlOOPtxfG7-RhXygz7EIyEgZFlm2d0rS6irtHrL9Tgxy",
        "use": "sig",
        "crv": "P-521",
        "kid": "sig-2023-11-29T09:47:41Z",
        "x": "AeTy3GdADgDh2VwE05hDQXOBvejyyrhoaOVQgsR7A_h_NRf-CRuEQKyayrT1r39hTUxTWexPe9ZSnleDE7kaPIrH",
        "y": "ANHiOJpBZDUvxok1sXXbQvP2HK_xfueWqWBZSGfEZ7Rv-eIsDgv-EEDJVTocHsu6SewTHacsb532hDv1g4voSPHb",
        "alg": "ES512"
    }"#;

    #[test]
    fn decode_ec_key_material() {
        let key = KeyMaterial::decode(P384_JWK).unwrap();

        let KeyMaterial::Ec(ec) = &key else {
            panic!("expected EC key material, got {key:?}");
        };
        assert_eq!(ec.crv, EcCurve::P384);
        assert_eq!(
            ec.x,
            "76WMpVgussZfUDkMPCurUErPTpYvnEH5vKA78fbHpZ1Oe1twbCS47ufg8WvtY-Ig"
        );
        assert!(key.has_private_key());
        assert_eq!(key.kid(), Some("sig-2023-11-29T09:47:41Z"));
        assert_eq!(key.params().key_use.as_deref(), Some("sig"));
        assert_eq!(key.key_type(), KTY_EC);
        assert_eq!(key.signing_algorithm(), SigningAlgorithm::Es384);
    }

    #[test]
    fn decode_okp_key_material() {
        let key = KeyMaterial::decode(ED25519_JWK).unwrap();

        assert_matches!(
            &key,
            KeyMaterial::Okp(OkpKeyMaterial {
                crv: OkpCurve::Ed25519,
                d: Some(_),
                ..
            })
        );
        assert_eq!(key.curve_name(), "Ed25519");
        assert_eq!(key.signing_algorithm(), SigningAlgorithm::EdDsa);
    }

    #[test]
    fn key_types_and_curve_names_are_case_insensitive() {
        let key = KeyMaterial::from_value(json!({
            "kty": "EC",
            "crv": "p-521",
            "x": "AA",
            "y": "AA",
        }))
        .unwrap();

        assert_eq!(key.curve_name(), "P-521");

        let key = KeyMaterial::from_value(json!({
            "kty": "ec",
            "crv": "P-256",
            "x": "AA",
            "y": "AA",
        }))
        .unwrap();

        assert_eq!(key.key_type(), "EC");
        assert_eq!(key.curve_name(), "P-256");

        let key = KeyMaterial::from_value(json!({
            "kty": "okp",
            "crv": "ed25519",
            "x": "AA",
        }))
        .unwrap();

        assert_eq!(key.key_type(), "OKP");
        assert_eq!(key.curve_name(), "Ed25519");
    }

    #[test]
    fn unsupported_key_type_is_rejected() {
        let error = KeyMaterial::from_value(json!({
            "kty": "RSA",
            "n": "0vx7agoebGcQSuuPiLJXZptN9nndrQmbXEps2aiAFbWhM78LhWx4cbbfAAtVT86zwu1RK7aPFFxuhDR1L6tSoc_BJECPebWKRXjBZCiFV4n3oknjhMstn64tZ_2W-5JsGY4Hc5n9yBXArwl93lqt7_RN5w6Cf0h4QyQ5v-65YGjQR0_FDW2QvzqY368QQMicAtaSqzs8KJZgnYb9c7d0zgdAZHzu6qMQvRL5hajrn1n91CbOpbISD08qNLyrdkt-bFTWhAI4vMQFh6WeZu0fM4lFd2NcRwr3XPksINHaQ-G_xBniIqbw0Ls1jF44-csFCur-kEgU8awapJzKnqDKgw",
            "e": "AQAB",
        }))
        .unwrap_err();

        assert_eq!(error.error, KeyError::UnsupportedKeyType("RSA".to_owned()));
    }

    #[test]
    fn unsupported_curves_are_rejected() {
        let error = KeyMaterial::from_value(json!({
            "kty": "EC",
            "crv": "secp256k1",
            "x": "AA",
            "y": "AA",
        }))
        .unwrap_err();
        assert_eq!(
            error.error,
            KeyError::UnsupportedCurve("secp256k1".to_owned())
        );

        // `X25519` is a valid `OKP` curve, but not a signing one.
        let error = KeyMaterial::from_value(json!({
            "kty": "OKP",
            "crv": "X25519",
            "x": "AA",
        }))
        .unwrap_err();
        assert_eq!(error.error, KeyError::UnsupportedCurve("X25519".to_owned()));

        // Curves are bound to the key type.
        let error = KeyMaterial::from_value(json!({
            "kty": "OKP",
            "crv": "P-256",
            "x": "AA",
        }))
        .unwrap_err();
        assert_eq!(error.error, KeyError::UnsupportedCurve("P-256".to_owned()));
    }

    #[test]
    fn malformed_jwks_are_rejected() {
        for jwk in [
            "not json",
            "[]",
            r#"{"crv": "P-256", "x": "AA", "y": "AA"}"#,
            r#"{"kty": "EC", "crv": "P-256", "x": 1, "y": "AA"}"#,
            r#"{"kty": "EC", "crv": "P-256", "x": "AA"}"#,
            r#"{"kty": "OKP", "x": "AA"}"#,
        ] {
            let error = KeyMaterial::decode(jwk).unwrap_err();
            assert_matches!(error.error, KeyError::KeyDecoding(_), "input: {jwk}");
        }
    }

    #[test]
    fn key_material_reencodes_as_jwk() {
        let key = KeyMaterial::decode(P256_JWK).unwrap();
        let original: Value = serde_json::from_str(P256_JWK).unwrap();

        assert_eq!(serde_json::to_value(&key).unwrap(), original);

        let public = key.to_public();
        assert!(!public.has_private_key());

        let mut expected = original;
        expected.as_object_mut().unwrap().remove("d");
        assert_eq!(serde_json::to_value(&public).unwrap(), expected);
    }

    #[test]
    fn decode_key_bytes_checks_length() {
        assert_eq!(decode_key_bytes("x", "AAEC", 3).unwrap(), vec![0, 1, 2]);

        let error = decode_key_bytes("x", "AAEC", 32).unwrap_err();
        assert_eq!(
            error.error,
            KeyError::KeyDecoding("\"x\" has 3 bytes, expected 32".to_owned())
        );

        let error = decode_key_bytes("y", "A=A", 32).unwrap_err();
        assert_eq!(
            error.error,
            KeyError::KeyDecoding("\"y\" is not valid base64url".to_owned())
        );
    }
}
