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

use std::result::Result as StdResult;

use bherror::{
    traits::{ErrorContext as _, ForeignError as _, PropagateError as _},
    Error, Result,
};
use openssl::{
    bn::{BigNum, BigNumContext},
    ec::{EcGroup, EcKey, EcKeyRef, EcPoint},
    ecdsa::EcdsaSig,
    error::ErrorStack,
    nid::Nid,
    pkey::{HasPublic, Id, PKey, Private, Public},
    sha::{sha256, sha384, sha512},
};

use crate::{
    error::{CryptoError, KeyError},
    jwk::decode_key_bytes,
    utils::base64_url_encode,
    BoxError, EcCurve, EcKeyMaterial, JwkParams, KeyMaterial, OkpCurve, OkpKeyMaterial,
    SignatureVerifier, Signer, SigningAlgorithm,
};

// X9_62_PRIME256V1 is basically an alias for secp256r1
//
// ------------------------------------------
//           Curve names chosen by
//      different standards organizations
// ------------+---------------+-------------
// SECG        |  ANSI X9.62   |  NIST
// ------------+---------------+-------------
// secp256r1   |  prime256v1   |   NIST P-256
// secp384r1   |               |   NIST P-384
// secp521r1   |               |   NIST P-521
//
// source: https://tools.ietf.org/search/rfc4492#appendix-A
fn curve_nid(curve: EcCurve) -> Nid {
    match curve {
        EcCurve::P256 => Nid::X9_62_PRIME256V1,
        EcCurve::P384 => Nid::SECP384R1,
        EcCurve::P521 => Nid::SECP521R1,
    }
}

fn ec_group(curve: EcCurve) -> StdResult<EcGroup, ErrorStack> {
    EcGroup::from_curve_name(curve_nid(curve))
}

/// Hashes the JWS signing input with the hash function bound to the curve's
/// `ES*` algorithm.
fn message_digest(curve: EcCurve, message: &[u8]) -> Vec<u8> {
    match curve {
        EcCurve::P256 => sha256(message).to_vec(),
        EcCurve::P384 => sha384(message).to_vec(),
        EcCurve::P521 => sha512(message).to_vec(),
    }
}

/// Returns the affine coordinates of the EC key, each padded to the
/// coordinate length of the curve.
fn affine_coordinates<T: HasPublic>(
    key: &EcKeyRef<T>,
    curve: EcCurve,
) -> StdResult<(Vec<u8>, Vec<u8>), ErrorStack> {
    let mut x = BigNum::new()?;
    let mut y = BigNum::new()?;
    let mut ctx = BigNumContext::new()?;
    key.public_key()
        .affine_coordinates(key.group(), &mut x, &mut y, &mut ctx)?;

    let len = curve.coordinate_len() as i32;
    Ok((x.to_vec_padded(len)?, y.to_vec_padded(len)?))
}

fn ec_public_from_coordinates(
    curve: EcCurve,
    x: &[u8],
    y: &[u8],
) -> StdResult<EcKey<Public>, ErrorStack> {
    let group = ec_group(curve)?;
    let x = BigNum::from_slice(x)?;
    let y = BigNum::from_slice(y)?;
    EcKey::from_public_key_affine_coordinates(&group, &x, &y)
}

fn ec_private_from_scalar(curve: EcCurve, d: &[u8]) -> StdResult<EcKey<Private>, ErrorStack> {
    let group = ec_group(curve)?;
    let d = BigNum::from_slice(d)?;
    let mut ctx = BigNumContext::new()?;
    let mut public_point = EcPoint::new(&group)?;
    public_point.mul_generator2(&group, &d, &mut ctx)?;

    let key = EcKey::from_private_components(&group, &d, &public_point)?;
    key.check_key()?;
    Ok(key)
}

/// A public key, usable for verifying JWS signatures of its curve's
/// algorithm.
#[derive(Debug, Clone)]
pub enum PublicKey {
    /// ECDSA public key over one of the NIST curves.
    Ec {
        /// The curve of the key.
        curve: EcCurve,
        /// The key itself.
        key: EcKey<Public>,
    },
    /// Ed25519 public key.
    Ed25519(PKey<Public>),
}

/// A private key, usable for producing JWS signatures of its curve's
/// algorithm.
#[derive(Debug, Clone)]
pub enum PrivateKey {
    /// ECDSA private key over one of the NIST curves.
    Ec {
        /// The curve of the key.
        curve: EcCurve,
        /// The key itself.
        key: EcKey<Private>,
    },
    /// Ed25519 private key.
    Ed25519(PKey<Private>),
}

impl KeyMaterial {
    /// Constructs the curve-specific public key.
    ///
    /// For `EC` keys, `x` and `y` must each decode to exactly the coordinate
    /// length of the curve and together describe a point on the curve. For
    /// `OKP` keys, `x` must decode to a 32-byte Ed25519 public key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::KeyDecoding`] if the key members are malformed.
    pub fn public_key(&self) -> Result<PublicKey, KeyError> {
        match self {
            Self::Ec(ec) => ec_public_key(ec),
            Self::Okp(okp) => okp_public_key(okp),
        }
        .ctx(|| format!("invalid {} public key", self.curve_name()))
    }

    /// Constructs the curve-specific private key from the `d` member.
    ///
    /// If the public part (`x`, and `y` for `EC`) is valid, it must belong to
    /// the private key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::KeyDecoding`] if `d` is absent or malformed, or if
    /// it does not match the public part.
    pub fn private_key(&self) -> Result<PrivateKey, KeyError> {
        let private_key = match self {
            Self::Ec(ec) => ec_private_key(ec),
            Self::Okp(okp) => okp_private_key(okp),
        }
        .ctx(|| format!("invalid {} private key", self.curve_name()))?;

        if let Ok(public_key) = self.public_key() {
            let matches = private_key
                .public_key()
                .and_then(|derived| Ok(derived.raw_bytes()? == public_key.raw_bytes()?))
                .with_err(|| KeyError::KeyDecoding("crypto backend failed".to_owned()))?;
            if !matches {
                return Err(Error::root(KeyError::KeyDecoding(
                    "\"d\" does not match the public key".to_owned(),
                )));
            }
        }

        Ok(private_key)
    }
}

fn ec_public_key(ec: &EcKeyMaterial) -> Result<PublicKey, KeyError> {
    let len = ec.crv.coordinate_len();
    let x = decode_key_bytes("x", &ec.x, len)?;
    let y = decode_key_bytes("y", &ec.y, len)?;

    let key = ec_public_from_coordinates(ec.crv, &x, &y).foreign_err(|| {
        KeyError::KeyDecoding("coordinates are not a point on the curve".to_owned())
    })?;

    Ok(PublicKey::Ec { curve: ec.crv, key })
}

fn okp_public_key(okp: &OkpKeyMaterial) -> Result<PublicKey, KeyError> {
    let x = decode_key_bytes("x", &okp.x, okp.crv.key_len())?;

    match okp.crv {
        OkpCurve::Ed25519 => {
            let key = PKey::public_key_from_raw_bytes(&x, Id::ED25519).foreign_err(|| {
                KeyError::KeyDecoding("\"x\" is not an Ed25519 public key".to_owned())
            })?;
            Ok(PublicKey::Ed25519(key))
        }
    }
}

fn missing_private_part() -> Error<KeyError> {
    Error::root(KeyError::KeyDecoding("missing \"d\" member".to_owned()))
}

fn ec_private_key(ec: &EcKeyMaterial) -> Result<PrivateKey, KeyError> {
    let d = ec.d.as_deref().ok_or_else(missing_private_part)?;
    let d = decode_key_bytes("d", d, ec.crv.coordinate_len())?;

    let key = ec_private_from_scalar(ec.crv, &d).foreign_err(|| {
        KeyError::KeyDecoding("\"d\" is not a private scalar of the curve".to_owned())
    })?;

    Ok(PrivateKey::Ec { curve: ec.crv, key })
}

fn okp_private_key(okp: &OkpKeyMaterial) -> Result<PrivateKey, KeyError> {
    let d = okp.d.as_deref().ok_or_else(missing_private_part)?;
    let d = decode_key_bytes("d", d, okp.crv.key_len())?;

    match okp.crv {
        OkpCurve::Ed25519 => {
            let key = PKey::private_key_from_raw_bytes(&d, Id::ED25519).foreign_err(|| {
                KeyError::KeyDecoding("\"d\" is not an Ed25519 private key".to_owned())
            })?;
            Ok(PrivateKey::Ed25519(key))
        }
    }
}

impl PublicKey {
    /// The algorithm of the signatures this key verifies.
    pub fn algorithm(&self) -> SigningAlgorithm {
        match self {
            Self::Ec { curve, .. } => curve.signing_algorithm(),
            Self::Ed25519(_) => OkpCurve::Ed25519.signing_algorithm(),
        }
    }

    /// Returns the raw public key bytes: `x‖y` for `EC` keys, each coordinate
    /// padded to the curve's coordinate length, and the 32-byte public key
    /// for Ed25519.
    pub fn raw_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        match self {
            Self::Ec { curve, key } => {
                let (mut x, y) = affine_coordinates(key, *curve)
                    .foreign_err(|| CryptoError::CryptoBackend)?;
                x.extend_from_slice(&y);
                Ok(x)
            }
            Self::Ed25519(key) => key
                .raw_public_key()
                .foreign_err(|| CryptoError::CryptoBackend),
        }
    }

    /// Construct the public JWK for this key, with the given `kid`.
    pub fn to_jwk(&self, kid: Option<&str>) -> Result<KeyMaterial, CryptoError> {
        let params = JwkParams {
            kid: kid.map(str::to_owned),
            key_use: Some("sig".to_owned()),
            alg: Some(self.algorithm().to_string()),
        };

        match self {
            Self::Ec { curve, key } => {
                let (x, y) =
                    affine_coordinates(key, *curve).foreign_err(|| CryptoError::CryptoBackend)?;
                Ok(KeyMaterial::Ec(EcKeyMaterial {
                    crv: *curve,
                    x: base64_url_encode(x),
                    y: base64_url_encode(y),
                    d: None,
                    params,
                }))
            }
            Self::Ed25519(key) => {
                let x = key
                    .raw_public_key()
                    .foreign_err(|| CryptoError::CryptoBackend)?;
                Ok(KeyMaterial::Okp(OkpKeyMaterial {
                    crv: OkpCurve::Ed25519,
                    x: base64_url_encode(x),
                    d: None,
                    params,
                }))
            }
        }
    }

    fn verify_signature(&self, message: &[u8], signature: &[u8]) -> StdResult<bool, ErrorStack> {
        match self {
            Self::Ec { curve, key } => {
                let len = curve.coordinate_len();
                if signature.len() != 2 * len {
                    return Ok(false);
                }
                let (r, s) = signature.split_at(len);
                let r = BigNum::from_slice(r)?;
                let s = BigNum::from_slice(s)?;
                let ecdsa_sig = EcdsaSig::from_private_components(r, s)?;

                ecdsa_sig.verify(&message_digest(*curve, message), key)
            }
            Self::Ed25519(key) => {
                openssl::sign::Verifier::new_without_digest(key)?.verify_oneshot(signature, message)
            }
        }
    }
}

impl SignatureVerifier for PublicKey {
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        self.verify_signature(message, signature).unwrap_or(false)
    }
}

impl PrivateKey {
    /// Generate a fresh key on the given `EC` curve.
    pub fn generate_ec(curve: EcCurve) -> Result<Self, CryptoError> {
        let group = ec_group(curve).foreign_err(|| CryptoError::CryptoBackend)?;
        let key = EcKey::generate(&group).foreign_err(|| CryptoError::KeyGenerationFailed)?;

        Ok(Self::Ec { curve, key })
    }

    /// Generate a fresh Ed25519 key.
    pub fn generate_ed25519() -> Result<Self, CryptoError> {
        let key = PKey::generate_ed25519().foreign_err(|| CryptoError::KeyGenerationFailed)?;

        Ok(Self::Ed25519(key))
    }

    /// Returns the public counterpart of this key.
    pub fn public_key(&self) -> Result<PublicKey, CryptoError> {
        match self {
            Self::Ec { curve, key } => {
                let public = EcKey::from_public_key(key.group(), key.public_key())
                    .foreign_err(|| CryptoError::CryptoBackend)?;
                Ok(PublicKey::Ec {
                    curve: *curve,
                    key: public,
                })
            }
            Self::Ed25519(key) => {
                let raw = key
                    .raw_public_key()
                    .foreign_err(|| CryptoError::CryptoBackend)?;
                let public = PKey::public_key_from_raw_bytes(&raw, Id::ED25519)
                    .foreign_err(|| CryptoError::CryptoBackend)?;
                Ok(PublicKey::Ed25519(public))
            }
        }
    }

    /// Construct the private JWK for this key, with the given `kid`.
    ///
    /// **Note**: the result contains the private part of the key in the `d`
    /// member.
    pub fn to_jwk(&self, kid: Option<&str>) -> Result<KeyMaterial, CryptoError> {
        let public_jwk = self.public_key()?.to_jwk(kid)?;

        let d = match self {
            Self::Ec { curve, key } => key
                .private_key()
                .to_vec_padded(curve.coordinate_len() as i32)
                .foreign_err(|| CryptoError::CryptoBackend)?,
            Self::Ed25519(key) => key
                .raw_private_key()
                .foreign_err(|| CryptoError::CryptoBackend)?,
        };

        Ok(match public_jwk {
            KeyMaterial::Ec(ec) => KeyMaterial::Ec(EcKeyMaterial {
                d: Some(base64_url_encode(d)),
                ..ec
            }),
            KeyMaterial::Okp(okp) => KeyMaterial::Okp(OkpKeyMaterial {
                d: Some(base64_url_encode(d)),
                ..okp
            }),
        })
    }
}

impl Signer for PrivateKey {
    fn algorithm(&self) -> SigningAlgorithm {
        match self {
            Self::Ec { curve, .. } => curve.signing_algorithm(),
            Self::Ed25519(_) => OkpCurve::Ed25519.signing_algorithm(),
        }
    }

    fn sign(&self, message: &[u8]) -> StdResult<Vec<u8>, BoxError> {
        match self {
            Self::Ec { curve, key } => {
                let signature = EcdsaSig::sign(&message_digest(*curve, message), key)?;

                // JWS signatures are the fixed-width concatenation `r‖s`
                let len = curve.coordinate_len() as i32;
                let mut jws = signature.r().to_vec_padded(len)?;
                jws.extend_from_slice(&signature.s().to_vec_padded(len)?);
                Ok(jws)
            }
            Self::Ed25519(key) => {
                let mut signer = openssl::sign::Signer::new_without_digest(key)?;
                Ok(signer.sign_oneshot_to_vec(message)?)
            }
        }
    }
}
