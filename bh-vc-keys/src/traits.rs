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

use crate::{error::SignatureError, utils::BoxError};

/// Signature algorithms supported for signing Verifiable Credentials.
///
/// Each algorithm is bound to exactly one curve of the supported
/// [`KeyMaterial`](crate::KeyMaterial) variants, as registered in [RFC7518]
/// and [RFC8037].
///
/// [RFC7518]: https://datatracker.ietf.org/doc/html/rfc7518#section-3.1
/// [RFC8037]: https://datatracker.ietf.org/doc/html/rfc8037#section-3.1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SigningAlgorithm {
    /// ECDSA over P-256 with SHA-256
    Es256,
    /// ECDSA over P-384 with SHA-384
    Es384,
    /// ECDSA over P-521 with SHA-512
    Es512,
    /// EdDSA over Ed25519
    #[serde(rename = "EdDSA")]
    EdDsa,
}

/// JWS `"alg"` header parameter value for digital signature algorithm
/// **ECDSA using P-256 and SHA-256**, as specified in [RFC7518].
///
/// [RFC7518]: https://datatracker.ietf.org/doc/html/rfc7518#section-3.1
pub const SIGNING_ALG_ES256: &str = "ES256";
/// JWS `"alg"` header parameter value for digital signature algorithm
/// **ECDSA using P-384 and SHA-384**, as specified in [RFC7518].
///
/// [RFC7518]: https://datatracker.ietf.org/doc/html/rfc7518#section-3.1
pub const SIGNING_ALG_ES384: &str = "ES384";
/// JWS `"alg"` header parameter value for digital signature algorithm
/// **ECDSA using P-521 and SHA-512**, as specified in [RFC7518].
///
/// [RFC7518]: https://datatracker.ietf.org/doc/html/rfc7518#section-3.1
pub const SIGNING_ALG_ES512: &str = "ES512";
/// JWS `"alg"` header parameter value for the **Edwards-curve digital
/// signature algorithm**, as specified in [RFC8037].
///
/// [RFC8037]: https://datatracker.ietf.org/doc/html/rfc8037#section-3.1
pub const SIGNING_ALG_EDDSA: &str = "EdDSA";

impl SigningAlgorithm {
    /// Returns the JWS `"alg"` header parameter value of the algorithm.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Es256 => SIGNING_ALG_ES256,
            Self::Es384 => SIGNING_ALG_ES384,
            Self::Es512 => SIGNING_ALG_ES512,
            Self::EdDsa => SIGNING_ALG_EDDSA,
        }
    }
}

impl FromStr for SigningAlgorithm {
    type Err = Error<SignatureError>;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            SIGNING_ALG_ES256 => Ok(SigningAlgorithm::Es256),
            SIGNING_ALG_ES384 => Ok(SigningAlgorithm::Es384),
            SIGNING_ALG_ES512 => Ok(SigningAlgorithm::Es512),
            SIGNING_ALG_EDDSA => Ok(SigningAlgorithm::EdDsa),
            _ => Err(Error::root(SignatureError::InvalidSigningAlgorithm(
                value.to_string(),
            ))),
        }
    }
}

impl std::fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An external signing backend, to be used for computing a JWS signature.
///
/// The output of the signer, regardless of the algorithm, must be a valid **JWS signature**.
/// See step 5 in [section 5.1 of RFC7515](https://www.rfc-editor.org/rfc/rfc7515.html#section-5.1)
/// for more information.
///
/// Implementations may block (e.g. hardware-backed keys); callers are
/// responsible for any timeouts.
pub trait Signer {
    /// The algorithm this signer uses. Must be a constant function.
    fn algorithm(&self) -> SigningAlgorithm;

    /// Produce a JWS signature as a byte array, not yet base64url-encoded.
    ///
    /// The `message` is guaranteed to be a valid JWS signing input.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, BoxError>;
}

impl<S: Signer + ?Sized> Signer for &S {
    fn algorithm(&self) -> SigningAlgorithm {
        (**self).algorithm()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, BoxError> {
        (**self).sign(message)
    }
}

/// An external backend for signature verification, bound to a single public
/// key.
pub trait SignatureVerifier {
    /// Verifies the JWS `signature` over the `message`.
    ///
    /// Returns `true` only if the signature is valid. A signature that cannot
    /// be checked at all (e.g. has the wrong length) is reported as `false`,
    /// since an invalid signature is an expected outcome for the caller to
    /// branch on.
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool;
}

impl<V: SignatureVerifier + ?Sized> SignatureVerifier for &V {
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        (**self).verify(message, signature)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[test]
    fn signing_algorithms_serialize_correctly() {
        struct TestCase {
            alg: SigningAlgorithm,
            expected_name: &'static str,
        }

        let test_cases = [
            TestCase {
                alg: SigningAlgorithm::Es256,
                expected_name: "ES256",
            },
            TestCase {
                alg: SigningAlgorithm::Es384,
                expected_name: "ES384",
            },
            TestCase {
                alg: SigningAlgorithm::Es512,
                expected_name: "ES512",
            },
            TestCase {
                alg: SigningAlgorithm::EdDsa,
                expected_name: "EdDSA",
            },
        ];

        for TestCase { alg, expected_name } in test_cases {
            let serialized = serde_json::to_string(&alg).unwrap();
            assert_eq!(serialized, format!("\"{expected_name}\""));

            let deserialized: SigningAlgorithm = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, alg);

            assert_eq!(alg.to_string(), expected_name);
            assert_eq!(expected_name.parse::<SigningAlgorithm>().unwrap(), alg);
        }
    }

    #[test]
    fn unknown_signing_algorithm_is_rejected() {
        let error = "none".parse::<SigningAlgorithm>().unwrap_err();

        assert_eq!(
            error.error,
            SignatureError::InvalidSigningAlgorithm("none".to_string())
        );
    }
}
