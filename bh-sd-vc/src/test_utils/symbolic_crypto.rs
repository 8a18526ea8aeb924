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

use std::borrow::Cow;

use bh_vc_keys::{BoxError, SignatureVerifier, Signer, SigningAlgorithm};
use serde::{Deserialize, Serialize};

pub(crate) const DUMMY_KEY_ID: &str = "test key id";

pub(crate) struct StubSigner {
    pub(crate) key_id: String,
    pub(crate) algorithm: SigningAlgorithm,
}

/// Symbolic signature over the given message with the would-be private key
/// identified by the given key id, in lieu of a real signature algorithm.
///
/// Bulky, but tests the important thing: over which message and using which
/// key pair was the signature produced, regardless of the (correctness of
/// the) implementation of the signature algorithm.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct StubSignature<'m, 'k>(Cow<'m, [u8]>, Cow<'k, str>);

impl StubSignature<'_, '_> {
    pub(crate) fn verify(&self, message: &[u8], key_id: &str) -> bool {
        self == &StubSignature(message.into(), Cow::Borrowed(key_id))
    }
}

impl Signer for StubSigner {
    fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, BoxError> {
        Ok(
            serde_json::to_string(&StubSignature(message.into(), Cow::Borrowed(&self.key_id)))?
                .into_bytes(),
        )
    }
}

impl Default for StubSigner {
    fn default() -> Self {
        Self {
            key_id: DUMMY_KEY_ID.to_owned(),
            algorithm: SigningAlgorithm::Es256,
        }
    }
}

#[derive(Clone)]
pub(crate) struct StubVerifier {
    pub(crate) key_id: String,
}

impl Default for StubVerifier {
    fn default() -> Self {
        Self {
            key_id: DUMMY_KEY_ID.to_owned(),
        }
    }
}

impl StubVerifier {
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
        }
    }
}

impl SignatureVerifier for StubVerifier {
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(symbolic_signature) = serde_json::from_slice::<StubSignature>(signature) else {
            return false;
        };
        symbolic_signature.verify(message, &self.key_id)
    }
}

/// A [`Signer`] that always fails.
pub(crate) struct FailingSigner;

impl Signer for FailingSigner {
    fn algorithm(&self) -> SigningAlgorithm {
        SigningAlgorithm::Es256
    }

    fn sign(&self, _message: &[u8]) -> Result<Vec<u8>, BoxError> {
        Err("signing key is unavailable".into())
    }
}
