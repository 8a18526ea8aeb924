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

/// Error in decoding a JSON Web Key into usable key material.
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum KeyError {
    /// Error that occurs when the `kty` member names a key type that is not
    /// supported.
    #[strum(to_string = "Unsupported key type: {0}")]
    UnsupportedKeyType(String),
    /// Error that occurs when the `crv` member names a curve that is not
    /// supported for the key type.
    #[strum(to_string = "Unsupported curve: {0}")]
    UnsupportedCurve(String),
    /// Error that occurs when the key members are missing or malformed, or do
    /// not describe a valid key.
    #[strum(to_string = "Key decoding failed: {0}")]
    KeyDecoding(String),
}

impl bherror::BhError for KeyError {}

/// Error in JWS signature
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum SignatureError {
    /// Error that occurs when the signing algorithm is invalid
    #[strum(to_string = "Invalid signing algorithm {0}")]
    InvalidSigningAlgorithm(String),
}

impl bherror::BhError for SignatureError {}

/// Cryptographic error
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum CryptoError {
    /// Error that occurs when key generation failed
    #[strum(to_string = "Key generation failed")]
    KeyGenerationFailed,
    /// Error that occurs when the cryptographic backend
    /// unexpectedly failed
    #[strum(to_string = "Crypto backend failed")]
    CryptoBackend,
}

impl bherror::BhError for CryptoError {}
