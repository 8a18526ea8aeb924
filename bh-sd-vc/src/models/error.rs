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

/// The segment of an SD-JWT wire string that failed to decode.
#[derive(strum_macros::Display, Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenSegment {
    /// The `base64url`-encoded JWT header.
    #[strum(to_string = "header")]
    Header,
    /// The `base64url`-encoded JWT payload.
    #[strum(to_string = "payload")]
    Payload,
    /// A `base64url`-encoded disclosure.
    #[strum(to_string = "disclosure")]
    Disclosure,
}

/// Error type defining possible decoding errors while parsing SD-JWT segments,
/// disclosures and claim values.
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum DecodingError {
    /// Error indicating that a segment is not valid `base64url` without
    /// padding.
    #[strum(to_string = "Invalid base64url in {0}")]
    InvalidBase64(TokenSegment),

    /// Error indicating that a decoded segment is not valid JSON or does not
    /// match the expected structure.
    #[strum(to_string = "Invalid JSON in {0}")]
    InvalidJson(TokenSegment),

    /// Error indicating that the disclosure array is in an invalid format.
    #[strum(to_string = "Invalid disclosure: {0}")]
    InvalidDisclosure(String),

    /// Error indicating that a claim value is not one of the supported
    /// shapes; carries a short description of the offending value.
    #[strum(to_string = "Unsupported claim value shape: {0}")]
    UnsupportedValueShape(String),

    /// Error indicating that the hash algorithm name is invalid or not
    /// supported.
    #[strum(to_string = "Invalid hash algorithm name: {0}")]
    InvalidHashAlgorithmName(String),
}

impl bherror::BhError for DecodingError {}

pub(crate) type DecodingResult<T> = bherror::Result<T, DecodingError>;
