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

use crate::DecodingError;

/// Format error related to splitting and decoding an SD-JWT wire string.
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum FormatError {
    /// Error indicating that the token does not consist of exactly three
    /// `.`-separated segments; carries the number of segments found.
    #[strum(to_string = "Malformed token: expected 3 segments, found {0}")]
    MalformedToken(usize),

    /// Error indicating that one of the token segments could not be decoded.
    #[strum(to_string = "Decoding error: {0}")]
    Decoding(DecodingError),
}

impl bherror::BhError for FormatError {}

/// Result type used across the crate.
pub type Result<T, E> = bherror::Result<T, E>;
