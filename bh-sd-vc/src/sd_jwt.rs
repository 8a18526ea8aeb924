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

use std::{fmt, str::FromStr};

use bh_vc_keys::construct_jws_payload;
use bherror::Error;

use crate::error::FormatError;

const JWS_DELIMITER: char = '.';
const SD_JWT_DELIMITER: char = '~';

/// The segments of an SD-JWT wire string, still in their `base64url`-encoded
/// form.
///
/// The wire format is `<header>.<payload>[.<signature>]~<d1>~...~<dn>`, with
/// the signature segment left empty for unsigned tokens and no trailing `~`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SdJwt {
    pub(crate) header: String,
    pub(crate) payload: String,
    pub(crate) signature: Option<String>,
    pub(crate) disclosures: Vec<String>,
}

impl SdJwt {
    /// The `JWS` signing input, i.e. `<header>.<payload>`.
    pub(crate) fn signing_input(&self) -> String {
        construct_jws_payload(&self.header, &self.payload)
    }
}

impl FromStr for SdJwt {
    type Err = Error<FormatError>;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = value.split(JWS_DELIMITER).collect();
        let [header, payload, rest] = segments[..] else {
            return Err(Error::root(FormatError::MalformedToken(segments.len())));
        };

        let mut pieces: Vec<&str> = rest.split(SD_JWT_DELIMITER).collect();
        // tolerate the trailing `~` of the standard compact serialization
        if pieces.len() > 1 && pieces.last() == Some(&"") {
            pieces.pop();
        }
        let mut pieces = pieces.into_iter();

        let signature = pieces
            .next()
            .filter(|signature| !signature.is_empty())
            .map(str::to_owned);
        let disclosures = pieces.map(str::to_owned).collect();

        Ok(Self {
            header: header.to_owned(),
            payload: payload.to_owned(),
            signature,
            disclosures,
        })
    }
}

impl fmt::Display for SdJwt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{JWS_DELIMITER}{}", self.header, self.payload)?;
        if let Some(signature) = &self.signature {
            write!(f, "{JWS_DELIMITER}{signature}")?;
        }
        for disclosure in &self.disclosures {
            write!(f, "{SD_JWT_DELIMITER}{disclosure}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn split_signed_token_with_disclosures() {
        let sd_jwt: SdJwt = "aGVhZA.cGF5bG9hZA.c2ln~ZDE~ZDI".parse().unwrap();

        assert_eq!(sd_jwt.header, "aGVhZA");
        assert_eq!(sd_jwt.payload, "cGF5bG9hZA");
        assert_eq!(sd_jwt.signature.as_deref(), Some("c2ln"));
        assert_eq!(sd_jwt.disclosures, ["ZDE", "ZDI"]);
        assert_eq!(sd_jwt.signing_input(), "aGVhZA.cGF5bG9hZA");
        assert_eq!(sd_jwt.to_string(), "aGVhZA.cGF5bG9hZA.c2ln~ZDE~ZDI");
    }

    #[test]
    fn split_unsigned_token() {
        let sd_jwt: SdJwt = "aGVhZA.cGF5bG9hZA.~ZDE".parse().unwrap();

        assert_eq!(sd_jwt.signature, None);
        assert_eq!(sd_jwt.disclosures, ["ZDE"]);

        let sd_jwt: SdJwt = "aGVhZA.cGF5bG9hZA.".parse().unwrap();

        assert_eq!(sd_jwt.signature, None);
        assert!(sd_jwt.disclosures.is_empty());
    }

    #[test]
    fn trailing_tilde_is_tolerated() {
        let sd_jwt: SdJwt = "aGVhZA.cGF5bG9hZA.c2ln~ZDE~".parse().unwrap();
        assert_eq!(sd_jwt.disclosures, ["ZDE"]);

        let sd_jwt: SdJwt = "aGVhZA.cGF5bG9hZA.c2ln~".parse().unwrap();
        assert_eq!(sd_jwt.signature.as_deref(), Some("c2ln"));
        assert!(sd_jwt.disclosures.is_empty());
    }

    #[test]
    fn join_has_no_trailing_tilde() {
        let sd_jwt = SdJwt {
            header: "aGVhZA".to_owned(),
            payload: "cGF5bG9hZA".to_owned(),
            signature: None,
            disclosures: vec!["ZDE".to_owned()],
        };

        assert_eq!(sd_jwt.to_string(), "aGVhZA.cGF5bG9hZA~ZDE");
    }

    #[test]
    fn wrong_segment_count_is_malformed() {
        for (token, count) in [
            ("", 1),
            ("aGVhZA", 1),
            ("aGVhZA.cGF5bG9hZA", 2),
            ("aGVhZA.cGF5bG9hZA~ZDE", 2),
            ("a.b.c.d", 4),
            ("a.b.c~d.e", 4),
        ] {
            let error = token.parse::<SdJwt>().unwrap_err();
            assert_matches!(error.error, FormatError::MalformedToken(n) if n == count);
        }
    }
}
