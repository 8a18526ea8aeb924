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

use bh_vc_keys::KeyMaterial;
use serde::{Deserialize, Serialize};

mod disclosure;
mod error;
mod value;

pub use disclosure::*;
pub(crate) use error::DecodingResult;
pub use error::{DecodingError, TokenSegment};
pub use value::*;

/// Seconds elapsed since the Unix epoch, as used by the `iat`, `nbf` and
/// `exp` claims.
pub type SecondsSinceEpoch = u64;

/// The `base64url`-encoded salt of a [`Disclosure`].
pub type Salt = String;

/// The `base64url`-encoded digest of a [`Disclosure`] or a decoy.
pub type Digest = String;

/// The `cnf` claim of the SD-JWT, containing the public key to bind with the credential.
///
/// See the [draft] and [RFC7800] for details.
///
/// [draft]: https://datatracker.ietf.org/doc/html/draft-ietf-oauth-selective-disclosure-jwt-08#section-5.1.2
/// [RFC7800]: https://www.rfc-editor.org/rfc/rfc7800.html#section-3
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CnfClaim {
    /// Public key bound to the credential.
    pub jwk: KeyMaterial,
}

/// The `status` claim of the SD-JWT, pointing to the status list entry of the
/// credential.
///
/// The claim is carried through as-is; its content is never checked.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusClaim {
    /// Index of the credential within the status list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_list_index: Option<String>,

    /// Identifier of the status entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Type of the status entry.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub status_type: Option<String>,

    /// Location of the status list credential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_list_credential: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn status_claim_uses_camel_case_members() {
        let status = StatusClaim {
            status_list_index: Some("94567".to_owned()),
            id: Some("https://example.com/credentials/status/3#94567".to_owned()),
            status_type: Some("StatusList2021Entry".to_owned()),
            status_list_credential: Some("https://example.com/credentials/status/3".to_owned()),
        };

        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(
            value,
            json!({
                "statusListIndex": "94567",
                "id": "https://example.com/credentials/status/3#94567",
                "type": "StatusList2021Entry",
                "statusListCredential": "https://example.com/credentials/status/3",
            })
        );
        assert_eq!(serde_json::from_value::<StatusClaim>(value).unwrap(), status);

        assert_eq!(serde_json::to_value(StatusClaim::default()).unwrap(), json!({}));
        assert_eq!(
            serde_json::from_value::<StatusClaim>(json!({})).unwrap(),
            StatusClaim::default()
        );
    }

    #[test]
    fn cnf_claim_with_invalid_jwk_fails_to_decode() {
        let cnf = json!({"jwk": {"kty": "RSA", "n": "AQAB", "e": "AQAB"}});

        assert!(serde_json::from_value::<CnfClaim>(cnf).is_err());
    }
}
