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

use std::collections::BTreeMap;

use crate::{ClaimValue, SdJwtCreator};
pub(crate) mod symbolic_crypto;

pub(crate) const ISSUER: &str = "https://example.com/issuer";
pub(crate) const SUBJECT: &str = "did:example:ebfeb1f712ebc6f1c276e12ec21";
pub(crate) const JWT_ID: &str = "urn:uuid:3978344f-8596-4c3a-a978-8fcaba3903c5";

/// The credential subject used throughout the tests.
pub(crate) fn credential_subject() -> BTreeMap<String, ClaimValue> {
    BTreeMap::from([
        ("name".to_owned(), "John".into()),
        ("age".to_owned(), 25.into()),
        ("over_21".to_owned(), true.into()),
        ("roles".to_owned(), vec!["user", "reports_admin"].into()),
    ])
}

/// A creator with all required claims and [`credential_subject`] set, signing
/// with the given `signer`.
pub(crate) fn creator<'s>(signer: &'s dyn bh_vc_keys::Signer) -> SdJwtCreator<'s> {
    let mut creator = SdJwtCreator::new(signer.algorithm().as_str(), symbolic_crypto::DUMMY_KEY_ID);
    creator
        .set_jwt_id(JWT_ID)
        .set_issuer(ISSUER)
        .set_subject(SUBJECT)
        .set_credential_subject(credential_subject())
        .set_signer(signer);
    creator
}
