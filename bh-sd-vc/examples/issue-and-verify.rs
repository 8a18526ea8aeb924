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

use bh_sd_vc::{
    bh_vc_keys::{EcCurve, KeyMaterial, PrivateKey},
    HashingAlgorithm, IssuanceOptions, ParsedSdJwt, SdJwtCreator, StatusClaim,
};

/// Current time in seconds from the UNIX epoch.
const CURRENT_TIME: u64 = 1_700_000_100;

/// The claims requested by the verifier.
const REQUESTED_CLAIMS: &[&str] = &["name", "over_21"];

fn main() {
    // used to sign the issued credential
    let issuer_key = PrivateKey::generate_ec(EcCurve::P256).unwrap();

    // the holder's public key, bound to the credential through `cnf`
    let holder_key = KeyMaterial::decode(
        r#"{
            "kty": "OKP",
            "crv": "Ed25519",
            "x": "rU9K49C18p2OiCTdPqfY9teM1IlT6Zqs7YTsE87GXi8"
        }"#,
    )
    .unwrap();

    let mut creator = SdJwtCreator::for_signer(&issuer_key, "issuer_kid");
    creator
        .set_jwt_id("urn:uuid:3978344f-8596-4c3a-a978-8fcaba3903c5")
        .set_issuer("https://example.com/issuer")
        .set_subject("did:example:ebfeb1f712ebc6f1c276e12ec21")
        .set_issued_at(1_700_000_000)
        .set_expiry(1_800_000_000)
        .set_credential_type("IdentityCredential")
        .set_confirmation_key(&holder_key)
        .set_status(StatusClaim {
            status_list_index: Some("0".to_owned()),
            status_list_credential: Some("https://example.com/status/1".to_owned()),
            ..Default::default()
        })
        .add_to_credential_subject("name", "John")
        .add_to_credential_subject("age", 25)
        .add_to_credential_subject("over_21", true)
        .add_to_credential_subject("roles", vec!["user", "reports_admin"])
        .add_to_credential_subject(
            "address",
            BTreeMap::from([
                ("locality".to_owned(), "Berlin".to_owned()),
                ("country".to_owned(), "DE".to_owned()),
            ]),
        );

    // issuance parameters, e.g. read from a config file
    let options: IssuanceOptions =
        serde_json::from_str(r#"{"hashing_algorithm": "sha-256", "decoy_digests": 3}"#).unwrap();
    assert_eq!(options.hashing_algorithm, HashingAlgorithm::Sha256);

    let issued = creator.finalize(&options, &mut rand::thread_rng()).unwrap();
    println!("Issued SD-JWT: {issued}\n");

    // the holder only presents the requested claims
    let presentation = issued.presentation(REQUESTED_CLAIMS);
    println!("Presentation: {presentation}\n");

    let parsed = ParsedSdJwt::parse(&presentation).unwrap();
    let issuer_public_key = issuer_key.public_key().unwrap();

    assert!(parsed.verify_signature(&issuer_public_key));
    assert!(parsed.verify_disclosure_content().is_empty());
    parsed.check_validity(CURRENT_TIME).unwrap();

    let claims = parsed.disclosed_claims();
    assert_eq!(claims.len(), REQUESTED_CLAIMS.len());
    for (name, value) in &claims {
        println!("Disclosed {name}: {value}");
    }
}
