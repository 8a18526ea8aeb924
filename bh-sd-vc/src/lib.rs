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

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! This crate implements issuance and verification of selectively disclosable
//! Verifiable Credentials in the [SD-JWT][1] format.
//!
//! [1]: <https://datatracker.ietf.org/doc/html/draft-ietf-oauth-selective-disclosure-jwt>
//!
//! # Details
//!
//! An SD-JWT is a signed JWT whose payload carries only the digests of the
//! credential subject claims, in the `_sd` array. Each claim is revealed by a
//! separate [`Disclosure`], which the verifier hashes and matches against the
//! digests. The wire format is
//! `<header>.<payload>.<signature>~<disclosure 1>~...~<disclosure n>`.
//!
//! The main components of this crate are the following.
//!
//! * [`issuer`] -- Builds the disclosures, commits to them and signs the token.
//! * [`verifier`] -- Parses a token, verifies its signature and checks every
//!   disclosure against the committed digests.
//!
//! Keys and signatures are provided by the re-exported [`bh_vc_keys`] crate.
//! Claim values are restricted to the flat shapes of [`ClaimValue`].
//!
//! # Examples
//!
//! ```
//! use bh_sd_vc::{
//!     bh_vc_keys::{EcCurve, PrivateKey},
//!     IssuanceOptions, ParsedSdJwt, SdJwtCreator,
//! };
//!
//! let issuer_key = PrivateKey::generate_ec(EcCurve::P256).unwrap();
//!
//! let mut creator = SdJwtCreator::for_signer(&issuer_key, "issuer-key-1");
//! creator
//!     .set_jwt_id("urn:uuid:3978344f-8596-4c3a-a978-8fcaba3903c5")
//!     .set_issuer("https://example.com/issuer")
//!     .set_subject("did:example:ebfeb1f712ebc6f1c276e12ec21")
//!     .add_to_credential_subject("name", "John")
//!     .add_to_credential_subject("age", 25);
//!
//! let issued = creator
//!     .finalize(&IssuanceOptions::default(), &mut rand::thread_rng())
//!     .unwrap();
//!
//! let parsed = ParsedSdJwt::parse(&issued.presentation(&["age"])).unwrap();
//! assert!(parsed.verify_signature(&issuer_key.public_key().unwrap()));
//! assert!(parsed.verify_disclosure_content().is_empty());
//! assert_eq!(parsed.disclosed_claims()["age"].as_i64(), Some(25));
//! ```
//!
//! A runnable version lives in `examples/issue-and-verify.rs`.

// Re-export the `bh-vc-keys` crate
pub use bh_vc_keys;
pub use error::{FormatError, Result};

mod error;
mod models;
mod sd_jwt;
#[cfg(test)]
mod test_utils;
mod traits;
mod utils;

mod encoder;
pub mod issuer;
pub mod verifier;

pub use issuer::{
    CommittedSdJwt, IssuanceOptions, IssuedSdJwt, IssuerError, IssuerJwtHeader, SdJwtCreator,
    SdJwtPayload, SignedSdJwt, TYP_VC_SD_JWT,
};
pub use models::*;
pub use traits::*;
pub use utils::{base64_url_digest, VecDisplayWrapper};
pub use verifier::{ParsedSdJwt, VerifierError};
