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

//! This crate provides types for working with [JSON Web Keys (JWK)][1] used to
//! sign and verify Verifiable Credentials.
//!
//! [1]: https://datatracker.ietf.org/doc/html/rfc7517
//!
//! # Details
//!
//! A JWK is decoded into [`KeyMaterial`], a closed set of variants with one
//! case per key type family: `EC` keys over the NIST P-256, P-384 and P-521
//! curves, and `OKP` keys over Edwards25519. Unsupported key types and curves
//! are rejected while decoding.
//!
//! Signing and verification are abstracted by the [`Signer`] and
//! [`SignatureVerifier`] traits. A default [`openssl`] backed implementation is
//! available via [`PublicKey`] and [`PrivateKey`], which can be extracted from
//! [`KeyMaterial`] with [`KeyMaterial::public_key`] and
//! [`KeyMaterial::private_key`]. The implementation is available under the
//! default feature `openssl` which can be disabled and replaced by a custom
//! implementation of the traits.
//!
//! # Examples
//!
//! ## Sign and verify a message
//!
//! ```
//! use bh_vc_keys::{KeyMaterial, SignatureVerifier, Signer};
//!
//! let jwk = r#"{
//!     "kty": "OKP",
//!     "crv": "Ed25519",
//!     "x": "rU9K49C18p2OiCTdPqfY9teM1IlT6Zqs7YTsE87GXi8",
//!     "d": "yxinTCG98GILOk2A_eWber7nxyPWK6pAC9bEoZOgLZo"
//! }"#;
//!
//! let key_material = KeyMaterial::decode(jwk).unwrap();
//!
//! let private_key = key_material.private_key().unwrap();
//! let signature = private_key.sign(b"message").unwrap();
//!
//! let public_key = key_material.public_key().unwrap();
//! assert!(public_key.verify(b"message", &signature));
//! ```

#[cfg(feature = "openssl")]
mod openssl_impl;

mod error;
mod jwk;
mod traits;
mod utils;

pub use error::*;
pub use jwk::*;
#[cfg(feature = "openssl")]
pub use openssl_impl::*;
pub use traits::*;
pub use utils::*;
