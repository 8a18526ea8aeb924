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

use rand::seq::SliceRandom;
use rand_core::CryptoRngCore;

use crate::{utils, ClaimValue, Digest, Disclosure, Hasher, Salt};

/// Number of random bytes in a disclosure salt, see [11.4].
///
/// [11.4]: https://datatracker.ietf.org/doc/html/draft-ietf-oauth-selective-disclosure-jwt#name-minimum-length-of-the-salt
pub(crate) const SALT_ENTROPY_BYTES: usize = 32;

/// Number of random bytes hashed into a decoy digest.
pub(crate) const DECOY_ENTROPY_BYTES: usize = 32;

/// Creates one [`Disclosure`] per claim, each with a freshly generated salt,
/// in the iteration order of `claims`.
pub(crate) fn create_disclosures<'c, R: CryptoRngCore + ?Sized>(
    claims: impl IntoIterator<Item = (&'c String, &'c ClaimValue)>,
    rng: &mut R,
) -> Vec<Disclosure> {
    claims
        .into_iter()
        .map(|(name, value)| Disclosure::new(generate_salt(rng), name.clone(), value.clone()))
        .collect()
}

/// Builds the `_sd` array: the digest of every disclosure followed by
/// `decoy_count` decoy digests, uniformly shuffled.
///
/// Decoys hide the number of disclosable claims, see [decoy digests].
///
/// [decoy digests]: https://datatracker.ietf.org/doc/html/draft-ietf-oauth-selective-disclosure-jwt#name-decoy-digests
pub(crate) fn build_commitment_array<H: Hasher, R: CryptoRngCore + ?Sized>(
    disclosures: &[Disclosure],
    hasher: &H,
    decoy_count: usize,
    rng: &mut R,
) -> Vec<Digest> {
    let mut digests: Vec<Digest> = disclosures
        .iter()
        .map(|disclosure| disclosure.digest(hasher))
        .collect();
    digests.extend((0..decoy_count).map(|_| decoy_digest(hasher, rng)));

    digests.shuffle(rng);
    digests
}

/// Generate a base64url string of random bytes as a salt for SD-JWT hashing
/// purposes.
///
/// The string **MUST** be highly unpredictable (except for testing
/// purposes, where this provides a mocking interface). See more in draft
/// sections [11.3] and [11.4].
///
/// [11.3]: https://datatracker.ietf.org/doc/html/draft-ietf-oauth-selective-disclosure-jwt#name-entropy-of-the-salt
/// [11.4]: https://datatracker.ietf.org/doc/html/draft-ietf-oauth-selective-disclosure-jwt#name-minimum-length-of-the-salt
pub(crate) fn generate_salt<R: CryptoRngCore + ?Sized>(rng: &mut R) -> Salt {
    let mut salt = [0; SALT_ENTROPY_BYTES];
    rng.fill_bytes(&mut salt);
    bh_vc_keys::base64_url_encode(salt)
}

fn decoy_digest<H: Hasher, R: CryptoRngCore + ?Sized>(hasher: &H, rng: &mut R) -> Digest {
    let mut preimage = [0; DECOY_ENTROPY_BYTES];
    rng.fill_bytes(&mut preimage);
    utils::base64_url_digest(&preimage, hasher)
}
