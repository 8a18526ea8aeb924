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

//! Provides the [`SdJwtCreator`] type for issuing SD-JWTs.
//!
//! Issuance goes through [`SdJwtCreator`] (claims being set),
//! [`CommittedSdJwt`] (disclosures created and their digests in `_sd`),
//! [`SignedSdJwt`] (header and payload signed) and finally [`IssuedSdJwt`],
//! which produces the wire string and holder presentations.

use std::collections::BTreeMap;

use bh_vc_keys::{base64_url_encode, construct_jws_payload, KeyMaterial, Signer};
use bherror::{
    traits::{ForeignBoxed, ForeignError},
    Error,
};
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use crate::{
    encoder,
    error::Result,
    sd_jwt::SdJwt,
    utils::VecDisplayWrapper,
    ClaimValue, CnfClaim, Digest, Disclosure, HashingAlgorithm, SecondsSinceEpoch, StatusClaim,
};

/// Error type for the issuance of SD-JWTs.
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum IssuerError {
    /// Error indicating that registered claims required for issuance are not
    /// set; carries the names of the missing claims.
    #[strum(to_string = "Required claims missing: {0}")]
    RequiredClaimsMissing(VecDisplayWrapper<&'static str>),

    /// Error indicating that the credential subject is empty, so there is
    /// nothing to disclose.
    #[strum(to_string = "Credential subject has no claims to disclose")]
    NoDisclosures,

    /// Error indicating that a credential subject claim uses a name reserved
    /// for SD-JWT hash pointers.
    #[strum(to_string = "Reserved claim name {0} used in the credential subject")]
    ReservedClaimName(&'static str),

    /// Error indicating that the algorithm of the signer differs from the
    /// `alg` header.
    #[strum(to_string = "Signer algorithm {0} does not match header algorithm {1}")]
    SigningAlgorithmMismatch(String, String),

    /// Error indicating that the header or payload could not be serialized.
    #[strum(to_string = "Serialization failed")]
    SerializationFailed,

    /// Error indicating that the signer failed to sign the token.
    #[strum(to_string = "Signing failed")]
    SigningFailed,
}

impl bherror::BhError for IssuerError {}

/// The `typ` header value of SD-JWT VCs.
pub const TYP_VC_SD_JWT: &str = "vc+sd-jwt";

/// Claim names reserved by SD-JWT for hash pointers; they can never be
/// disclosed.
///
/// See the [draft](https://datatracker.ietf.org/doc/html/draft-ietf-oauth-selective-disclosure-jwt#section-5.1-3.7).
pub(crate) const RESERVED_CLAIM_NAMES: [&str; 2] = ["_sd", "..."];

/// JWT Header of an SD-JWT.
///
/// All members are optional when decoding; an issued header always carries
/// [`TYP_VC_SD_JWT`] as its `typ`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssuerJwtHeader {
    /// Type of the token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,

    /// Algorithm used to sign the token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,

    /// Optional identifier of the key used for signing.
    ///
    /// <https://datatracker.ietf.org/doc/html/draft-ietf-oauth-sd-jwt-vc-08#section-3.5-2.3>
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

/// Payload of an SD-JWT.
///
/// The credential subject claims are not part of the payload; only their
/// digests are, in the `_sd` array.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SdJwtPayload {
    /// Unique identifier of the credential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Subject of the credential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Issuer of the credential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// The time at which the credential was issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<SecondsSinceEpoch>,

    /// The time before which the credential MUST NOT be accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<SecondsSinceEpoch>,

    /// The expiry time of the credential after which it is no longer valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<SecondsSinceEpoch>,

    /// Credential type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub credential_type: Option<String>,

    /// Holder's public JWK for key binding purposes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cnf: Option<CnfClaim>,

    /// The information on how to read the status of the credential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusClaim>,

    /// Digests of the disclosures, mixed with decoy digests.
    #[serde(rename = "_sd", skip_serializing_if = "Option::is_none")]
    pub sd: Option<Vec<Digest>>,

    /// The hash algorithm used to hide the claims, as specified [here].
    ///
    /// [here]: https://datatracker.ietf.org/doc/html/draft-ietf-oauth-selective-disclosure-jwt-07#name-hash-function-claim
    #[serde(rename = "_sd_alg", skip_serializing_if = "Option::is_none")]
    pub sd_alg: Option<HashingAlgorithm>,
}

/// Issuance parameters which are not part of the token content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IssuanceOptions {
    /// Algorithm used to compute the `_sd` digests.
    pub hashing_algorithm: HashingAlgorithm,

    /// Number of decoy digests added to the `_sd` array.
    pub decoy_digests: usize,
}

/// Builder of an SD-JWT.
///
/// Registered claims are set on the payload, and every credential subject
/// claim becomes a separate [`Disclosure`]. The token is produced by
/// [`SdJwtCreator::finalize`], or step by step through [`CommittedSdJwt`] and
/// [`SignedSdJwt`].
#[derive(Clone)]
pub struct SdJwtCreator<'s> {
    header: IssuerJwtHeader,
    payload: SdJwtPayload,
    credential_subject: BTreeMap<String, ClaimValue>,
    signer: Option<&'s dyn Signer>,
}

impl<'s> SdJwtCreator<'s> {
    /// Creates an empty SD-JWT with the given `alg` and `kid` header values.
    pub fn new(alg: impl Into<String>, kid: impl Into<String>) -> Self {
        Self {
            header: IssuerJwtHeader {
                typ: Some(TYP_VC_SD_JWT.to_owned()),
                alg: Some(alg.into()),
                kid: Some(kid.into()),
            },
            payload: SdJwtPayload::default(),
            credential_subject: BTreeMap::new(),
            signer: None,
        }
    }

    /// Creates an empty SD-JWT signed by `signer`, taking the `alg` header
    /// from the signer.
    pub fn for_signer(signer: &'s dyn Signer, kid: impl Into<String>) -> Self {
        let mut creator = Self::new(signer.algorithm().as_str(), kid);
        creator.signer = Some(signer);
        creator
    }

    /// JWT header of the token.
    pub fn header(&self) -> &IssuerJwtHeader {
        &self.header
    }

    /// Payload of the token, without the `_sd` digests.
    pub fn payload(&self) -> &SdJwtPayload {
        &self.payload
    }

    /// Claims which will be selectively disclosable.
    pub fn credential_subject(&self) -> &BTreeMap<String, ClaimValue> {
        &self.credential_subject
    }

    /// Sets the signer. Without a signer the token is issued unsigned.
    pub fn set_signer(&mut self, signer: &'s dyn Signer) -> &mut Self {
        self.signer = Some(signer);
        self
    }

    /// Sets the `jti` claim.
    pub fn set_jwt_id(&mut self, jti: impl Into<String>) -> &mut Self {
        self.payload.jti = Some(jti.into());
        self
    }

    /// Sets the `iss` claim.
    pub fn set_issuer(&mut self, iss: impl Into<String>) -> &mut Self {
        self.payload.iss = Some(iss.into());
        self
    }

    /// Sets the `sub` claim.
    pub fn set_subject(&mut self, sub: impl Into<String>) -> &mut Self {
        self.payload.sub = Some(sub.into());
        self
    }

    /// Sets the `iat` claim.
    pub fn set_issued_at(&mut self, iat: SecondsSinceEpoch) -> &mut Self {
        self.payload.iat = Some(iat);
        self
    }

    /// Sets the `nbf` claim.
    pub fn set_not_before(&mut self, nbf: SecondsSinceEpoch) -> &mut Self {
        self.payload.nbf = Some(nbf);
        self
    }

    /// Sets the `exp` claim.
    pub fn set_expiry(&mut self, exp: SecondsSinceEpoch) -> &mut Self {
        self.payload.exp = Some(exp);
        self
    }

    /// Sets the `type` claim.
    pub fn set_credential_type(&mut self, credential_type: impl Into<String>) -> &mut Self {
        self.payload.credential_type = Some(credential_type.into());
        self
    }

    /// Sets the `cnf` claim to the public part of `holder_key`.
    pub fn set_confirmation_key(&mut self, holder_key: &KeyMaterial) -> &mut Self {
        self.payload.cnf = Some(CnfClaim {
            jwk: holder_key.to_public(),
        });
        self
    }

    /// Sets the `status` claim.
    pub fn set_status(&mut self, status: StatusClaim) -> &mut Self {
        self.payload.status = Some(status);
        self
    }

    /// Adds a selectively disclosable claim, replacing any previous claim with
    /// the same name.
    pub fn add_to_credential_subject(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ClaimValue>,
    ) -> &mut Self {
        self.credential_subject.insert(name.into(), value.into());
        self
    }

    /// Replaces all selectively disclosable claims.
    pub fn set_credential_subject(
        &mut self,
        claims: impl IntoIterator<Item = (String, ClaimValue)>,
    ) -> &mut Self {
        self.credential_subject = claims.into_iter().collect();
        self
    }

    /// Creates the disclosures and commits to them in the payload.
    ///
    /// # Errors
    ///
    /// - [`IssuerError::RequiredClaimsMissing`] if any of `jti`, `iss` or
    ///   `sub` is not set,
    /// - [`IssuerError::NoDisclosures`] if the credential subject is empty,
    /// - [`IssuerError::ReservedClaimName`] if a credential subject claim is
    ///   named `_sd` or `...`.
    pub fn commit<R: CryptoRngCore + ?Sized>(
        &self,
        options: &IssuanceOptions,
        rng: &mut R,
    ) -> Result<CommittedSdJwt, IssuerError> {
        self.check_required_claims()?;
        self.check_credential_subject()?;

        let hasher = options.hashing_algorithm.hasher();
        let disclosures = encoder::create_disclosures(&self.credential_subject, rng);
        let sd =
            encoder::build_commitment_array(&disclosures, &hasher, options.decoy_digests, rng);

        let mut payload = self.payload.clone();
        payload.sd = Some(sd);
        payload.sd_alg = Some(options.hashing_algorithm);

        Ok(CommittedSdJwt {
            header: self.header.clone(),
            payload,
            disclosures,
        })
    }

    /// Issues the SD-JWT: commits to the credential subject, signs the token
    /// with the configured signer and attaches the disclosures.
    ///
    /// # Errors
    ///
    /// See [`SdJwtCreator::commit`] and [`CommittedSdJwt::sign`].
    pub fn finalize<R: CryptoRngCore + ?Sized>(
        &self,
        options: &IssuanceOptions,
        rng: &mut R,
    ) -> Result<IssuedSdJwt, IssuerError> {
        let issued = self.commit(options, rng)?.sign(self.signer)?.finalize();

        tracing::debug!(
            disclosures = issued.disclosures.len(),
            decoys = options.decoy_digests,
            sd_alg = %options.hashing_algorithm,
            "SD-JWT issued"
        );

        Ok(issued)
    }

    fn check_required_claims(&self) -> Result<(), IssuerError> {
        let missing: Vec<&'static str> = [
            ("jti", self.payload.jti.is_none()),
            ("iss", self.payload.iss.is_none()),
            ("sub", self.payload.sub.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect();

        if !missing.is_empty() {
            return Err(Error::root(IssuerError::RequiredClaimsMissing(
                VecDisplayWrapper(missing),
            )));
        }
        Ok(())
    }

    fn check_credential_subject(&self) -> Result<(), IssuerError> {
        if self.credential_subject.is_empty() {
            return Err(Error::root(IssuerError::NoDisclosures));
        }
        if let Some(name) = RESERVED_CLAIM_NAMES
            .into_iter()
            .find(|name| self.credential_subject.contains_key(*name))
        {
            return Err(Error::root(IssuerError::ReservedClaimName(name)));
        }
        Ok(())
    }
}

/// An SD-JWT whose payload commits to its disclosures, not yet signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedSdJwt {
    header: IssuerJwtHeader,
    payload: SdJwtPayload,
    disclosures: Vec<Disclosure>,
}

impl CommittedSdJwt {
    /// JWT header of the token.
    pub fn header(&self) -> &IssuerJwtHeader {
        &self.header
    }

    /// Payload of the token, including the `_sd` digests.
    pub fn payload(&self) -> &SdJwtPayload {
        &self.payload
    }

    /// Disclosures in the order they were created.
    pub fn disclosures(&self) -> &[Disclosure] {
        &self.disclosures
    }

    /// Encodes the header and payload and signs them with `signer`.
    ///
    /// Without a signer the token is left unsigned. This is only meant for
    /// testing, as nothing then binds the disclosures to the issuer.
    ///
    /// # Errors
    ///
    /// - [`IssuerError::SigningAlgorithmMismatch`] if the signer algorithm
    ///   differs from the `alg` header,
    /// - [`IssuerError::SigningFailed`] if the signer fails,
    /// - [`IssuerError::SerializationFailed`] if the header or payload cannot
    ///   be serialized.
    pub fn sign(self, signer: Option<&dyn Signer>) -> Result<SignedSdJwt, IssuerError> {
        let header = encode_segment(&self.header)?;
        let payload = encode_segment(&self.payload)?;

        let signature = match signer {
            Some(signer) => {
                let algorithm = signer.algorithm();
                if self.header.alg.as_deref() != Some(algorithm.as_str()) {
                    return Err(Error::root(IssuerError::SigningAlgorithmMismatch(
                        algorithm.to_string(),
                        self.header.alg.clone().unwrap_or_default(),
                    )));
                }

                let message = construct_jws_payload(&header, &payload);
                let signature = signer
                    .sign(message.as_bytes())
                    .foreign_boxed_err(|| IssuerError::SigningFailed)?;
                Some(base64_url_encode(signature))
            }
            None => {
                tracing::warn!("No signer configured, the SD-JWT is issued unsigned");
                None
            }
        };

        Ok(SignedSdJwt {
            header: self.header,
            payload: self.payload,
            disclosures: self.disclosures,
            jws: SdJwt {
                header,
                payload,
                signature,
                disclosures: vec![],
            },
        })
    }
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, IssuerError> {
    let json = serde_json::to_vec(value).foreign_err(|| IssuerError::SerializationFailed)?;
    Ok(base64_url_encode(json))
}

/// A signed (or deliberately unsigned) SD-JWT, with its disclosures not yet
/// attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedSdJwt {
    header: IssuerJwtHeader,
    payload: SdJwtPayload,
    disclosures: Vec<Disclosure>,
    jws: SdJwt,
}

impl SignedSdJwt {
    /// Whether the token carries a signature.
    pub fn is_signed(&self) -> bool {
        self.jws.signature.is_some()
    }

    /// Attaches the disclosures, in the order they were created.
    pub fn finalize(self) -> IssuedSdJwt {
        let mut sd_jwt = self.jws;
        sd_jwt.disclosures = self
            .disclosures
            .iter()
            .map(|disclosure| disclosure.as_str().to_owned())
            .collect();

        IssuedSdJwt {
            header: self.header,
            payload: self.payload,
            disclosures: self.disclosures,
            sd_jwt,
        }
    }
}

/// An issued SD-JWT, ready to be handed over to the holder.
///
/// [`Display`](std::fmt::Display) produces the wire string
/// `<header>.<payload>[.<signature>]~<d1>~...~<dn>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSdJwt {
    header: IssuerJwtHeader,
    payload: SdJwtPayload,
    disclosures: Vec<Disclosure>,
    sd_jwt: SdJwt,
}

impl IssuedSdJwt {
    /// JWT header of the token.
    pub fn header(&self) -> &IssuerJwtHeader {
        &self.header
    }

    /// Payload of the token, including the `_sd` digests.
    pub fn payload(&self) -> &SdJwtPayload {
        &self.payload
    }

    /// Whether the token carries a signature.
    pub fn is_signed(&self) -> bool {
        self.sd_jwt.signature.is_some()
    }

    /// Returns all disclosures if `filtered_by` is empty, otherwise only the
    /// disclosures of the listed claim names.
    pub fn disclosures(&self, filtered_by: &[&str]) -> Vec<&Disclosure> {
        self.disclosures
            .iter()
            .filter(|disclosure| {
                filtered_by.is_empty() || filtered_by.contains(&disclosure.claim_name())
            })
            .collect()
    }

    /// Returns the wire string carrying only the disclosures selected by
    /// `filtered_by`, as in [`IssuedSdJwt::disclosures`].
    pub fn presentation(&self, filtered_by: &[&str]) -> String {
        SdJwt {
            disclosures: self
                .disclosures(filtered_by)
                .into_iter()
                .map(|disclosure| disclosure.as_str().to_owned())
                .collect(),
            ..self.sd_jwt.clone()
        }
        .to_string()
    }

    /// Serialize [`Self`] into the wire string.
    pub fn into_string(self) -> String {
        self.sd_jwt.to_string()
    }
}

impl std::fmt::Display for IssuedSdJwt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sd_jwt)
    }
}
