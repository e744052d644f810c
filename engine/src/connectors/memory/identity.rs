use async_trait::async_trait;
use dashmap::DashSet;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::Value;
use time::OffsetDateTime;

use super::super::{CredentialCheck, IdentityConnector, IdentityError};

const VC_CONTEXT: &str = "https://www.w3.org/ns/credentials/v2";
const VC_BASE_TYPE: &str = "VerifiableCredential";

#[derive(serde::Serialize, serde::Deserialize)]
struct VerifiableCredential {
    #[serde(rename = "@context")]
    context: Vec<String>,
    #[serde(rename = "type")]
    types: Vec<String>,
    #[serde(rename = "credentialSubject")]
    credential_subject: Value,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct CredentialClaims {
    jti: String,
    iss: String,
    nbf: i64,
    vc: VerifiableCredential,
}

/// Identity backend issuing HS256 credential JWTs, with an in-memory
/// revocation set.
pub struct MemoryIdentityConnector {
    secret: [u8; 32],
    revoked: DashSet<String>,
}

impl Default for MemoryIdentityConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryIdentityConnector {
    pub fn new() -> Self {
        Self {
            secret: rand::random(),
            revoked: DashSet::new(),
        }
    }

    /// Mark the credential carried by `jwt` as revoked.
    pub fn revoke(&self, jwt: &str) -> Result<(), IdentityError> {
        let claims = self.decode(jwt)?;
        self.revoked.insert(claims.jti);
        Ok(())
    }

    fn decode(&self, jwt: &str) -> Result<CredentialClaims, IdentityError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        jsonwebtoken::decode::<CredentialClaims>(
            jwt,
            &DecodingKey::from_secret(&self.secret),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| IdentityError::Check(e.to_string()))
    }
}

#[async_trait]
impl IdentityConnector for MemoryIdentityConnector {
    async fn issue_credential(
        &self,
        issuer: &str,
        assertion_method_id: &str,
        credential_type: &str,
        subject: Value,
    ) -> Result<String, IdentityError> {
        let claims = CredentialClaims {
            jti: hex::encode(rand::random::<[u8; 16]>()),
            iss: format!("{issuer}#{assertion_method_id}"),
            nbf: OffsetDateTime::now_utc().unix_timestamp(),
            vc: VerifiableCredential {
                context: vec![VC_CONTEXT.to_owned()],
                types: vec![VC_BASE_TYPE.to_owned(), credential_type.to_owned()],
                credential_subject: subject,
            },
        };
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| IdentityError::Issuance(e.to_string()))
    }

    async fn check_credential(&self, jwt: &str) -> Result<CredentialCheck, IdentityError> {
        let claims = self.decode(jwt)?;
        Ok(CredentialCheck {
            revoked: self.revoked.contains(&claims.jti),
            subject: claims.vc.credential_subject,
        })
    }
}
