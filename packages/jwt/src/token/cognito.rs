//! Amazon Cognito user-pool token shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Token;
use super::header::JoseHeader;
use super::payload::{Audience, ClaimSet};
use crate::numeric_date::NumericDate;

/// Cognito access token
pub type CognitoAccessToken = Token<CognitoHeader, CognitoAccessPayload>;

/// Cognito ID token
pub type CognitoIdToken = Token<CognitoHeader, CognitoIdPayload>;

/// Header of Cognito tokens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CognitoHeader {
    /// Signing algorithm, `RS256` in practice
    #[serde(default)]
    pub alg: String,
    /// Id of the user-pool key that signed the token
    #[serde(default)]
    pub kid: String,
}

impl JoseHeader for CognitoHeader {
    fn alg(&self) -> &str {
        &self.alg
    }
}

/// Claims shared by access and ID tokens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CognitoClaims {
    /// Subject (user pool user id)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sub: String,
    /// Remembered device key
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub device_key: String,
    /// Group memberships
    #[serde(rename = "cognito:groups", default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    /// Issuing user pool URL
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub iss: String,
    /// Id of the originating authentication
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub origin_jti: String,
    /// Authentication event id
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub event_id: String,
    /// `access` or `id`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token_use: String,
    /// Time the user authenticated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_time: Option<NumericDate>,
    /// Expiration time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<NumericDate>,
    /// Issued-at time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<NumericDate>,
    /// Token id
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub jti: String,
}

/// Claims of a Cognito access token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CognitoAccessPayload {
    /// Claims common to both token kinds
    #[serde(flatten)]
    pub claims: CognitoClaims,
    /// Token format version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    /// App client id
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_id: String,
    /// Space-separated OAuth scopes
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scope: String,
    /// User name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
}

/// Claims of a Cognito ID token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CognitoIdPayload {
    /// Claims common to both token kinds
    #[serde(flatten)]
    pub claims: CognitoClaims,
    /// Cognito emits this as a boolean; kept as raw JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<serde_json::Value>,
    /// Preferred IAM role ARN
    #[serde(rename = "cognito:preferred_role", default, skip_serializing_if = "String::is_empty")]
    pub preferred_role: String,
    /// User name
    #[serde(rename = "cognito:username", default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    /// Middle name
    #[serde(default)]
    pub middle_name: String,
    /// Nonce echoed from the authorization request
    #[serde(default)]
    pub nonce: String,
    /// IAM role ARNs
    #[serde(rename = "cognito:roles", default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// Audience (app client id)
    #[serde(default, skip_serializing_if = "Audience::is_empty")]
    pub aud: Audience,
    /// Linked federated identities
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identities: Vec<CognitoIdentity>,
    /// Email address
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
}

/// Federated identity linked to a Cognito user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CognitoIdentity {
    /// User id at the provider
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_id: String,
    /// Provider name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provider_name: String,
    /// Provider type
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provider_type: String,
    /// Provider issuer
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub issuer: String,
    /// `"true"` for the primary identity
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub primary: String,
    /// Link creation time, milliseconds since the epoch as text
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub date_created: String,
}

fn date(value: Option<NumericDate>) -> DateTime<Utc> {
    value.unwrap_or_default().to_datetime()
}

impl CognitoClaims {
    fn exp(&self) -> DateTime<Utc> {
        date(self.exp)
    }

    fn iat(&self) -> DateTime<Utc> {
        date(self.iat)
    }
}

impl ClaimSet for CognitoAccessPayload {
    fn exp(&self) -> DateTime<Utc> {
        self.claims.exp()
    }

    // Cognito does not issue nbf
    fn nbf(&self) -> DateTime<Utc> {
        DateTime::default()
    }

    fn iat(&self) -> DateTime<Utc> {
        self.claims.iat()
    }

    fn iss(&self) -> &str {
        &self.claims.iss
    }

    fn sub(&self) -> &str {
        &self.claims.sub
    }

    fn aud(&self) -> Vec<String> {
        Vec::new()
    }
}

impl ClaimSet for CognitoIdPayload {
    fn exp(&self) -> DateTime<Utc> {
        self.claims.exp()
    }

    fn nbf(&self) -> DateTime<Utc> {
        DateTime::default()
    }

    fn iat(&self) -> DateTime<Utc> {
        self.claims.iat()
    }

    fn iss(&self) -> &str {
        &self.claims.iss
    }

    fn sub(&self) -> &str {
        &self.claims.sub
    }

    fn aud(&self) -> Vec<String> {
        self.aud.as_slice().to_vec()
    }
}
