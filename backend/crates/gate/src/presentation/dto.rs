//! Admin Auth DTOs

use serde::{Deserialize, Serialize};

use crate::domain::backend::MfaEnrollment;
use crate::domain::session::MfaFactor;

/// Login request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
///
/// `mfa` tells the client what to do next: `"enroll"` (no verified factor
/// yet), `"verify"` (challenge the factor in `factor_id`), or `"none"`
/// (this device is already trusted).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub mfa: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor_id: Option<String>,
}

/// Logout response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub success: bool,
}

/// TOTP enrollment response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MfaEnrollResponse {
    pub factor_id: String,
    pub secret: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl From<MfaEnrollment> for MfaEnrollResponse {
    fn from(enrollment: MfaEnrollment) -> Self {
        Self {
            factor_id: enrollment.factor_id,
            secret: enrollment.secret,
            qr_code: enrollment.qr_code,
            uri: enrollment.uri,
        }
    }
}

/// One verified factor, as shown to the MFA verify page
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorDto {
    pub id: String,
    pub factor_type: String,
}

impl From<&MfaFactor> for FactorDto {
    fn from(factor: &MfaFactor) -> Self {
        Self {
            id: factor.id.clone(),
            factor_type: factor.factor_type.clone(),
        }
    }
}

/// Verified factor listing response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MfaFactorsResponse {
    pub factors: Vec<FactorDto>,
}

/// MFA verification request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MfaVerifyRequest {
    pub factor_id: String,
    pub code: String,
}

/// MFA verification response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MfaVerifyResponse {
    pub success: bool,
}
