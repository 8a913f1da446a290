//! TOTP second factor for staff downloads
//!
//! RFC 6238 with SHA-1, 6 digits and a 30 second step, accepting one step of
//! clock skew either way. A matched step is claimed in the user store and
//! must be newer than the last claimed step, so every code works once.

use std::sync::Arc;

use chrono::Utc;
use hireboard_core::AppError;
use hireboard_db::UserStore;
use subtle::ConstantTimeEq;
use totp_rs::{Algorithm, Secret, TOTP};

use crate::auth::Principal;

const DIGITS: usize = 6;
const STEP_SECS: u64 = 30;
const SKEW_STEPS: u8 = 1;

#[derive(Clone)]
pub struct SecondFactorVerifier {
    users: Arc<dyn UserStore>,
}

impl SecondFactorVerifier {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn verify(&self, principal: &Principal, code: Option<&str>) -> Result<(), AppError> {
        let now = u64::try_from(Utc::now().timestamp())
            .map_err(|_| AppError::Internal("system clock is before the epoch".to_string()))?;
        self.verify_at(principal, code, now).await
    }

    /// Verify `code` as if the current unix time were `unix_time`.
    #[tracing::instrument(skip(self, principal, code), fields(user_id = %principal.id))]
    pub async fn verify_at(
        &self,
        principal: &Principal,
        code: Option<&str>,
        unix_time: u64,
    ) -> Result<(), AppError> {
        let code = code.map(str::trim).filter(|c| !c.is_empty()).ok_or_else(|| {
            AppError::BadRequest("passcode is required for this download".to_string())
        })?;

        if code.len() != DIGITS || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::Forbidden("passcode is incorrect".to_string()));
        }

        let totp = totp_for(&principal.totp_secret)?;
        let current = unix_time / STEP_SECS;

        let matched = (current.saturating_sub(SKEW_STEPS as u64)..=current + SKEW_STEPS as u64)
            .find(|step| {
                let expected = totp.generate(step * STEP_SECS);
                bool::from(expected.as_bytes().ct_eq(code.as_bytes()))
            })
            .ok_or_else(|| AppError::Forbidden("passcode is incorrect".to_string()))?;

        let step = i64::try_from(matched)
            .map_err(|_| AppError::Internal("TOTP step out of range".to_string()))?;
        if !self.users.claim_totp_step(principal.id, step).await? {
            tracing::warn!(step, "Rejected reused passcode");
            return Err(AppError::Forbidden("passcode has already been used".to_string()));
        }

        tracing::debug!(step, "Second factor accepted");
        Ok(())
    }
}

fn totp_for(secret: &str) -> Result<TOTP, AppError> {
    let bytes = Secret::Encoded(secret.to_string())
        .to_bytes()
        .map_err(|e| AppError::Internal(format!("stored TOTP secret is invalid: {:?}", e)))?;
    TOTP::new(Algorithm::SHA1, DIGITS, SKEW_STEPS, STEP_SECS, bytes)
        .map_err(|e| AppError::Internal(format!("TOTP init failed: {:?}", e)))
}
