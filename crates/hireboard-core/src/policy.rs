//! Access policy
//!
//! Which role may perform which operation, and on whose data. The table is
//! plain data; the helpers below apply its ownership rules to filters, new
//! applications and object keys.

use uuid::Uuid;

use crate::error::AppError;
use crate::filter::ApplicationFilter;
use crate::models::Role;
use crate::validation::check_object_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListJobs,
    GetJob,
    MutateJob,
    ListApplications,
    CreateApplication,
    UploadFile,
    DownloadFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Deny,
    Allow,
    /// Allowed on the caller's own data only
    OwnOnly,
    /// Allowed after a second-factor check
    AllowWithSecondFactor,
}

use Capability::{Allow, AllowWithSecondFactor, Deny, OwnOnly};

// Columns follow `Operation` declaration order.
const CAPABILITIES: [(Role, [Capability; 7]); 3] = [
    (
        Role::Hr,
        [Allow, Allow, Allow, Allow, Deny, Deny, AllowWithSecondFactor],
    ),
    (
        Role::Interviewer,
        [Allow, Allow, Deny, Allow, Deny, Deny, AllowWithSecondFactor],
    ),
    (
        Role::Candidate,
        [Allow, Allow, Deny, OwnOnly, OwnOnly, Allow, OwnOnly],
    ),
];

pub fn capability(role: Role, operation: Operation) -> Capability {
    CAPABILITIES
        .iter()
        .find(|(r, _)| *r == role)
        .map(|(_, row)| row[operation as usize])
        .unwrap_or(Deny)
}

/// Fails with `Forbidden` when the role may not perform the operation at all.
pub fn authorize(role: Role, operation: Operation) -> Result<Capability, AppError> {
    match capability(role, operation) {
        Deny => Err(AppError::Forbidden(format!(
            "role {} may not perform this operation",
            role
        ))),
        granted => Ok(granted),
    }
}

/// Object key prefix owned by a user
pub fn owner_prefix(user_id: Uuid) -> String {
    format!("{}/", user_id)
}

/// Restricts an application listing to what the caller may see.
///
/// Candidates always get their own applications, whatever owner the request
/// asked for.
pub fn narrow_application_filter(
    role: Role,
    caller_id: Uuid,
    filter: &mut ApplicationFilter,
) -> Result<(), AppError> {
    if authorize(role, Operation::ListApplications)? == OwnOnly {
        filter.user_id = Some(caller_id);
    }
    Ok(())
}

/// Resolves the owner of a new application.
///
/// The owner is always the caller, and the resume must be a well-formed key
/// under the caller's prefix.
pub fn authorize_application_create(
    role: Role,
    caller_id: Uuid,
    requested_owner: Option<Uuid>,
    resume_object_key: &str,
) -> Result<Uuid, AppError> {
    authorize(role, Operation::CreateApplication)?;

    if requested_owner.is_some_and(|owner| owner != caller_id) {
        return Err(AppError::Forbidden(
            "applications can only be submitted for yourself".to_string(),
        ));
    }

    check_object_key(resume_object_key)?;
    if !resume_object_key.starts_with(&owner_prefix(caller_id)) {
        return Err(AppError::Forbidden(
            "resume must be one of your own uploads".to_string(),
        ));
    }

    Ok(caller_id)
}

/// What a caller still has to do before a download URL is issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadGate {
    /// Caller owns the object
    Owner,
    /// Caller must present a valid TOTP code
    SecondFactor,
}

pub fn authorize_download(
    role: Role,
    caller_id: Uuid,
    object_key: &str,
) -> Result<DownloadGate, AppError> {
    match authorize(role, Operation::DownloadFile)? {
        AllowWithSecondFactor => Ok(DownloadGate::SecondFactor),
        OwnOnly if object_key.starts_with(&owner_prefix(caller_id)) => Ok(DownloadGate::Owner),
        OwnOnly => Err(AppError::Forbidden(
            "candidates may only download their own files".to_string(),
        )),
        // Unconditional downloads are not granted to any role.
        Allow | Deny => Err(AppError::Forbidden(
            "downloads require ownership or a second factor".to_string(),
        )),
    }
}
