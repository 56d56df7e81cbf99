//! Member directory: registration, login and logout.
//!
//! Registration validates every field, then checks username and email
//! uniqueness before writing. The unique indexes still have the final say: a
//! conflict on insert (two registrations racing) is reported as the same
//! "already taken" field error the pre-check would have produced.

mod error;
mod password;

pub use error::MemberError;
pub use password::{Argon2Verifier, CredentialVerifier};

use core::fmt;

use chrono::NaiveDate;
use tracing::instrument;

use ecommerce_core::{Email, Username};

use super::session::IdentitySession;
use super::validation::ValidationErrors;
use crate::db::{MemberRepository, RepositoryError};
use crate::models::{Member, NewMember, SessionIdentity};

/// Password length bounds, in characters.
const PASSWORD_LENGTH: std::ops::RangeInclusive<usize> = 6..=50;

const ALREADY_TAKEN: &str = "already taken";

/// Raw registration form fields.
#[derive(Clone, Default)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// ISO `YYYY-MM-DD`.
    pub date_of_birth: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("date_of_birth", &self.date_of_birth)
            .finish_non_exhaustive()
    }
}

struct ValidRegistration {
    username: Username,
    email: Email,
    date_of_birth: NaiveDate,
}

impl Registration {
    fn validate(&self) -> Result<ValidRegistration, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let username = errors.check("username", Username::parse(&self.username));
        let email = errors.check("email", Email::parse(&self.email));

        if !PASSWORD_LENGTH.contains(&self.password.chars().count()) {
            errors.add(
                "password",
                format!(
                    "Password must be between {} and {} characters",
                    PASSWORD_LENGTH.start(),
                    PASSWORD_LENGTH.end()
                ),
            );
        }
        if self.confirm_password != self.password {
            errors.add("confirm_password", "Passwords do not match");
        }

        let date_of_birth = NaiveDate::parse_from_str(self.date_of_birth.trim(), "%Y-%m-%d")
            .map_err(|_| errors.add("date_of_birth", "Date of birth must be a date (YYYY-MM-DD)"))
            .ok();

        match (username, email, date_of_birth) {
            (Some(username), Some(email), Some(date_of_birth)) => {
                errors.into_result(ValidRegistration {
                    username,
                    email,
                    date_of_birth,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Member operations over a member repository and a password verifier.
pub struct MemberDirectory<'a> {
    members: &'a dyn MemberRepository,
    verifier: &'a dyn CredentialVerifier,
}

impl<'a> MemberDirectory<'a> {
    #[must_use]
    pub fn new(members: &'a dyn MemberRepository, verifier: &'a dyn CredentialVerifier) -> Self {
        Self { members, verifier }
    }

    /// Register a new member.
    ///
    /// # Errors
    ///
    /// Returns `MemberError::Validation` with every rejected field, or with
    /// `username`/`email` "already taken" entries when those are in use.
    #[instrument(skip(self))]
    pub async fn register(&self, form: &Registration) -> Result<Member, MemberError> {
        let valid = form.validate().map_err(MemberError::Validation)?;

        let mut taken = ValidationErrors::new();
        if self.members.username_exists(&valid.username).await? {
            taken.add("username", ALREADY_TAKEN);
        }
        if self.members.email_exists(&valid.email).await? {
            taken.add("email", ALREADY_TAKEN);
        }
        taken.into_result(()).map_err(MemberError::Validation)?;

        let new_member = NewMember {
            username: valid.username,
            email: valid.email,
            password_hash: self.verifier.hash(&form.password)?,
            date_of_birth: valid.date_of_birth,
        };

        let member = self
            .members
            .create(&new_member)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(key) => {
                    MemberError::Validation(ValidationErrors::single(key.field(), ALREADY_TAKEN))
                }
                other => MemberError::Repository(other),
            })?;

        tracing::info!(member_id = %member.id, "member registered");
        Ok(member)
    }

    /// Log in by username or email and store the identity in `session`.
    ///
    /// # Errors
    ///
    /// Returns `MemberError::InvalidCredentials` if no member with that
    /// username or email has this password.
    #[instrument(skip(self, session, password))]
    pub async fn login(
        &self,
        session: &dyn IdentitySession,
        username_or_email: &str,
        password: &str,
    ) -> Result<SessionIdentity, MemberError> {
        if username_or_email.is_empty() || password.is_empty() {
            return Err(MemberError::InvalidCredentials);
        }

        let candidates = self.members.find_by_login(username_or_email).await?;
        let member = candidates
            .into_iter()
            .find(|c| self.verifier.verify(password, &c.password_hash))
            .map(|c| c.member)
            .ok_or(MemberError::InvalidCredentials)?;

        let identity = SessionIdentity {
            username: member.username.to_string(),
            member_id: member.id,
        };
        session.establish(&identity).await?;

        tracing::info!(member_id = %member.id, "member logged in");
        Ok(identity)
    }
}

/// Forget the session's identity. Succeeds whether or not anyone was logged in.
///
/// # Errors
///
/// Returns `MemberError::Session` if the session store fails.
pub async fn logout(session: &dyn IdentitySession) -> Result<(), MemberError> {
    session.clear_identity().await?;
    Ok(())
}

/// The identity stored in `session`, if any.
///
/// # Errors
///
/// Returns `MemberError::Session` if the session store fails.
pub async fn current_identity(
    session: &dyn IdentitySession,
) -> Result<Option<SessionIdentity>, MemberError> {
    Ok(session.identity().await?)
}
