//! Authentication service — credential lifecycle orchestration.
//!
//! Every operation validates its input before touching the repository
//! and classifies each failure into exactly one taxonomy member of
//! [`CoreError`]. Argon2id work runs on the blocking pool so it never
//! stalls the async workers.

use caregate_core::error::{CoreError, CoreResult};
use caregate_core::models::account::{CreateAccount, UpdateAccount};
use caregate_core::models::role::Role;
use caregate_core::repository::AccountRepository;
use tokio::task;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::principal::Principal;
use crate::token;

/// Input for the registration flow.
#[derive(Debug)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
    /// Role name, matched case-insensitively.
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    /// Security question and answer must be supplied together.
    pub security_question: Option<String>,
    pub security_answer: Option<String>,
}

/// Successful registration result.
///
/// Registration does not issue a token — the caller logs in
/// separately.
#[derive(Debug)]
pub struct RegisterOutput {
    pub account_id: Uuid,
    pub username: String,
    pub roles: Vec<Role>,
}

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed JWT session token.
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

/// Authentication service.
///
/// Generic over the repository implementation so that the auth layer
/// has no dependency on the database crate.
pub struct AuthService<A: AccountRepository> {
    accounts: A,
    config: AuthConfig,
}

impl<A: AccountRepository> AuthService<A> {
    pub fn new(accounts: A, config: AuthConfig) -> Self {
        Self { accounts, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Register a new account and its role-scoped profile placeholder.
    ///
    /// The account insert and the placeholder insert are one storage
    /// transaction; a duplicate username fails the whole operation
    /// with `AlreadyExists`.
    pub async fn register(&self, input: RegisterInput) -> CoreResult<RegisterOutput> {
        // 1. Validate before any persistence call, first violation wins.
        if input.username.trim().is_empty() {
            return Err(CoreError::Validation {
                message: "username is required".into(),
            });
        }
        if input.password.is_empty() {
            return Err(CoreError::Validation {
                message: "password is required".into(),
            });
        }
        if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
            return Err(CoreError::Validation {
                message: "first and last name are required".into(),
            });
        }
        let role: Role = input.role.parse()?;
        let security_qa = match (input.security_question, input.security_answer) {
            (Some(q), Some(a)) if !q.trim().is_empty() && !a.is_empty() => Some((q, a)),
            (None, None) => None,
            _ => {
                return Err(CoreError::Validation {
                    message: "security question and answer must be supplied together".into(),
                });
            }
        };

        // 2. Duplicate check. The unique index on username backs this
        //    up, so a racing insert still cannot slip through.
        match self.accounts.get_by_username(&input.username).await {
            Ok(_) => {
                return Err(CoreError::AlreadyExists {
                    entity: format!("account '{}'", input.username),
                });
            }
            Err(CoreError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        // 3. Hash credentials off the async path.
        let password_hash =
            hash_blocking(input.password, self.config.pepper.clone()).await?;
        let (security_question, security_answer_hash) = match security_qa {
            Some((question, answer)) => {
                let hash = hash_blocking(answer, self.config.pepper.clone()).await?;
                (Some(question), Some(hash))
            }
            None => (None, None),
        };

        // 4. Transactional insert of account + profile placeholder.
        let account = self
            .accounts
            .create(CreateAccount {
                username: input.username,
                password_hash,
                roles: vec![role],
                security_question,
                security_answer_hash,
                first_name: input.first_name,
                last_name: input.last_name,
            })
            .await?;

        info!(username = %account.username, role = %role, "account registered");
        Ok(RegisterOutput {
            account_id: account.id,
            username: account.username,
            roles: account.roles,
        })
    }

    /// Authenticate a username/password pair and issue a session token.
    ///
    /// Unknown username, inactive account, and password mismatch all
    /// surface the identical `invalid credentials` reason so callers
    /// cannot enumerate usernames.
    pub async fn login(&self, input: LoginInput) -> CoreResult<LoginOutput> {
        let account = match self.accounts.get_by_username(&input.username).await {
            Ok(a) => a,
            Err(CoreError::NotFound { .. }) => {
                warn!(username = %input.username, "login failed");
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        let valid = verify_blocking(
            input.password,
            account.password_hash.clone(),
            self.config.pepper.clone(),
        )
        .await?;

        if !valid || !account.active {
            warn!(username = %account.username, "login failed");
            return Err(AuthError::InvalidCredentials.into());
        }

        let session_token =
            token::issue_token(account.id, &account.username, &account.roles, &self.config)?;

        info!(username = %account.username, "login succeeded");
        Ok(LoginOutput {
            token: session_token,
            expires_in: self.config.token_lifetime_secs,
        })
    }

    /// Verify a session token and produce the principal it asserts.
    ///
    /// Pure and synchronous; runs before any role check.
    pub fn authenticate(&self, session_token: &str) -> CoreResult<Principal> {
        Ok(token::authenticate(session_token, &self.config)?)
    }

    /// Replace an account's password after verifying the old one.
    ///
    /// Callers pass the account id of an already-authenticated
    /// principal; an `old_password` mismatch is an authentication
    /// failure.
    pub async fn change_password(
        &self,
        account_id: Uuid,
        old_password: String,
        new_password: String,
    ) -> CoreResult<()> {
        if new_password.is_empty() {
            return Err(CoreError::Validation {
                message: "new password is required".into(),
            });
        }

        let account = self.accounts.get_by_id(account_id).await?;
        let valid = verify_blocking(
            old_password,
            account.password_hash.clone(),
            self.config.pepper.clone(),
        )
        .await?;
        if !valid {
            warn!(username = %account.username, "password change rejected");
            return Err(AuthError::InvalidCredentials.into());
        }

        let password_hash = hash_blocking(new_password, self.config.pepper.clone()).await?;
        self.accounts
            .update(
                account_id,
                UpdateAccount {
                    password_hash: Some(password_hash),
                    ..Default::default()
                },
            )
            .await?;

        info!(username = %account.username, "password changed");
        Ok(())
    }

    /// Store a security question and the hash of its answer.
    pub async fn set_security_qa(
        &self,
        username: &str,
        question: String,
        answer: String,
    ) -> CoreResult<()> {
        if question.trim().is_empty() || answer.is_empty() {
            return Err(CoreError::Validation {
                message: "security question and answer are required".into(),
            });
        }

        let account = self.accounts.get_by_username(username).await?;
        let answer_hash = hash_blocking(answer, self.config.pepper.clone()).await?;
        self.accounts
            .update(
                account.id,
                UpdateAccount {
                    security_question: Some(question),
                    security_answer_hash: Some(answer_hash),
                    ..Default::default()
                },
            )
            .await?;

        info!(username = %account.username, "security question set");
        Ok(())
    }

    /// Return the stored security question for an account.
    ///
    /// A read-only probe; `NotFound` both for an unknown username and
    /// for an account that never configured a question.
    pub async fn security_question(&self, username: &str) -> CoreResult<String> {
        let account = self.accounts.get_by_username(username).await?;
        account
            .security_question
            .clone()
            .ok_or_else(|| CoreError::NotFound {
                entity: "security question".into(),
                id: username.into(),
            })
    }

    /// Reset a forgotten password by answering the security question.
    pub async fn reset_password(
        &self,
        username: &str,
        answer: String,
        new_password: String,
    ) -> CoreResult<()> {
        if new_password.is_empty() {
            return Err(CoreError::Validation {
                message: "new password is required".into(),
            });
        }

        let account = self.accounts.get_by_username(username).await?;
        let answer_hash = account
            .security_answer_hash
            .clone()
            .ok_or_else(|| CoreError::NotFound {
                entity: "security question".into(),
                id: username.into(),
            })?;

        let valid = verify_blocking(answer, answer_hash, self.config.pepper.clone()).await?;
        if !valid {
            warn!(username = %account.username, "security answer rejected");
            return Err(AuthError::InvalidCredentials.into());
        }

        let password_hash = hash_blocking(new_password, self.config.pepper.clone()).await?;
        self.accounts
            .update(
                account.id,
                UpdateAccount {
                    password_hash: Some(password_hash),
                    ..Default::default()
                },
            )
            .await?;

        info!(username = %account.username, "password reset via security question");
        Ok(())
    }
}

/// Run Argon2id hashing on the blocking pool so CPU-bound work never
/// blocks concurrent request handling.
async fn hash_blocking(secret: String, pepper: Option<String>) -> CoreResult<String> {
    task::spawn_blocking(move || password::hash_password(&secret, pepper.as_deref()))
        .await
        .map_err(|e| CoreError::Service(format!("hashing task failed: {e}")))?
        .map_err(CoreError::from)
}

/// Run Argon2id verification on the blocking pool.
async fn verify_blocking(
    secret: String,
    hash: String,
    pepper: Option<String>,
) -> CoreResult<bool> {
    task::spawn_blocking(move || password::verify_password(&secret, &hash, pepper.as_deref()))
        .await
        .map_err(|e| CoreError::Service(format!("verification task failed: {e}")))?
        .map_err(CoreError::from)
}
