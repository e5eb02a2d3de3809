//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations live in the
//! database crate; the auth layer depends only on this trait so tests
//! can run against the embedded in-memory engine.

use uuid::Uuid;

use crate::error::CoreResult;
use crate::models::account::{Account, CreateAccount, UpdateAccount};
use crate::models::profile::Profile;
use crate::models::role::Role;

pub trait AccountRepository: Send + Sync {
    /// Create an account together with one profile placeholder per
    /// role, in a single transaction. A duplicate username fails the
    /// whole operation.
    fn create(&self, input: CreateAccount) -> impl Future<Output = CoreResult<Account>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CoreResult<Account>> + Send;

    fn get_by_username(&self, username: &str)
    -> impl Future<Output = CoreResult<Account>> + Send;

    fn update(
        &self,
        id: Uuid,
        input: UpdateAccount,
    ) -> impl Future<Output = CoreResult<Account>> + Send;

    /// Fetch the profile placeholder created for an account under a
    /// role. Used by the profile collaborator and by tests asserting
    /// registration atomicity.
    fn get_profile(
        &self,
        account_id: Uuid,
        role: Role,
    ) -> impl Future<Output = CoreResult<Profile>> + Send;
}
