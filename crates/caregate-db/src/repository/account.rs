//! SurrealDB implementation of [`AccountRepository`].
//!
//! The create path inserts the account row and its profile
//! placeholder(s) inside one transaction so registration never
//! half-succeeds. Uniqueness of usernames is enforced by the
//! `idx_account_username` index; a violation is surfaced as
//! [`DbError::AlreadyExists`].

use caregate_core::error::CoreResult;
use caregate_core::models::account::{Account, CreateAccount, UpdateAccount};
use caregate_core::models::profile::Profile;
use caregate_core::models::role::Role;
use caregate_core::repository::AccountRepository;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use surrealdb::{Connection, Surreal};
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, Deserialize)]
struct AccountRow {
    username: String,
    password_hash: String,
    roles: Vec<String>,
    active: bool,
    security_question: Option<String>,
    security_answer_hash: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, Deserialize)]
struct AccountRowWithId {
    record_id: String,
    username: String,
    password_hash: String,
    roles: Vec<String>,
    active: bool,
    security_question: Option<String>,
    security_answer_hash: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ProfileRowWithId {
    record_id: String,
    account_id: String,
    role: String,
    first_name: String,
    last_name: String,
    created_at: DateTime<Utc>,
}

fn parse_role(s: &str) -> Result<Role, DbError> {
    match s {
        "patient" => Ok(Role::Patient),
        "physician" => Ok(Role::Physician),
        "admin" => Ok(Role::Admin),
        other => Err(DbError::Migration(format!("unknown role: {other}"))),
    }
}

fn parse_roles(roles: &[String]) -> Result<Vec<Role>, DbError> {
    roles.iter().map(|r| parse_role(r)).collect()
}

impl AccountRow {
    fn into_account(self, id: Uuid) -> Result<Account, DbError> {
        Ok(Account {
            id,
            username: self.username,
            password_hash: self.password_hash,
            roles: parse_roles(&self.roles)?,
            active: self.active,
            security_question: self.security_question,
            security_answer_hash: self.security_answer_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl AccountRowWithId {
    fn try_into_account(self) -> Result<Account, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(Account {
            id,
            username: self.username,
            password_hash: self.password_hash,
            roles: parse_roles(&self.roles)?,
            active: self.active,
            security_question: self.security_question,
            security_answer_hash: self.security_answer_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl ProfileRowWithId {
    fn try_into_profile(self) -> Result<Profile, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let account_id = Uuid::parse_str(&self.account_id)
            .map_err(|e| DbError::Migration(format!("invalid account UUID: {e}")))?;
        Ok(Profile {
            id,
            account_id,
            role: parse_role(&self.role)?,
            first_name: self.first_name,
            last_name: self.last_name,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Account repository.
#[derive(Clone)]
pub struct SurrealAccountRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAccountRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AccountRepository for SurrealAccountRepository<C> {
    async fn create(&self, input: CreateAccount) -> CoreResult<Account> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let roles: Vec<String> = input.roles.iter().map(|r| r.as_str().to_owned()).collect();

        // Account insert plus one profile placeholder per role, in a
        // single transaction.
        let mut sql = String::from(
            "BEGIN TRANSACTION; \
             CREATE type::thing('account', $id) SET \
             username = $username, \
             password_hash = $password_hash, \
             roles = $roles, \
             active = true, \
             security_question = $security_question, \
             security_answer_hash = $security_answer_hash;",
        );
        for idx in 0..input.roles.len() {
            sql.push_str(&format!(
                " CREATE type::thing('profile', $profile_id_{idx}) SET \
                 account_id = $id, role = $role_{idx}, \
                 first_name = $first_name, last_name = $last_name;"
            ));
        }
        sql.push_str(" COMMIT TRANSACTION;");

        let mut builder = self
            .db
            .query(sql)
            .bind(("id", id_str.clone()))
            .bind(("username", input.username.clone()))
            .bind(("password_hash", input.password_hash))
            .bind(("roles", roles))
            .bind(("security_question", input.security_question))
            .bind(("security_answer_hash", input.security_answer_hash))
            .bind(("first_name", input.first_name))
            .bind(("last_name", input.last_name));

        for (idx, role) in input.roles.iter().enumerate() {
            builder = builder
                .bind((format!("profile_id_{idx}"), Uuid::new_v4().to_string()))
                .bind((format!("role_{idx}"), role.as_str().to_owned()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| {
            let msg = e.to_string();
            if msg.contains("idx_account_username") {
                DbError::AlreadyExists {
                    entity: format!("account '{}'", input.username),
                }
            } else {
                DbError::Migration(msg)
            }
        })?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: id_str,
        })?;

        Ok(row.into_account(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> CoreResult<Account> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::thing('account', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: id_str,
        })?;

        Ok(row.into_account(id)?)
    }

    async fn get_by_username(&self, username: &str) -> CoreResult<Account> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM account \
                 WHERE username = $username",
            )
            .bind(("username", username.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccountRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: format!("username={username}"),
        })?;

        Ok(row.try_into_account()?)
    }

    async fn update(&self, id: Uuid, input: UpdateAccount) -> CoreResult<Account> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.password_hash.is_some() {
            sets.push("password_hash = $password_hash");
        }
        if input.security_question.is_some() {
            sets.push("security_question = $security_question");
        }
        if input.security_answer_hash.is_some() {
            sets.push("security_answer_hash = $security_answer_hash");
        }
        if input.active.is_some() {
            sets.push("active = $active");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::thing('account', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(query).bind(("id", id_str.clone()));

        if let Some(password_hash) = input.password_hash {
            builder = builder.bind(("password_hash", password_hash));
        }
        if let Some(security_question) = input.security_question {
            builder = builder.bind(("security_question", security_question));
        }
        if let Some(security_answer_hash) = input.security_answer_hash {
            builder = builder.bind(("security_answer_hash", security_answer_hash));
        }
        if let Some(active) = input.active {
            builder = builder.bind(("active", active));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: id_str,
        })?;

        Ok(row.into_account(id)?)
    }

    async fn get_profile(&self, account_id: Uuid, role: Role) -> CoreResult<Profile> {
        let account_id_str = account_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM profile \
                 WHERE account_id = $account_id AND role = $role",
            )
            .bind(("account_id", account_id_str.clone()))
            .bind(("role", role.as_str().to_owned()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProfileRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "profile".into(),
            id: format!("account={account_id_str} role={role}"),
        })?;

        Ok(row.try_into_profile()?)
    }
}
