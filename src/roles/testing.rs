//! Fakes and fixtures shared by the role tests

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, RuntimeErr};

use crate::roles::error::RoleMemoryError;
use crate::roles::record::{MemberRoles, RoleRecord};
use crate::roles::restore::RoleGranter;
use crate::roles::snapshot::MemberDirectory;
use crate::roles::store::RoleStore;

/// Fresh in-memory database with the real migrations applied
pub(crate) async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    // every pooled connection would otherwise get its own empty database
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub(crate) fn record(guild_id: &str, member_id: &str, roles: &[&str]) -> RoleRecord {
    RoleRecord {
        guild_id: guild_id.to_owned(),
        member_id: member_id.to_owned(),
        role_ids: roles.iter().map(|r| r.to_string()).collect(),
        display_name: format!("member {member_id}"),
    }
}

pub(crate) fn member(member_id: &str, roles: &[&str]) -> MemberRoles {
    MemberRoles {
        member_id: member_id.to_owned(),
        display_name: format!("member {member_id}"),
        role_ids: roles.iter().map(|r| r.to_string()).collect(),
    }
}

pub(crate) struct FakeDirectory {
    pub(crate) members: Mutex<Vec<MemberRoles>>,
    pub(crate) unreachable: bool,
}

impl FakeDirectory {
    pub(crate) fn new(members: Vec<MemberRoles>) -> Self {
        Self {
            members: Mutex::new(members),
            unreachable: false,
        }
    }

    pub(crate) fn unreachable() -> Self {
        Self {
            members: Mutex::new(Vec::new()),
            unreachable: true,
        }
    }

    pub(crate) fn set_members(&self, members: Vec<MemberRoles>) {
        *self.members.lock().unwrap() = members;
    }
}

#[async_trait]
impl MemberDirectory for FakeDirectory {
    async fn fetch_members(&self, guild_id: &str) -> Result<Vec<MemberRoles>, RoleMemoryError> {
        if self.unreachable {
            return Err(RoleMemoryError::DirectoryFetchFailed {
                guild_id: guild_id.to_owned(),
                source: "gateway closed".into(),
            });
        }
        Ok(self.members.lock().unwrap().clone())
    }
}

/// Records every grant request, optionally rejecting all of them
#[derive(Default)]
pub(crate) struct RecordingGranter {
    pub(crate) calls: Mutex<Vec<(String, String, Vec<String>)>>,
    pub(crate) reject: bool,
}

impl RecordingGranter {
    pub(crate) fn rejecting() -> Self {
        Self {
            reject: true,
            ..Default::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<(String, String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoleGranter for RecordingGranter {
    async fn grant_roles(
        &self,
        guild_id: &str,
        member_id: &str,
        role_ids: &[String],
    ) -> Result<(), RoleMemoryError> {
        self.calls.lock().unwrap().push((
            guild_id.to_owned(),
            member_id.to_owned(),
            role_ids.to_vec(),
        ));

        if self.reject {
            return Err(RoleMemoryError::RoleGrantFailed {
                guild_id: guild_id.to_owned(),
                member_id: member_id.to_owned(),
                role_ids: role_ids.to_vec(),
                source: "Missing Permissions".into(),
            });
        }
        Ok(())
    }
}

/// Wraps a store and refuses writes for the given members
pub(crate) struct RejectingStore<S> {
    pub(crate) inner: S,
    pub(crate) rejected: HashSet<String>,
}

#[async_trait]
impl<S: RoleStore> RoleStore for RejectingStore<S> {
    async fn upsert(&self, record: RoleRecord) -> Result<(), RoleMemoryError> {
        if self.rejected.contains(&record.member_id) {
            return Err(RoleMemoryError::from_write(
                &record.guild_id,
                &record.member_id,
                DbErr::Custom(String::from("constraint violated")),
            ));
        }
        self.inner.upsert(record).await
    }

    async fn get(
        &self,
        guild_id: &str,
        member_id: &str,
    ) -> Result<Option<RoleRecord>, RoleMemoryError> {
        self.inner.get(guild_id, member_id).await
    }
}

/// A store whose database connection is gone
pub(crate) struct UnreachableStore;

fn connection_refused() -> DbErr {
    DbErr::Conn(RuntimeErr::Internal(String::from("connection refused")))
}

#[async_trait]
impl RoleStore for UnreachableStore {
    async fn upsert(&self, record: RoleRecord) -> Result<(), RoleMemoryError> {
        Err(RoleMemoryError::from_write(
            &record.guild_id,
            &record.member_id,
            connection_refused(),
        ))
    }

    async fn get(
        &self,
        _guild_id: &str,
        _member_id: &str,
    ) -> Result<Option<RoleRecord>, RoleMemoryError> {
        Err(RoleMemoryError::StoreUnavailable(connection_refused()))
    }
}
