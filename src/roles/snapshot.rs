use async_trait::async_trait;
use pluralizer::pluralize;
use tracing::{info, warn};

use crate::roles::error::RoleMemoryError;
use crate::roles::record::MemberRoles;
use crate::roles::store::RoleStore;

pub(crate) const INDEX_FAILED: &str = "An error occurred while indexing roles.";

/// Supplies every current member of a guild along with their roles
#[async_trait]
pub(crate) trait MemberDirectory: Sync {
    async fn fetch_members(&self, guild_id: &str) -> Result<Vec<MemberRoles>, RoleMemoryError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SnapshotReport {
    /// Members whose roles were saved
    pub(crate) recorded: usize,
    /// Members that had roles to save but whose write failed
    pub(crate) failed: usize,
}

impl SnapshotReport {
    pub(crate) fn summary(&self) -> String {
        let recorded = pluralize("member", self.recorded as isize, true);
        match self.failed {
            0 => format!("Successfully indexed roles for {recorded}."),
            failed => format!(
                "Successfully indexed roles for {recorded}. Couldn't save roles for {}.",
                pluralize("member", failed as isize, true)
            ),
        }
    }
}

/// The one message an `/index` invocation ends with
pub(crate) fn index_reply(result: &Result<SnapshotReport, RoleMemoryError>) -> String {
    match result {
        Ok(report) => report.summary(),
        Err(_) => String::from(INDEX_FAILED),
    }
}

/// Saves the roles of every member that holds anything besides the everyone role.
///
/// A rejected write is logged and counted, and the remaining members are still processed.
/// An unreachable store ends the run with an error.
pub(crate) async fn snapshot_members<S>(
    store: &S,
    guild_id: &str,
    everyone_role_id: &str,
    members: &[MemberRoles],
) -> Result<SnapshotReport, RoleMemoryError>
where
    S: RoleStore + ?Sized,
{
    let mut report = SnapshotReport::default();

    for member in members {
        let Some(record) = member.to_record(guild_id, everyone_role_id) else {
            continue;
        };

        match store.upsert(record).await {
            Ok(()) => report.recorded += 1,
            Err(err @ RoleMemoryError::StoreUnavailable(_)) => return Err(err),
            Err(err) => {
                warn!(
                    guild_id,
                    member_id = %member.member_id,
                    error = format!("{:#}", anyhow::Error::new(err)),
                    "couldn't save member roles"
                );
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

/// Fetches the guild's members and records their roles
pub(crate) async fn snapshot_guild<D, S>(
    directory: &D,
    store: &S,
    guild_id: &str,
    everyone_role_id: &str,
) -> Result<SnapshotReport, RoleMemoryError>
where
    D: MemberDirectory + ?Sized,
    S: RoleStore + ?Sized,
{
    let members = directory.fetch_members(guild_id).await?;
    let report = snapshot_members(store, guild_id, everyone_role_id, &members).await?;

    info!(
        guild_id,
        members = members.len(),
        recorded = report.recorded,
        failed = report.failed,
        "indexed guild roles"
    );
    Ok(report)
}
