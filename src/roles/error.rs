use sea_orm::DbErr;
use thiserror::Error;

pub(crate) type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub(crate) enum RoleMemoryError {
    #[error("role store unavailable")]
    StoreUnavailable(#[source] DbErr),

    #[error("couldn't save roles of member {member_id} in guild {guild_id}")]
    WriteFailed {
        guild_id: String,
        member_id: String,
        #[source]
        source: DbErr,
    },

    #[error("couldn't fetch members of guild {guild_id}")]
    DirectoryFetchFailed {
        guild_id: String,
        #[source]
        source: BoxedError,
    },

    #[error("couldn't grant roles {role_ids:?} to member {member_id} in guild {guild_id}")]
    RoleGrantFailed {
        guild_id: String,
        member_id: String,
        role_ids: Vec<String>,
        #[source]
        source: BoxedError,
    },
}

impl RoleMemoryError {
    /// Classifies a failed write, keeping connectivity problems apart from rejected statements
    pub(crate) fn from_write(guild_id: &str, member_id: &str, err: DbErr) -> Self {
        match err {
            DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => Self::StoreUnavailable(err),
            source => Self::WriteFailed {
                guild_id: guild_id.to_owned(),
                member_id: member_id.to_owned(),
                source,
            },
        }
    }
}
