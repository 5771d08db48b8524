use entity::user_role;

/// The roles a member held when their guild was last indexed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RoleRecord {
    pub(crate) guild_id: String,
    pub(crate) member_id: String,
    pub(crate) role_ids: Vec<String>,
    /// Informational only, never used for matching
    pub(crate) display_name: String,
}

/// A member as reported by the member directory, before filtering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MemberRoles {
    pub(crate) member_id: String,
    pub(crate) display_name: String,
    pub(crate) role_ids: Vec<String>,
}

impl MemberRoles {
    /// Builds the record to store for this member, or `None` when the member holds nothing
    /// besides the everyone role.
    pub(crate) fn to_record(&self, guild_id: &str, everyone_role_id: &str) -> Option<RoleRecord> {
        let role_ids: Vec<String> = self
            .role_ids
            .iter()
            .filter(|id| id.as_str() != everyone_role_id)
            .cloned()
            .collect();

        if role_ids.is_empty() {
            return None;
        }

        Some(RoleRecord {
            guild_id: guild_id.to_owned(),
            member_id: self.member_id.clone(),
            role_ids,
            display_name: self.display_name.clone(),
        })
    }
}

impl From<user_role::Model> for RoleRecord {
    fn from(row: user_role::Model) -> Self {
        Self {
            guild_id: row.guild_id,
            member_id: row.user_id,
            role_ids: row.role_ids.0,
            display_name: row.username,
        }
    }
}
