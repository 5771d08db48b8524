use serenity::all::{Permissions, UserId};

pub(crate) fn bot_invite_url(
    id: UserId,
    permissions: Permissions,
    with_slash_commands: bool,
) -> String {
    let perms_section = permissions.bits().to_string();
    format!(
        "https://discord.com/oauth2/authorize?client_id={id}&permissions={perms_section}&integration_type=0&scope=bot{}",
        if with_slash_commands {
            "+applications.commands"
        } else {
            ""
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invite_url_requests_manage_roles() {
        let url = bot_invite_url(UserId::new(42), Permissions::MANAGE_ROLES, true);
        assert_eq!(
            url,
            "https://discord.com/oauth2/authorize?client_id=42&permissions=268435456&integration_type=0&scope=bot+applications.commands"
        );
    }

    #[test]
    fn invite_url_without_commands() {
        let url = bot_invite_url(UserId::new(42), Permissions::empty(), false);
        assert!(url.ends_with("permissions=0&integration_type=0&scope=bot"));
    }
}
