use anyhow::anyhow;
use poise::serenity_prelude as serenity;

/// Convert a permission bitset into a sorted display list.
///
/// If `ADMINISTRATOR` is present, only `ADMINISTRATOR` is returned because
/// it implicitly grants all permissions.
pub fn permission_names(perms: serenity::Permissions) -> Vec<String> {
    if perms.contains(serenity::Permissions::ADMINISTRATOR) {
        return vec!["ADMINISTRATOR".to_owned()];
    }

    let mut names: Vec<String> = perms
        .iter_names()
        .map(|(name, _flag)| name.to_owned())
        .collect();
    names.sort_unstable();
    names
}

/// Permissions a bot always holds inside a direct message channel.
pub fn dm_permissions() -> serenity::Permissions {
    serenity::Permissions::VIEW_CHANNEL
        | serenity::Permissions::SEND_MESSAGES
        | serenity::Permissions::EMBED_LINKS
        | serenity::Permissions::ATTACH_FILES
        | serenity::Permissions::READ_MESSAGE_HISTORY
        | serenity::Permissions::ADD_REACTIONS
        | serenity::Permissions::USE_EXTERNAL_EMOJIS
}

/// Resolve the bot's own effective permissions in the invoking channel.
///
/// Outside a guild the fixed DM permission set is returned. Inside a guild the
/// cache is consulted first and the HTTP API is used when the guild, channel or
/// bot member is not cached.
pub async fn bot_channel_permissions(
    ctx: &serenity::Context,
    channel_id: serenity::ChannelId,
    guild_id: Option<serenity::GuildId>,
) -> anyhow::Result<serenity::Permissions> {
    let Some(guild_id) = guild_id else {
        return Ok(dm_permissions());
    };

    let bot_id = ctx.cache.current_user().id;

    let cached = ctx.cache.guild(guild_id).and_then(|guild| {
        let channel = guild
            .channels
            .get(&channel_id)
            .or_else(|| guild.threads.iter().find(|thread| thread.id == channel_id))?;
        let member = guild.members.get(&bot_id)?;

        Some(guild.user_permissions_in(channel, member))
    });

    if let Some(perms) = cached {
        return Ok(perms);
    }

    let guild = guild_id.to_partial_guild(ctx).await?;
    let member = guild_id.member(ctx, bot_id).await?;
    let channel = channel_id
        .to_channel(ctx)
        .await?
        .guild()
        .ok_or_else(|| anyhow!("channel {channel_id} is not part of guild {guild_id}"))?;

    Ok(guild.user_permissions_in(&channel, &member))
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude as serenity;

    use super::{dm_permissions, permission_names};

    #[test]
    fn administrator_collapses_names() {
        let perms = serenity::Permissions::ADMINISTRATOR | serenity::Permissions::SEND_MESSAGES;
        assert_eq!(permission_names(perms), vec!["ADMINISTRATOR".to_owned()]);
    }

    #[test]
    fn names_are_sorted() {
        let perms = serenity::Permissions::SEND_MESSAGES | serenity::Permissions::ADD_REACTIONS;
        assert_eq!(
            permission_names(perms),
            vec!["ADD_REACTIONS".to_owned(), "SEND_MESSAGES".to_owned()]
        );
    }

    #[test]
    fn dm_permissions_allow_reaction_pagination() {
        let perms = dm_permissions();
        assert!(perms.embed_links());
        assert!(perms.send_messages());
        assert!(perms.add_reactions());
        assert!(perms.read_message_history());
    }
}
