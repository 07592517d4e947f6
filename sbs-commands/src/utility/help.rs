use std::sync::Arc;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use tracing::{debug, warn};

use sbs_core::{Context, Error};
use sbs_utils::embed::build_rendered_embed;
use sbs_utils::help_pages::{
    HelpCategory, HelpPages, HelpPagesOptions, SerenityChatSession,
};
use sbs_utils::permissions::bot_channel_permissions;

use crate::utility::embeds::{
    command_help_embed, pagination_error_message, unknown_query_message,
};
use crate::{CommandMeta, find_command, help_categories};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Browse the command list or show help for one command or category.",
    category: "Utility",
    signature: "[command]",
};

enum HelpTarget {
    Categories(Vec<HelpCategory>),
    Command(&'static CommandMeta),
    Unknown,
}

#[poise::command(prefix_command, category = "Utility")]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Command or category"] query: Option<String>,
) -> Result<(), Error> {
    let config = &ctx.data().config;

    let categories = match resolve_target(query.as_deref()) {
        HelpTarget::Categories(categories) => categories,
        HelpTarget::Command(command) => {
            let embed = command_help_embed(&config.prefix, command);
            ctx.send(poise::CreateReply::default().embed(build_rendered_embed(&embed)))
                .await?;
            return Ok(());
        }
        HelpTarget::Unknown => {
            let query = query.as_deref().unwrap_or_default().trim();
            ctx.say(unknown_query_message(query)).await?;
            return Ok(());
        }
    };

    let permissions =
        bot_channel_permissions(ctx.serenity_context(), ctx.channel_id(), ctx.guild_id())
            .await
            .with_context(|| permission_lookup_context(ctx.channel_id()))?;

    let session = Arc::new(SerenityChatSession::new(
        ctx.serenity_context(),
        ctx.channel_id(),
        ctx.author().id,
    ));

    let options = HelpPagesOptions {
        direct_message: config.help_dm,
        timeout: config.help_timeout,
        timeout_icons: config
            .timeout_emoji
            .iter()
            .map(|icon| serenity::ReactionType::Unicode(icon.clone()))
            .collect(),
        ..HelpPagesOptions::new(config.prefix.clone(), tokio::runtime::Handle::current())
    };

    let mut pages =
        match HelpPages::new(session, ctx.author().id, categories, permissions, options) {
            Ok(pages) => pages,
            Err(err) => {
                warn!(%err, channel_id = %ctx.channel_id(), "cannot paginate help");
                ctx.say(pagination_error_message(err)).await?;
                return Ok(());
            }
        };

    debug!(paginating = pages.is_paginating(), "showing help pages");
    pages.paginate().await?;
    Ok(())
}

fn permission_lookup_context(channel_id: serenity::ChannelId) -> String {
    format!("resolving bot permissions in channel {channel_id}")
}

fn resolve_target(query: Option<&str>) -> HelpTarget {
    let categories = help_categories();

    let Some(query) = query.map(str::trim).filter(|query| !query.is_empty()) else {
        return HelpTarget::Categories(categories);
    };

    if let Some(category) = categories
        .into_iter()
        .find(|category| category.name.eq_ignore_ascii_case(query))
    {
        return HelpTarget::Categories(vec![category]);
    }

    match find_command(query) {
        Some(command) => HelpTarget::Command(command),
        None => HelpTarget::Unknown,
    }
}
