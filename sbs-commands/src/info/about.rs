use poise::serenity_prelude as serenity;
use sbs_core::{Context, Error};
use sbs_utils::embed::DEFAULT_EMBED_COLOR;

use crate::{COMMANDS, CommandMeta};

pub const META: CommandMeta = CommandMeta {
    name: "about",
    desc: "Shows what the bot is and how to get started.",
    category: "Info",
    signature: "",
};

#[poise::command(prefix_command, slash_command, category = "Info")]
pub async fn about(ctx: Context<'_>) -> Result<(), Error> {
    let prefix = &ctx.data().config.prefix;

    let embed = serenity::CreateEmbed::new()
        .title("Skyblock Simplified")
        .color(DEFAULT_EMBED_COLOR)
        .description(about_description(prefix));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

fn about_description(prefix: &str) -> String {
    format!(
        "A Skyblock bot designed to streamline gameplay.\n\
         {} commands are available, use `{prefix}help` to browse them.",
        COMMANDS.len()
    )
}

#[cfg(test)]
mod tests {
    use super::about_description;

    #[test]
    fn description_mentions_prefix() {
        assert!(about_description("+").contains("`+help`"));
    }
}
