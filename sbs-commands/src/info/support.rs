use sbs_core::{Context, Error};

use crate::CommandMeta;

pub const META: CommandMeta = CommandMeta {
    name: "support",
    desc: "Links the official support server.",
    category: "Info",
    signature: "",
};

pub const SUPPORT_SERVER_URL: &str = "https://discord.gg/sbs";

#[poise::command(prefix_command, slash_command, category = "Info")]
pub async fn support(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(format!(
        "Need a hand? Join the official support server: {SUPPORT_SERVER_URL}"
    ))
    .await?;
    Ok(())
}
