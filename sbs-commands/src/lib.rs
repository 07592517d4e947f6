pub mod info;
pub mod utility;

use poise::serenity_prelude as serenity;
use sbs_core::{Data, Error};
use sbs_utils::help_pages::{CommandInfo, HelpCategory};

pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    /// Argument signature, `<>` for required and `[]` for optional arguments.
    pub signature: &'static str,
}

pub struct CategoryMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

/// Help categories in the order they are listed and reacted with.
pub const CATEGORIES: &[CategoryMeta] = &[
    CategoryMeta {
        name: "Utility",
        description: "General bot information and help.",
        icon: "🛠️",
    },
    CategoryMeta {
        name: "Info",
        description: "Learn about the bot and where to get support.",
        icon: "📖",
    },
];

pub const COMMANDS: &[CommandMeta] = &[
    utility::help::META,
    utility::ping::META,
    info::about::META,
    info::support::META,
];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        utility::help::help(),
        utility::ping::ping(),
        info::about::about(),
        info::support::support(),
    ]
}

/// Build the help pages for every category that has at least one command.
pub fn help_categories() -> Vec<HelpCategory> {
    CATEGORIES
        .iter()
        .filter_map(|category| {
            let commands: Vec<CommandInfo> = COMMANDS
                .iter()
                .filter(|command| command.category == category.name)
                .map(CommandMeta::info)
                .collect();

            if commands.is_empty() {
                return None;
            }

            Some(HelpCategory {
                name: category.name.to_owned(),
                description: category.description.to_owned(),
                icon: serenity::ReactionType::Unicode(category.icon.to_owned()),
                commands,
            })
        })
        .collect()
}

impl CommandMeta {
    pub fn info(&self) -> CommandInfo {
        CommandInfo::new(self.name, self.signature, Some(self.desc.to_owned()))
    }
}

pub fn find_command(name: &str) -> Option<&'static CommandMeta> {
    COMMANDS
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}
