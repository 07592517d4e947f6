use sbs_utils::embed::RenderedEmbed;
use sbs_utils::help_pages::PaginationError;
use sbs_utils::permissions::permission_names;

use crate::{CATEGORIES, CommandMeta};

pub fn unknown_query_message(query: &str) -> String {
    let valid = CATEGORIES
        .iter()
        .map(|category| category.name)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "No command or category called `{}`.\nValid categories: {}",
        query, valid
    )
}

pub fn pagination_error_message(error: PaginationError) -> String {
    format!(
        "I can't show help here. {} (missing: {})",
        error,
        permission_names(error.required()).join(", ")
    )
}

/// Detail page for a single command.
pub fn command_help_embed(prefix: &str, command: &CommandMeta) -> RenderedEmbed {
    let usage = format!("{}{} {}", prefix, command.name, command.signature);

    RenderedEmbed::new(usage.trim_end(), command.desc)
        .field(
            "Arguments",
            "```<> signifies a required argument, while [] signifies an optional argument```",
            false,
        )
        .footer(format!("Category: {}", command.category))
}
