/// Embed value types and the serenity embed renderer.
pub mod embed;
/// Reaction driven help pages.
pub mod help_pages;
/// Permission helper utilities.
pub mod permissions;
