//! Reaction driven help pages.
//!
//! A help invocation posts one message and the author flips between category
//! pages by clicking the category icons the bot adds as reactions. The message
//! is edited in place; after an idle timeout the navigation reactions are
//! swapped for the configured timeout icons.

mod session;

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::stream::BoxStream;
use poise::serenity_prelude as serenity;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::embed::{BLANK_FIELD_NAME, RenderedEmbed};

pub use session::{ChatSession, MessageRef, ReactionEvent, SerenityChatSession};

pub const DEFAULT_HELP_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_PAGE_ICON: &str = "ℹ️";

const OVERVIEW_TITLE: &str = "Skyblock Simplified";
const OVERVIEW_DESCRIPTION: &str =
    "Welcome to Skyblock Simplified, a Skyblock bot designed to streamline gameplay.";
const OVERVIEW_HINT_NAME: &str = "React to this message with any of the emojis to view commands.";
const OVERVIEW_HINT_VALUE: &str =
    "```<> signifies a required argument, while [] signifies an optional argument```";
const SUPPORT_SERVER_TEXT: &str =
    "For more help, join the official bot support server: https://discord.gg/sbs";
const NO_HELP_GIVEN: &str = "No help given";

/// Raised when the bot lacks a permission the help view depends on.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PaginationError {
    #[error("Bot does not have embed links permission.")]
    MissingEmbedLinks,
    #[error("Bot cannot send messages.")]
    MissingSendMessages,
    #[error("Bot does not have add reactions permission.")]
    MissingAddReactions,
    #[error("Bot does not have Read Message History permission.")]
    MissingReadMessageHistory,
}

impl PaginationError {
    /// The permission whose absence produced this error.
    pub fn required(self) -> serenity::Permissions {
        match self {
            Self::MissingEmbedLinks => serenity::Permissions::EMBED_LINKS,
            Self::MissingSendMessages => serenity::Permissions::SEND_MESSAGES,
            Self::MissingAddReactions => serenity::Permissions::ADD_REACTIONS,
            Self::MissingReadMessageHistory => serenity::Permissions::READ_MESSAGE_HISTORY,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandInfo {
    pub qualified_name: String,
    pub signature: String,
    pub short_doc: Option<String>,
}

impl CommandInfo {
    pub fn new(
        qualified_name: impl Into<String>,
        signature: impl Into<String>,
        short_doc: Option<String>,
    ) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            signature: signature.into(),
            short_doc,
        }
    }

    pub fn usage_line(&self) -> String {
        format!("{} {}", self.qualified_name, self.signature)
    }

    pub fn short_doc_or_fallback(&self) -> &str {
        self.short_doc
            .as_deref()
            .filter(|doc| !doc.is_empty())
            .unwrap_or(NO_HELP_GIVEN)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HelpCategory {
    pub name: String,
    pub description: String,
    pub icon: serenity::ReactionType,
    pub commands: Vec<CommandInfo>,
}

/// One navigable page. The overview page is a variant of its own rather than
/// a category with a reserved name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageEntry {
    Category(HelpCategory),
    Default { icon: serenity::ReactionType },
}

impl PageEntry {
    fn default_page() -> Self {
        Self::Default {
            icon: serenity::ReactionType::Unicode(DEFAULT_PAGE_ICON.to_owned()),
        }
    }

    pub fn icon(&self) -> &serenity::ReactionType {
        match self {
            Self::Category(category) => &category.icon,
            Self::Default { icon } => icon,
        }
    }

    pub fn category(&self) -> Option<&HelpCategory> {
        match self {
            Self::Category(category) => Some(category),
            Self::Default { .. } => None,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default { .. })
    }
}

/// Caller supplied settings for one help invocation.
#[derive(Clone, Debug)]
pub struct HelpPagesOptions {
    pub prefix: String,
    pub direct_message: bool,
    pub timeout: Duration,
    pub timeout_icons: Vec<serenity::ReactionType>,
    /// Runtime the first render is spawned on so reaction listening starts at once.
    pub runtime: tokio::runtime::Handle,
}

impl HelpPagesOptions {
    pub fn new(prefix: impl Into<String>, runtime: tokio::runtime::Handle) -> Self {
        Self {
            prefix: prefix.into(),
            direct_message: false,
            timeout: DEFAULT_HELP_TIMEOUT,
            timeout_icons: Vec::new(),
            runtime,
        }
    }
}

type PendingMessage = oneshot::Receiver<Result<MessageRef, serenity::Error>>;

pub struct HelpPages<S: ChatSession> {
    session: Arc<S>,
    options: HelpPagesOptions,
    author: serenity::UserId,
    entries: Vec<PageEntry>,
    paginating: bool,
    current_page: Option<usize>,
    previous_page: Option<usize>,
    message: Option<MessageRef>,
    pending_message: Option<PendingMessage>,
}

impl<S: ChatSession> HelpPages<S> {
    /// Validate permissions and build the page list.
    ///
    /// `permissions` are the bot's own permissions in the invoking channel.
    pub fn new(
        session: Arc<S>,
        author: serenity::UserId,
        categories: Vec<HelpCategory>,
        permissions: serenity::Permissions,
        options: HelpPagesOptions,
    ) -> Result<Self, PaginationError> {
        let paginating = categories.len() > 1;

        if !permissions.embed_links() {
            return Err(PaginationError::MissingEmbedLinks);
        }

        if !permissions.send_messages() {
            return Err(PaginationError::MissingSendMessages);
        }

        let mut entries: Vec<PageEntry> =
            categories.into_iter().map(PageEntry::Category).collect();

        if paginating {
            if !permissions.add_reactions() {
                return Err(PaginationError::MissingAddReactions);
            }

            if !permissions.read_message_history() {
                return Err(PaginationError::MissingReadMessageHistory);
            }

            entries.push(PageEntry::default_page());
        }

        Ok(Self {
            session,
            options,
            author,
            entries,
            paginating,
            current_page: None,
            previous_page: None,
            message: None,
            pending_message: None,
        })
    }

    pub fn is_paginating(&self) -> bool {
        self.paginating
    }

    pub fn entries(&self) -> &[PageEntry] {
        &self.entries
    }

    pub fn current_page(&self) -> Option<&PageEntry> {
        self.current_page.and_then(|index| self.entries.get(index))
    }

    pub fn previous_page(&self) -> Option<&PageEntry> {
        self.previous_page.and_then(|index| self.entries.get(index))
    }

    pub fn message(&self) -> Option<MessageRef> {
        self.message
    }

    /// Commands of the category called `name`. The overview never matches.
    pub fn get_page(&self, name: &str) -> Option<&[CommandInfo]> {
        self.categories()
            .find(|category| category.name == name)
            .map(|category| category.commands.as_slice())
    }

    fn categories(&self) -> impl Iterator<Item = &HelpCategory> {
        self.entries.iter().filter_map(PageEntry::category)
    }

    fn default_page_index(&self) -> Option<usize> {
        self.entries.iter().position(PageEntry::is_default)
    }

    pub fn render_overview(&self) -> RenderedEmbed {
        self.categories().fold(
            RenderedEmbed::new(OVERVIEW_TITLE, OVERVIEW_DESCRIPTION).field(
                OVERVIEW_HINT_NAME,
                OVERVIEW_HINT_VALUE,
                false,
            ),
            |rendered, category| {
                rendered.field(
                    format!("{} {}", category.icon, category.name),
                    format!("```{}```", category.description),
                    true,
                )
            },
        )
    }

    /// Render the page at `page`; the overview page, unknown indices and
    /// categories without commands all render as the overview.
    pub fn render_page(&self, page: usize) -> RenderedEmbed {
        let Some(category) = self.entries.get(page).and_then(PageEntry::category) else {
            return self.render_overview();
        };

        match self.get_page(&category.name) {
            Some(commands) if !commands.is_empty() => {
                render_category(category, commands, &self.options.prefix)
            }
            _ => self.render_overview(),
        }
    }

    /// Display `page`.
    ///
    /// Without pagination this sends the page as the only message. With
    /// `first` it posts the overview and adds the navigation reactions.
    /// Otherwise the existing message is edited and the bot's reactions are
    /// reconciled: the icon of the current page is removed and the icon of
    /// the previous page is added back.
    pub async fn show_page(&mut self, page: usize, first: bool) -> Result<(), serenity::Error> {
        if !self.paginating {
            let rendered = self.render_page(page);
            let message = self
                .session
                .send(rendered, self.options.direct_message)
                .await?;
            self.message = Some(message);
            return Ok(());
        }

        if first {
            self.begin_first_page().await;
            return self.await_pending_message().await;
        }

        let Some(message) = self.message else {
            warn!(page, "help page requested before the help message was sent");
            return Ok(());
        };

        let rendered = self.render_page(page);
        self.session.edit(&message, rendered).await?;

        for (index, entry) in self.entries.iter().enumerate() {
            if Some(index) == self.current_page {
                if let Err(source) = self
                    .session
                    .remove_reaction(&message, entry.icon().clone(), None)
                    .await
                {
                    debug!(?source, message_id = %message.message_id, emoji = %entry.icon(), "failed to remove help page reaction");
                }
            }

            if Some(index) == self.previous_page {
                if let Err(source) = self
                    .session
                    .add_reaction(&message, entry.icon().clone())
                    .await
                {
                    debug!(?source, message_id = %message.message_id, emoji = %entry.icon(), "failed to add help page reaction");
                }
            }
        }

        Ok(())
    }

    /// Accept a reaction when it comes from the author, targets the help
    /// message and matches a page icon. Accepting moves to that page.
    pub fn react_check(&mut self, event: &ReactionEvent) -> bool {
        if event.user_id != self.author {
            return false;
        }

        if self.message.map(|message| message.message_id) != Some(event.message_id) {
            return false;
        }

        let Some(page) = self
            .entries
            .iter()
            .position(|entry| same_emoji(entry.icon(), &event.emoji))
        else {
            return false;
        };

        self.previous_page = self.current_page;
        self.current_page = Some(page);
        true
    }

    /// Show the first page and, when there is more than one, keep reacting to
    /// the author's reactions until the idle timeout expires.
    pub async fn paginate(&mut self) -> Result<(), serenity::Error> {
        if !self.paginating {
            return self.show_page(0, true).await;
        }

        let mut events = self.session.reaction_events();
        let first_page = self.begin_first_page();
        self.options.runtime.spawn(first_page);

        while self.paginating {
            let Some(event) = self.next_accepted_reaction(&mut events).await? else {
                self.expire().await?;
                break;
            };

            if let Some(message) = self.message {
                if let Err(source) = self
                    .session
                    .remove_reaction(&message, event.emoji.clone(), Some(event.user_id))
                    .await
                {
                    debug!(?source, user_id = %event.user_id, "could not remove the author's help reaction");
                }
            }

            if let Some(page) = self.current_page {
                self.show_page(page, false).await?;
            }
        }

        Ok(())
    }

    /// Prepare the first render. The returned future owns everything it needs
    /// so it can be spawned; the message reaches `self` through a channel as
    /// soon as it is posted.
    fn begin_first_page(&mut self) -> impl Future<Output = ()> + Send + use<S> {
        let (sent, pending) = oneshot::channel();
        self.pending_message = Some(pending);
        self.current_page = self.default_page_index();

        let icons = self
            .categories()
            .map(|category| category.icon.clone())
            .collect();

        send_first_page(
            self.session.clone(),
            self.render_overview(),
            icons,
            self.options.direct_message,
            sent,
        )
    }

    async fn await_pending_message(&mut self) -> Result<(), serenity::Error> {
        let Some(pending) = self.pending_message.take() else {
            return Ok(());
        };

        self.settle_pending_message(pending.await)
    }

    fn settle_pending_message(
        &mut self,
        outcome: Result<Result<MessageRef, serenity::Error>, oneshot::error::RecvError>,
    ) -> Result<(), serenity::Error> {
        let message = outcome.map_err(|_| {
            serenity::Error::Other("help page render stopped before the message was sent")
        })??;

        self.message = Some(message);
        Ok(())
    }

    /// Wait for the next accepted reaction. `None` means the idle timeout
    /// expired or the event stream ended.
    async fn next_accepted_reaction(
        &mut self,
        events: &mut BoxStream<'static, ReactionEvent>,
    ) -> Result<Option<ReactionEvent>, serenity::Error> {
        let deadline = Instant::now() + self.options.timeout;

        loop {
            let waited = match self.pending_message.take() {
                Some(mut pending) => {
                    tokio::select! {
                        biased;
                        outcome = &mut pending => {
                            self.settle_pending_message(outcome)?;
                            continue;
                        }
                        waited = tokio::time::timeout_at(deadline, events.next()) => {
                            self.pending_message = Some(pending);
                            waited
                        }
                    }
                }
                None => tokio::time::timeout_at(deadline, events.next()).await,
            };

            let Ok(Some(event)) = waited else {
                return Ok(None);
            };

            if self.react_check(&event) {
                return Ok(Some(event));
            }
        }
    }

    /// Stop paginating and swap navigation reactions for the timeout icons.
    /// Reaction failures are logged and skipped.
    async fn expire(&mut self) -> Result<(), serenity::Error> {
        self.paginating = false;
        self.await_pending_message().await?;

        let Some(message) = self.message else {
            return Ok(());
        };

        info!(message_id = %message.message_id, "help pagination timed out");

        for entry in &self.entries {
            if let Err(source) = self
                .session
                .remove_reaction(&message, entry.icon().clone(), None)
                .await
            {
                debug!(?source, emoji = %entry.icon(), "failed to clear help page reaction");
            }
        }

        for icon in &self.options.timeout_icons {
            if let Err(source) = self.session.add_reaction(&message, icon.clone()).await {
                debug!(?source, emoji = %icon, "failed to add timeout reaction");
            }
        }

        Ok(())
    }
}

async fn send_first_page<S: ChatSession>(
    session: Arc<S>,
    overview: RenderedEmbed,
    icons: Vec<serenity::ReactionType>,
    direct_message: bool,
    sent: oneshot::Sender<Result<MessageRef, serenity::Error>>,
) {
    let message = match session.send(overview, direct_message).await {
        Ok(message) => message,
        Err(source) => {
            let _ = sent.send(Err(source));
            return;
        }
    };

    let _ = sent.send(Ok(message));

    for icon in icons {
        if let Err(source) = session.add_reaction(&message, icon.clone()).await {
            debug!(?source, message_id = %message.message_id, emoji = %icon, "failed to add help navigation reaction");
        }
    }
}

fn render_category(category: &HelpCategory, commands: &[CommandInfo], prefix: &str) -> RenderedEmbed {
    let rendered = RenderedEmbed::new(
        format!("{} Commands", category.name),
        category.description.clone(),
    )
    .field(BLANK_FIELD_NAME, SUPPORT_SERVER_TEXT, false)
    .footer(format!(
        "Use \"{prefix}help command\" for more info on a command."
    ));

    commands.iter().fold(rendered, |rendered, command| {
        rendered.field(command.usage_line(), command.short_doc_or_fallback(), false)
    })
}

fn same_emoji(left: &serenity::ReactionType, right: &serenity::ReactionType) -> bool {
    match (left, right) {
        (
            serenity::ReactionType::Custom { id: left, .. },
            serenity::ReactionType::Custom { id: right, .. },
        ) => left == right,
        (serenity::ReactionType::Unicode(left), serenity::ReactionType::Unicode(right)) => {
            left == right
        }
        _ => false,
    }
}
