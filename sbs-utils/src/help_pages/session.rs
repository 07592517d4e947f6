use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use poise::serenity_prelude as serenity;

use crate::embed::{RenderedEmbed, build_rendered_embed};

/// Location of a message posted by a [`ChatSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageRef {
    pub channel_id: serenity::ChannelId,
    pub message_id: serenity::MessageId,
}

/// A reaction-add notification, reduced to what pagination needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReactionEvent {
    pub user_id: serenity::UserId,
    pub message_id: serenity::MessageId,
    pub emoji: serenity::ReactionType,
}

impl ReactionEvent {
    /// Returns `None` for reactions without a known user (webhook or partial payloads).
    pub fn from_reaction(reaction: &serenity::Reaction) -> Option<Self> {
        Self::from_parts(reaction.user_id, reaction.message_id, reaction.emoji.clone())
    }

    fn from_parts(
        user_id: Option<serenity::UserId>,
        message_id: serenity::MessageId,
        emoji: serenity::ReactionType,
    ) -> Option<Self> {
        Some(Self {
            user_id: user_id?,
            message_id,
            emoji,
        })
    }
}

/// Chat platform operations used by the help paginator.
#[async_trait]
pub trait ChatSession: Send + Sync + 'static {
    /// Post a rendered page either in the invoking channel or as a direct message.
    async fn send(
        &self,
        embed: RenderedEmbed,
        direct_message: bool,
    ) -> Result<MessageRef, serenity::Error>;

    async fn edit(&self, message: &MessageRef, embed: RenderedEmbed)
    -> Result<(), serenity::Error>;

    async fn add_reaction(
        &self,
        message: &MessageRef,
        emoji: serenity::ReactionType,
    ) -> Result<(), serenity::Error>;

    /// Remove one reaction. `None` removes the bot's own reaction.
    async fn remove_reaction(
        &self,
        message: &MessageRef,
        emoji: serenity::ReactionType,
        user_id: Option<serenity::UserId>,
    ) -> Result<(), serenity::Error>;

    /// Stream of reaction-add events that may concern the paginated message.
    fn reaction_events(&self) -> BoxStream<'static, ReactionEvent>;
}

/// [`ChatSession`] backed by serenity's HTTP client and gateway collectors.
#[derive(Clone)]
pub struct SerenityChatSession {
    http: Arc<serenity::Http>,
    shard: serenity::ShardMessenger,
    channel_id: serenity::ChannelId,
    author_id: serenity::UserId,
}

impl SerenityChatSession {
    pub fn new(
        ctx: &serenity::Context,
        channel_id: serenity::ChannelId,
        author_id: serenity::UserId,
    ) -> Self {
        Self {
            http: ctx.http.clone(),
            shard: ctx.shard.clone(),
            channel_id,
            author_id,
        }
    }

    async fn target_channel(
        &self,
        direct_message: bool,
    ) -> Result<serenity::ChannelId, serenity::Error> {
        if !direct_message {
            return Ok(self.channel_id);
        }

        let channel = self.author_id.create_dm_channel(&*self.http).await?;
        Ok(channel.id)
    }
}

#[async_trait]
impl ChatSession for SerenityChatSession {
    async fn send(
        &self,
        embed: RenderedEmbed,
        direct_message: bool,
    ) -> Result<MessageRef, serenity::Error> {
        let channel_id = self.target_channel(direct_message).await?;
        let message = channel_id
            .send_message(
                &self.http,
                serenity::CreateMessage::new().embed(build_rendered_embed(&embed)),
            )
            .await?;

        Ok(MessageRef {
            channel_id: message.channel_id,
            message_id: message.id,
        })
    }

    async fn edit(
        &self,
        message: &MessageRef,
        embed: RenderedEmbed,
    ) -> Result<(), serenity::Error> {
        message
            .channel_id
            .edit_message(
                &self.http,
                message.message_id,
                serenity::EditMessage::new().embed(build_rendered_embed(&embed)),
            )
            .await?;
        Ok(())
    }

    async fn add_reaction(
        &self,
        message: &MessageRef,
        emoji: serenity::ReactionType,
    ) -> Result<(), serenity::Error> {
        message
            .channel_id
            .create_reaction(&self.http, message.message_id, emoji)
            .await
    }

    async fn remove_reaction(
        &self,
        message: &MessageRef,
        emoji: serenity::ReactionType,
        user_id: Option<serenity::UserId>,
    ) -> Result<(), serenity::Error> {
        message
            .channel_id
            .delete_reaction(&self.http, message.message_id, user_id, emoji)
            .await
    }

    fn reaction_events(&self) -> BoxStream<'static, ReactionEvent> {
        let author_id = self.author_id;

        serenity::collector::ReactionCollector::new(&self.shard)
            .filter(move |reaction: &serenity::Reaction| reaction.user_id == Some(author_id))
            .stream()
            .filter_map(|reaction| async move { ReactionEvent::from_reaction(&reaction) })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude as serenity;

    use super::ReactionEvent;

    fn emoji() -> serenity::ReactionType {
        serenity::ReactionType::Unicode("🎉".to_owned())
    }

    #[test]
    fn reactions_without_a_user_are_dropped() {
        let event = ReactionEvent::from_parts(None, serenity::MessageId::new(30), emoji());
        assert_eq!(event, None);
    }

    #[test]
    fn reactions_with_a_user_keep_every_part() {
        let event = ReactionEvent::from_parts(
            Some(serenity::UserId::new(10)),
            serenity::MessageId::new(30),
            emoji(),
        );

        assert_eq!(
            event,
            Some(ReactionEvent {
                user_id: serenity::UserId::new(10),
                message_id: serenity::MessageId::new(30),
                emoji: emoji(),
            })
        );
    }
}
