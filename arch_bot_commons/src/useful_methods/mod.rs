use std::future::Future;

use serenity::{
    all::{ChannelId, ChannelType, GuildChannel, GuildId, ReactionType},
    http::Http,
};

pub trait ReactionStuff {
    /// Returns `true` if this is a plain unicode emoji exactly equal to `emoji`.
    /// No normalization is done, so a variation selector makes it a different emoji.
    fn is_unicode(&self, emoji: &str) -> bool;
}

impl ReactionStuff for ReactionType {
    fn is_unicode(&self, emoji: &str) -> bool {
        matches!(self, ReactionType::Unicode(x) if x == emoji)
    }
}

/// Sort text and announcement channels by their position in the channel list, using the ID
/// as a tiebreaker, and return their IDs. Other channels are dropped.
pub fn order_text_channels<'a>(
    channels: impl IntoIterator<Item = &'a GuildChannel>,
) -> Vec<ChannelId> {
    let mut text_channels = channels
        .into_iter()
        .filter(|x| matches!(x.kind, ChannelType::Text | ChannelType::News))
        .map(|x| (x.position, x.id))
        .collect::<Vec<_>>();

    text_channels.sort_unstable();
    text_channels.into_iter().map(|(_, id)| id).collect()
}

pub trait GuildStuff {
    /// Fetch all text channels of this guild, in the order given by [`order_text_channels`].
    fn text_channels_in_order(
        self,
        http: &Http,
    ) -> impl Future<Output = Result<Vec<ChannelId>, serenity::Error>> + Send;
}

impl GuildStuff for GuildId {
    async fn text_channels_in_order(self, http: &Http) -> Result<Vec<ChannelId>, serenity::Error> {
        let channels = self.channels(http).await?;
        Ok(order_text_channels(channels.values()))
    }
}
