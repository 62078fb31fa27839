//! An in-memory [`ChatPlatform`] that remembers everything done to it.

use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, MutexGuard},
};

use serenity::all::{ChannelId, GuildId, MessageId, RoleId};

use crate::{
    alert::AlertNotification,
    platform::{ChatPlatform, FetchedMessage},
};

#[derive(Debug, Default)]
pub struct FakeState {
    /// Messages that exist right now.
    pub messages: HashMap<(ChannelId, MessageId), FetchedMessage>,
    /// Text channels of the guild, in order.
    pub channels: Vec<ChannelId>,
    pub roles: HashSet<RoleId>,
    pub fail_sends: bool,
    pub fail_reactions: bool,
    pub next_id: u64,

    pub sent: Vec<(ChannelId, MessageId, AlertNotification)>,
    pub reactions_added: Vec<(ChannelId, MessageId, String)>,
    pub clear_attempts: Vec<(ChannelId, MessageId, String)>,
    pub cleared: Vec<(ChannelId, MessageId, String)>,
    pub delete_attempts: Vec<(ChannelId, MessageId)>,
}

#[derive(Debug, Default)]
pub struct FakePlatform {
    state: Mutex<FakeState>,
}

impl FakePlatform {
    pub fn new(channels: Vec<ChannelId>, roles: Vec<RoleId>) -> FakePlatform {
        FakePlatform {
            state: Mutex::new(FakeState {
                channels,
                roles: roles.into_iter().collect(),
                next_id: 9000,
                ..FakeState::default()
            }),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn add_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        content: &str,
        attachments: &[&str],
    ) {
        self.state().messages.insert(
            (channel_id, message_id),
            FetchedMessage {
                content: content.to_string(),
                attachment_filenames: attachments.iter().map(|x| x.to_string()).collect(),
            },
        );
    }

    pub fn remove_message(&self, channel_id: ChannelId, message_id: MessageId) {
        self.state().messages.remove(&(channel_id, message_id));
    }
}

impl ChatPlatform for FakePlatform {
    type Error = String;

    async fn fetch_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<FetchedMessage, String> {
        self.state()
            .messages
            .get(&(channel_id, message_id))
            .cloned()
            .ok_or_else(|| "Unknown Message".to_string())
    }

    async fn send_alert(
        &self,
        channel_id: ChannelId,
        alert: &AlertNotification,
    ) -> Result<MessageId, String> {
        let mut state = self.state();
        if state.fail_sends {
            return Err("Missing Permissions".to_string());
        }

        state.next_id += 1;
        let message_id = MessageId::new(state.next_id);
        state.messages.insert(
            (channel_id, message_id),
            FetchedMessage {
                content: alert.content(),
                attachment_filenames: Vec::new(),
            },
        );
        state.sent.push((channel_id, message_id, alert.clone()));
        Ok(message_id)
    }

    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &str,
    ) -> Result<(), String> {
        let mut state = self.state();
        if state.fail_reactions {
            return Err("Missing Permissions".to_string());
        }
        if !state.messages.contains_key(&(channel_id, message_id)) {
            return Err("Unknown Message".to_string());
        }
        state
            .reactions_added
            .push((channel_id, message_id, emoji.to_string()));
        Ok(())
    }

    async fn clear_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &str,
    ) -> Result<(), String> {
        let mut state = self.state();
        let call = (channel_id, message_id, emoji.to_string());
        state.clear_attempts.push(call.clone());
        if !state.messages.contains_key(&(channel_id, message_id)) {
            return Err("Unknown Message".to_string());
        }
        state.cleared.push(call);
        Ok(())
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), String> {
        let mut state = self.state();
        state.delete_attempts.push((channel_id, message_id));
        state
            .messages
            .remove(&(channel_id, message_id))
            .map(|_| ())
            .ok_or_else(|| "Unknown Message".to_string())
    }

    async fn text_channels(&self, _guild_id: GuildId) -> Result<Vec<ChannelId>, String> {
        Ok(self.state().channels.clone())
    }

    async fn channel_exists(&self, _guild_id: GuildId, channel_id: ChannelId) -> bool {
        self.state().channels.contains(&channel_id)
    }

    async fn role_exists(&self, _guild_id: GuildId, role_id: RoleId) -> bool {
        self.state().roles.contains(&role_id)
    }
}
