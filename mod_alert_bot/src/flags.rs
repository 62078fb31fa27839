use std::{collections::HashMap, sync::Mutex};

use serenity::all::MessageId;

/// Which flagged message got which alert. Lives only as long as the process does; after a
/// restart, old alerts can no longer be resolved through the bot.
///
/// The lock is only held for single operations. Checking [`Self::is_flagged`] and later calling
/// [`Self::insert`] is not atomic, so two flags on the same message racing each other can both
/// post an alert.
#[derive(Debug, Default)]
pub struct FlagRegistry {
    /// Original message ID to alert message ID.
    entries: Mutex<HashMap<MessageId, MessageId>>,
}

impl FlagRegistry {
    #[must_use]
    pub fn new() -> FlagRegistry {
        FlagRegistry::default()
    }

    #[must_use]
    pub fn is_flagged(&self, original: MessageId) -> bool {
        self.lock().contains_key(&original)
    }

    pub fn insert(&self, original: MessageId, alert: MessageId) {
        self.lock().insert(original, alert);
    }

    /// Find the original message that this alert was made for.
    #[must_use]
    pub fn find_by_alert(&self, alert: MessageId) -> Option<MessageId> {
        self.lock()
            .iter()
            .find(|(_, x)| **x == alert)
            .map(|(&original, _)| original)
    }

    /// Returns the alert ID the entry had, if there was one.
    pub fn remove(&self, original: MessageId) -> Option<MessageId> {
        self.lock().remove(&original)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<MessageId, MessageId>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_alert() {
        let flags = FlagRegistry::new();
        let original = MessageId::new(10);
        let alert = MessageId::new(20);

        assert!(flags.is_empty());
        flags.insert(original, alert);
        assert!(flags.is_flagged(original));
        assert!(!flags.is_flagged(alert));

        assert_eq!(flags.find_by_alert(alert), Some(original));
        assert_eq!(flags.find_by_alert(original), None);

        assert_eq!(flags.remove(original), Some(alert));
        assert_eq!(flags.remove(original), None);
        assert!(flags.is_empty());
    }
}
