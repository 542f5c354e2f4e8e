//! Channel subscription set.
//!
//! Tracks which backend channels the client wants. The full set is sent in
//! the `subscribe` request on every successful open, so subscriptions
//! survive reconnects without consumer involvement.

/// Ordered, duplicate-free set of channel names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelSet {
    channels: Vec<String>,
}

impl ChannelSet {
    /// Creates a set from an initial list, dropping duplicates and blanks.
    #[must_use]
    pub fn new<I, S>(initial: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        set.subscribe(initial);
        set
    }

    /// Adds channels. Returns the ones that were not already present.
    pub fn subscribe<I, S>(&mut self, channels: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = Vec::new();
        for channel in channels {
            let channel = channel.into();
            if channel.trim().is_empty() || self.contains(&channel) {
                continue;
            }
            self.channels.push(channel.clone());
            added.push(channel);
        }
        added
    }

    /// Removes channels. Returns the ones that were present.
    pub fn unsubscribe<I, S>(&mut self, channels: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut removed = Vec::new();
        for channel in channels {
            let channel = channel.as_ref();
            if let Some(pos) = self.channels.iter().position(|c| c == channel) {
                removed.push(self.channels.remove(pos));
            }
        }
        removed
    }

    /// Returns `true` if `channel` is in the set.
    #[must_use]
    pub fn contains(&self, channel: &str) -> bool {
        self.channels.iter().any(|c| c == channel)
    }

    /// Channels in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.channels
    }

    /// Number of channels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Returns `true` if no channel is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
