//! Where player-facing messages go.

use std::cell::RefCell;

/// A message sink provided by the host.
pub trait Broadcast {
    /// Announce to every player, on screen.
    fn broadcast_all(&self, text: &str);

    /// Post to the shared chat.
    fn chat_all(&self, text: &str);

    /// Send to one player.
    fn to_player(&self, slot: u32, text: &str);
}

/// One recorded message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Sent with [`Broadcast::broadcast_all`].
    All(String),
    /// Sent with [`Broadcast::chat_all`].
    Chat(String),
    /// Sent with [`Broadcast::to_player`].
    Player {
        /// Recipient.
        slot: u32,
        /// Body.
        text: String,
    },
}

impl Message {
    /// The message body.
    pub fn text(&self) -> &str {
        match self {
            Self::All(text) | Self::Chat(text) => text,
            Self::Player { text, .. } => text,
        }
    }
}

/// A sink that keeps every message in order.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: RefCell<Vec<Message>>,
}

impl MessageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every message so far.
    pub fn messages(&self) -> Vec<Message> {
        self.messages.borrow().clone()
    }

    /// Bodies of every message so far.
    pub fn texts(&self) -> Vec<String> {
        self.messages.borrow().iter().map(|m| m.text().to_string()).collect()
    }

    fn push(&self, message: Message) {
        tracing::debug!(?message, "broadcast");
        self.messages.borrow_mut().push(message);
    }
}

impl Broadcast for MessageLog {
    fn broadcast_all(&self, text: &str) {
        self.push(Message::All(text.to_string()));
    }

    fn chat_all(&self, text: &str) {
        self.push(Message::Chat(text.to_string()));
    }

    fn to_player(&self, slot: u32, text: &str) {
        self.push(Message::Player {
            slot,
            text: text.to_string(),
        });
    }
}
