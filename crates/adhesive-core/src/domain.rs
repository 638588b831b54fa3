use std::fmt;

/// Chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a sent message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// A Telegram sticker set, addressed by its short name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TelegramPack {
    pub short_name: String,
}

/// A Signal sticker pack. `pack_key` is the hex decryption key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalPack {
    pub pack_id: String,
    pub pack_key: String,
}

/// Identifies a sticker pack in its source ecosystem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PackReference {
    Telegram(TelegramPack),
    Signal(SignalPack),
}

impl fmt::Display for PackReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackReference::Telegram(p) => write!(f, "telegram:{}", p.short_name),
            // The key is a secret; only the id goes into logs.
            PackReference::Signal(p) => write!(f, "signal:{}", p.pack_id),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Telegram source, Signal target.
    ToSignal,
    /// Signal source, Telegram target.
    ToTelegram,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::ToSignal => "to_signal",
            Direction::ToTelegram => "to_telegram",
        }
    }
}

/// One conversion, built once per inbound message and never mutated.
///
/// The direction is derived from the pack shape, so the two can never disagree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionRequest {
    pack: PackReference,
}

impl ConversionRequest {
    pub fn to_signal(short_name: impl Into<String>) -> Self {
        Self {
            pack: PackReference::Telegram(TelegramPack {
                short_name: short_name.into(),
            }),
        }
    }

    pub fn to_telegram(pack_id: impl Into<String>, pack_key: impl Into<String>) -> Self {
        Self {
            pack: PackReference::Signal(SignalPack {
                pack_id: pack_id.into(),
                pack_key: pack_key.into(),
            }),
        }
    }

    pub fn pack(&self) -> &PackReference {
        &self.pack
    }

    pub fn direction(&self) -> Direction {
        match self.pack {
            PackReference::Telegram(_) => Direction::ToSignal,
            PackReference::Signal(_) => Direction::ToTelegram,
        }
    }
}
