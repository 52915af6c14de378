//! User-facing notices.

use tokio::sync::mpsc;

/// One of the four messages a shopper can see when a cart operation fails.
///
/// Notices never carry the underlying cause; that is logged instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartNotice {
    /// Requested or incremented amount exceeds stock.
    StockExceeded,
    /// Adding a product failed.
    AddFailed,
    /// Removing a product failed.
    RemoveFailed,
    /// Changing a product's amount failed.
    UpdateFailed,
}

impl CartNotice {
    /// Message to show the shopper.
    pub fn message(&self) -> &'static str {
        match self {
            Self::StockExceeded => "Requested quantity is out of stock",
            Self::AddFailed => "Could not add the product to the cart",
            Self::RemoveFailed => "Could not remove the product from the cart",
            Self::UpdateFailed => "Could not change the product quantity",
        }
    }
}

impl std::fmt::Display for CartNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Surfaces notices to the shopper. Fire-and-forget.
pub trait NotificationSink: Send + Sync {
    /// Show an error notice.
    fn error(&self, notice: CartNotice);
}

/// Logs notices through `tracing`. The store's default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn error(&self, notice: CartNotice) {
        tracing::warn!(?notice, "{}", notice.message());
    }
}

/// Forwards notices to a channel, for a UI loop that renders toasts.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<CartNotice>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiving end of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<CartNotice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelNotifier {
    fn error(&self, notice: CartNotice) {
        // A closed receiver means nobody is rendering notices any more.
        let _ = self.tx.send(notice);
    }
}
