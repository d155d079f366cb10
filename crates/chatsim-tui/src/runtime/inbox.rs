use chatsim_core::core::sequencer::SequenceHandler;
use chatsim_core::host::{ContentId, HostContext};
use tokio::sync::mpsc;

use crate::events::UiEvent;

/// Sender for the runtime's event inbox.
pub type UiEventSender = mpsc::UnboundedSender<UiEvent>;

/// Receiver for the runtime's event inbox.
pub type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;

/// Host services that post into the inbox instead of touching the UI.
pub fn inbox_host(content_id: ContentId, tx: &UiEventSender) -> HostContext {
    let resize_tx = tx.clone();
    let read_tx = tx.clone();
    HostContext::new(
        content_id,
        move || {
            let _ = resize_tx.send(UiEvent::HostResized);
        },
        move |text| {
            let _ = read_tx.send(UiEvent::Announced(text.to_string()));
        },
    )
}

/// Sequencer notifications forwarded to the inbox.
#[derive(Debug, Clone)]
pub struct InboxHandler {
    tx: UiEventSender,
}

impl InboxHandler {
    pub fn new(tx: UiEventSender) -> Self {
        Self { tx }
    }
}

impl SequenceHandler for InboxHandler {
    fn on_showing_process_done(&mut self, index: usize) {
        let _ = self.tx.send(UiEvent::MessageRevealed(index));
    }

    fn on_ended(&mut self) {
        let _ = self.tx.send(UiEvent::PlaybackEnded);
    }

    fn scroll_to_bottom(&mut self) {
        let _ = self.tx.send(UiEvent::ScrollToBottom);
    }
}
