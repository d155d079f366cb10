//! Host context shared by all reveal units.
//!
//! The host supplies the container-level services the playback state machine
//! needs: a resize notification, an accessibility "read this aloud" channel,
//! and the identifier of the content being presented.

use std::fmt;
use std::sync::Arc;

/// Identifier of the presented content (used to resolve relative assets).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ContentId(pub String);

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

type ResizeFn = Arc<dyn Fn() + Send + Sync>;
type ReadFn = Arc<dyn Fn(&str) + Send + Sync>;

/// Typed host services handed to the sequencer at construction.
#[derive(Clone)]
pub struct HostContext {
    content_id: ContentId,
    resize: ResizeFn,
    read: ReadFn,
}

impl HostContext {
    pub fn new<R, A>(content_id: ContentId, resize: R, read: A) -> Self
    where
        R: Fn() + Send + Sync + 'static,
        A: Fn(&str) + Send + Sync + 'static,
    {
        Self {
            content_id,
            resize: Arc::new(resize),
            read: Arc::new(read),
        }
    }

    /// A host that ignores resize and announcement requests.
    pub fn detached(content_id: ContentId) -> Self {
        Self::new(content_id, || {}, |_| {})
    }

    pub fn content_id(&self) -> &ContentId {
        &self.content_id
    }

    /// Asks the host to re-layout the container.
    pub fn resize(&self) {
        (self.resize)();
    }

    /// Sends text to the accessibility announcer.
    pub fn read(&self, text: &str) {
        (self.read)(text);
    }
}

impl fmt::Debug for HostContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostContext")
            .field("content_id", &self.content_id)
            .finish_non_exhaustive()
    }
}
