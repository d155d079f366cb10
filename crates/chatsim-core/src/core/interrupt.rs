//! Ctrl+C handling shared by both presenters.
//!
//! The signal handler never prints or exits on the first press. It records
//! the request and wakes async waiters; the plain presenter turns that into
//! an [`InterruptedError`] and the terminal player into a quit. A second
//! press exits with status 130 after running the restore hook.

use std::fmt;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Exit status used for an interrupted run (128 + SIGINT).
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

struct InterruptState {
    requested: AtomicBool,
    wakeup: Notify,
}

static STATE: OnceLock<InterruptState> = OnceLock::new();
static RESTORE_HOOK: OnceLock<Box<dyn Fn() + Send + Sync>> = OnceLock::new();

fn state() -> &'static InterruptState {
    STATE.get_or_init(|| InterruptState {
        requested: AtomicBool::new(false),
        wakeup: Notify::new(),
    })
}

/// Returned when playback stops because the user pressed Ctrl+C.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptedError;

impl fmt::Display for InterruptedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Playback interrupted")
    }
}

impl std::error::Error for InterruptedError {}

/// Installs the process-wide Ctrl+C handler.
///
/// # Panics
/// Panics if a handler was already installed by someone else.
pub fn init() {
    ctrlc::set_handler(trigger_ctrl_c).expect("Error setting Ctrl+C handler");
}

/// Records a Ctrl+C press. The second press restores the terminal and exits.
pub fn trigger_ctrl_c() {
    let state = state();
    if state.requested.swap(true, Ordering::SeqCst) {
        if let Some(hook) = RESTORE_HOOK.get() {
            hook();
        }
        std::process::exit(INTERRUPTED_EXIT_CODE);
    }
    state.wakeup.notify_waiters();
}

pub fn is_interrupted() -> bool {
    state().requested.load(Ordering::SeqCst)
}

/// Resolves once Ctrl+C has been pressed.
pub async fn wait_for_interrupt() {
    let state = state();
    loop {
        let notified = state.wakeup.notified();
        if is_interrupted() {
            return;
        }
        notified.await;
    }
}

/// Clears a pending request, e.g. before the terminal player takes over.
pub fn reset() {
    state().requested.store(false, Ordering::SeqCst);
}

/// Registers the hook run right before the forced exit. Only the first
/// registration sticks.
pub fn set_restore_hook<F>(hook: F)
where
    F: Fn() + Send + Sync + 'static,
{
    let _ = RESTORE_HOOK.set(Box::new(hook));
}
