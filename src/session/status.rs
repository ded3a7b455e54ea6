//! Transient status line with self-expiring messages.
//!
//! Each [`StatusMessenger::show`] replaces the previous message together
//! with its expiry timer. The timer is owned by the message, so dropping
//! the message (supersession, [`StatusMessenger::clear`], or dropping the
//! messenger itself) aborts the pending task. Expiry is additionally tied
//! to an [`ExpiryToken`], so a late notification for an older message can
//! never clear a newer one.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Callback invoked when a message's deadline elapses.
pub type ExpiryHook = Arc<dyn Fn(ExpiryToken) + Send + Sync>;

/// Identifies one `show` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpiryToken(u64);

struct ScopedTimer(JoinHandle<()>);

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        self.0.abort();
    }
}

struct ActiveMessage {
    text: String,
    token: ExpiryToken,
    deadline: Instant,
    _timer: Option<ScopedTimer>,
}

#[derive(Default)]
pub struct StatusMessenger {
    active: Option<ActiveMessage>,
    generation: u64,
    hook: Option<ExpiryHook>,
}

impl StatusMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messenger that also calls `hook` when a message expires.
    ///
    /// The hook only fires when `show` is called from within a tokio
    /// runtime; without one, expiry is still observed through
    /// [`current`](Self::current) and [`expire_due`](Self::expire_due).
    pub fn with_expiry_hook(hook: ExpiryHook) -> Self {
        Self {
            hook: Some(hook),
            ..Self::default()
        }
    }

    /// Replace the current message and restart the expiry timer.
    pub fn show(&mut self, text: impl Into<String>, ttl: Duration) -> ExpiryToken {
        self.generation += 1;
        let token = ExpiryToken(self.generation);
        let deadline = Instant::now() + ttl;

        // Drop the old message first so its timer is aborted before the new one starts.
        self.active = None;

        let timer = self
            .hook
            .as_ref()
            .and_then(|hook| spawn_timer(Arc::clone(hook), token, deadline));
        let text = text.into();
        tracing::debug!(message = %text, ttl_ms = ttl.as_millis() as u64, "Status message shown");

        self.active = Some(ActiveMessage {
            text,
            token,
            deadline,
            _timer: timer,
        });
        token
    }

    /// The active message, or `None` once its deadline has passed.
    pub fn current(&self) -> Option<&str> {
        self.active
            .as_ref()
            .filter(|msg| Instant::now() < msg.deadline)
            .map(|msg| msg.text.as_str())
    }

    /// Clear the message if `token` still identifies it.
    ///
    /// Returns `false` for tokens of superseded messages.
    pub fn expire(&mut self, token: ExpiryToken) -> bool {
        match &self.active {
            Some(msg) if msg.token == token => {
                self.active = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the message if its deadline has passed. Returns `true` if one was dropped.
    pub fn expire_due(&mut self) -> bool {
        match &self.active {
            Some(msg) if Instant::now() >= msg.deadline => {
                self.active = None;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

fn spawn_timer(hook: ExpiryHook, token: ExpiryToken, deadline: Instant) -> Option<ScopedTimer> {
    let handle = tokio::runtime::Handle::try_current().ok()?;
    let task = handle.spawn(async move {
        tokio::time::sleep_until(deadline).await;
        hook(token);
    });
    Some(ScopedTimer(task))
}
