use std::fmt;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::identity::{Role, SessionId, UserId};
use crate::tenant::{Tenant, TenantId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

static LISTENER_ID: AtomicU64 = AtomicU64::new(1);

fn next_listener_id() -> ListenerId {
    ListenerId(LISTENER_ID.fetch_add(1, Ordering::Relaxed))
}

/// Session state transitions that listeners can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SessionEventKind {
    LoggedIn,
    LoggedOut,
    TenantSwitched,
    TenantAdded,
}

impl SessionEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionEventKind::LoggedIn => "logged-in",
            SessionEventKind::LoggedOut => "logged-out",
            SessionEventKind::TenantSwitched => "tenant-switched",
            SessionEventKind::TenantAdded => "tenant-added",
        }
    }
}

/// Data delivered to listeners, published after the state change.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "kebab-case"))]
pub enum SessionEvent {
    LoggedIn {
        session_id: SessionId,
        user_id: UserId,
        role: Role,
        tenant_id: Option<TenantId>,
    },
    LoggedOut {
        session_id: SessionId,
        user_id: UserId,
    },
    TenantSwitched {
        session_id: SessionId,
        from: Option<TenantId>,
        to: TenantId,
    },
    TenantAdded {
        session_id: SessionId,
        tenant: Tenant,
    },
}

impl SessionEvent {
    pub fn kind(&self) -> SessionEventKind {
        match self {
            SessionEvent::LoggedIn { .. } => SessionEventKind::LoggedIn,
            SessionEvent::LoggedOut { .. } => SessionEventKind::LoggedOut,
            SessionEvent::TenantSwitched { .. } => SessionEventKind::TenantSwitched,
            SessionEvent::TenantAdded { .. } => SessionEventKind::TenantAdded,
        }
    }

    pub fn session_id(&self) -> SessionId {
        match self {
            SessionEvent::LoggedIn { session_id, .. }
            | SessionEvent::LoggedOut { session_id, .. }
            | SessionEvent::TenantSwitched { session_id, .. }
            | SessionEvent::TenantAdded { session_id, .. } => *session_id,
        }
    }
}

/// Listener signature. Runs synchronously inside `emit`.
pub type EventListener = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventPat {
    Any,
    Exact(SessionEventKind),
}

impl EventPat {
    pub fn matches(&self, kind: SessionEventKind) -> bool {
        match self {
            EventPat::Any => true,
            EventPat::Exact(k) => *k == kind,
        }
    }
}

#[derive(Clone)]
struct ListenerEntry {
    id: ListenerId,
    pattern: EventPat,
    listener: EventListener,
    once: bool,
}

/// Synchronous event hub owned by the session store.
#[derive(Default)]
pub struct SessionEventHub {
    listeners: Vec<ListenerEntry>,
}

impl fmt::Debug for SessionEventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEventHub")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SessionEventHub {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn on(&mut self, pattern: EventPat, listener: EventListener) -> ListenerId {
        self.push(pattern, listener, false)
    }

    /// Listener removed after its first delivery.
    pub fn once(&mut self, pattern: EventPat, listener: EventListener) -> ListenerId {
        self.push(pattern, listener, true)
    }

    fn push(&mut self, pattern: EventPat, listener: EventListener, once: bool) -> ListenerId {
        let id = next_listener_id();
        self.listeners.push(ListenerEntry {
            id,
            pattern,
            listener,
            once,
        });
        id
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|e| e.id != id);
        before != self.listeners.len()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver `event` to every matching listener in registration order.
    /// Returns the number of listeners called.
    pub fn emit(&mut self, event: &SessionEvent) -> usize {
        let kind = event.kind();
        let mut once_ids = Vec::new();
        let mut delivered = 0;

        for entry in &self.listeners {
            if entry.pattern.matches(kind) {
                (entry.listener)(event);
                delivered += 1;
                if entry.once {
                    once_ids.push(entry.id);
                }
            }
        }

        if !once_ids.is_empty() {
            self.listeners.retain(|e| !once_ids.contains(&e.id));
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn logout_event() -> SessionEvent {
        SessionEvent::LoggedOut {
            session_id: SessionId::new(),
            user_id: UserId("3".into()),
        }
    }

    fn recorder() -> (Arc<Mutex<Vec<SessionEventKind>>>, EventListener) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let listener: EventListener = Arc::new(move |e: &SessionEvent| {
            sink.lock().unwrap().push(e.kind());
        });
        (seen, listener)
    }

    #[test]
    fn exact_and_any_listeners() {
        let mut hub = SessionEventHub::new();
        let (exact, l1) = recorder();
        let (any, l2) = recorder();
        hub.on(EventPat::Exact(SessionEventKind::LoggedIn), l1);
        hub.on(EventPat::Any, l2);

        assert_eq!(hub.emit(&logout_event()), 1);
        assert!(exact.lock().unwrap().is_empty());
        assert_eq!(*any.lock().unwrap(), vec![SessionEventKind::LoggedOut]);
    }

    #[test]
    fn once_listener_fires_once() {
        let mut hub = SessionEventHub::new();
        let (seen, listener) = recorder();
        hub.once(EventPat::Any, listener);

        hub.emit(&logout_event());
        hub.emit(&logout_event());

        assert_eq!(seen.lock().unwrap().len(), 1);
        assert!(hub.is_empty());
    }

    #[test]
    fn off_removes_one_listener() {
        let mut hub = SessionEventHub::new();
        let (removed, l1) = recorder();
        let (kept, l2) = recorder();
        let id = hub.on(EventPat::Any, l1);
        hub.on(EventPat::Exact(SessionEventKind::LoggedOut), l2);

        assert!(hub.off(id));
        assert!(!hub.off(id));
        assert_eq!(hub.len(), 1);
        assert_eq!(hub.emit(&logout_event()), 1);
        assert!(removed.lock().unwrap().is_empty());
        assert_eq!(kept.lock().unwrap().len(), 1);
    }
}
