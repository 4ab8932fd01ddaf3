/// Tab and window lifecycle events the badge subscribes to, and the
/// subscribe/unsubscribe state machine that guards them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    TabActivated,
    TabAttached,
    TabCreated,
    TabDetached,
    TabMoved,
    TabReplaced,
    TabRemoved,
    TabUpdated,
    WindowFocusChanged,
}

impl LifecycleEvent {
    pub const ALL: [LifecycleEvent; 9] = [
        LifecycleEvent::TabActivated,
        LifecycleEvent::TabAttached,
        LifecycleEvent::TabCreated,
        LifecycleEvent::TabDetached,
        LifecycleEvent::TabMoved,
        LifecycleEvent::TabReplaced,
        LifecycleEvent::TabRemoved,
        LifecycleEvent::TabUpdated,
        LifecycleEvent::WindowFocusChanged,
    ];

    /// API namespace under `browser`
    pub fn namespace(self) -> &'static str {
        match self {
            LifecycleEvent::WindowFocusChanged => "windows",
            _ => "tabs",
        }
    }

    pub fn event_name(self) -> &'static str {
        match self {
            LifecycleEvent::TabActivated => "onActivated",
            LifecycleEvent::TabAttached => "onAttached",
            LifecycleEvent::TabCreated => "onCreated",
            LifecycleEvent::TabDetached => "onDetached",
            LifecycleEvent::TabMoved => "onMoved",
            LifecycleEvent::TabReplaced => "onReplaced",
            LifecycleEvent::TabRemoved => "onRemoved",
            LifecycleEvent::TabUpdated => "onUpdated",
            LifecycleEvent::WindowFocusChanged => "onFocusChanged",
        }
    }

    pub fn handler(self) -> HandlerKind {
        match self {
            LifecycleEvent::TabActivated => HandlerKind::Activated,
            _ => HandlerKind::Update,
        }
    }
}

/// Which handler an event is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// General path: settle delay, then the trailing debouncer
    Update,
    /// Tab switch: general path plus the leading-edge debouncer
    Activated,
}

impl HandlerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HandlerKind::Update => "update",
            HandlerKind::Activated => "activated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubscriptionState {
    #[default]
    Unsubscribed,
    Subscribed,
}

/// Ticket for a delayed subscribe. Any `exit` issued after the ticket was
/// handed out invalidates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallToken(u64);

/// Whether the lifecycle listeners are attached.
///
/// `enter` and `exit` are idempotent and tell the caller whether listeners
/// actually have to be added or removed.
#[derive(Debug, Default)]
pub struct ListenerSet {
    state: SubscriptionState,
    generation: u64,
}

impl ListenerSet {
    pub fn new() -> ListenerSet {
        ListenerSet::default()
    }

    pub fn state(&self) -> SubscriptionState {
        self.state
    }

    pub fn schedule_enter(&self) -> InstallToken {
        InstallToken(self.generation)
    }

    pub fn enter(&mut self, token: InstallToken) -> bool {
        if token.0 != self.generation || self.state == SubscriptionState::Subscribed {
            return false;
        }
        self.state = SubscriptionState::Subscribed;
        true
    }

    pub fn exit(&mut self) -> bool {
        self.generation += 1;
        match self.state {
            SubscriptionState::Subscribed => {
                self.state = SubscriptionState::Unsubscribed;
                true
            }
            SubscriptionState::Unsubscribed => false,
        }
    }
}
