use crate::error::NodeError;

/// A publisher that subscribes to its inputs only while its outputs have subscribers.
pub trait LazyTransport {
    /// Start consuming the input streams.
    fn subscribe(&mut self) -> Result<(), NodeError>;

    /// Stop consuming the input streams.
    fn unsubscribe(&mut self) -> Result<(), NodeError>;
}

/// Counts downstream subscribers and reports activation changes.
///
/// ```
/// use objpose_node::lazy::LazyTransportState;
///
/// let mut state = LazyTransportState::default();
/// assert!(state.connect());
/// assert!(!state.connect());
/// assert!(!state.disconnect());
/// assert!(state.disconnect());
/// assert!(!state.is_active());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LazyTransportState {
    num_subscribers: usize,
}

impl LazyTransportState {
    /// Register a subscriber. Returns true if the transport became active.
    pub fn connect(&mut self) -> bool {
        self.num_subscribers += 1;
        self.num_subscribers == 1
    }

    /// Unregister a subscriber. Returns true if the transport became inactive.
    pub fn disconnect(&mut self) -> bool {
        match self.num_subscribers {
            0 => false,
            n => {
                self.num_subscribers = n - 1;
                self.num_subscribers == 0
            }
        }
    }

    /// Whether at least one subscriber is connected.
    pub fn is_active(&self) -> bool {
        self.num_subscribers > 0
    }

    /// Number of connected subscribers.
    pub fn num_subscribers(&self) -> usize {
        self.num_subscribers
    }
}
