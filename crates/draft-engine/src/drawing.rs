//! The kernel facade.
//!
//! `Drawing` owns both state records and the listener registry. Events enter
//! through `send_event`, which runs translate -> execute tool actions ->
//! execute data actions (solver inline) -> notify, synchronously and to
//! completion. Listeners receive shared borrows of both states, so they
//! cannot mutate the kernel or re-enter `send_event` from inside the
//! callback; the borrow checker enforces what the design only recommends.

use tracing::debug;

use crate::event::Event;
use crate::execute::{execute_data_action, execute_tool_action};
use crate::tool::ToolState;
use crate::translate::generate_actions;
use crate::DataState;

/// Handle returned by `subscribe`, used to remove the listener again.
pub type ListenerToken = usize;

type Listener = Box<dyn FnMut(&ToolState, &DataState)>;

pub struct Drawing {
    tool_state: ToolState,
    data_state: DataState,
    /// Insertion-indexed; removal leaves a tombstone so other listeners are
    /// neither skipped nor delivered twice.
    listeners: Vec<Option<Listener>>,
}

impl Drawing {
    pub fn new() -> Self {
        Self {
            tool_state: ToolState::new(),
            data_state: DataState::new(),
            listeners: Vec::new(),
        }
    }

    /// Rebuild a drawing around replayed state, e.g. after loading a file.
    /// The tool state starts fresh apart from the restored history.
    pub fn restore(data_state: DataState, history: crate::history::ActionHistory) -> Self {
        let mut tool_state = ToolState::new();
        tool_state.history = history;
        Self {
            tool_state,
            data_state,
            listeners: Vec::new(),
        }
    }

    /// The single ingress point. Returns whether anything mutated; listeners
    /// are only notified when something did.
    pub fn send_event(&mut self, event: Event) -> bool {
        let (tool_actions, data_actions) =
            generate_actions(&self.tool_state, &self.data_state, &event);
        debug!(
            ?event,
            tool_actions = tool_actions.len(),
            data_actions = data_actions.len(),
            "dispatching event"
        );

        let mut changed = false;
        for action in &tool_actions {
            changed |= execute_tool_action(&mut self.tool_state, action);
        }
        for action in &data_actions {
            changed |= execute_data_action(&mut self.data_state, action);
        }

        if changed {
            for slot in self.listeners.iter_mut() {
                if let Some(listener) = slot {
                    listener(&self.tool_state, &self.data_state);
                }
            }
        }
        changed
    }

    pub fn tool_state(&self) -> &ToolState {
        &self.tool_state
    }

    pub fn data_state(&self) -> &DataState {
        &self.data_state
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ToolState, &DataState) + 'static) -> ListenerToken {
        self.listeners.push(Some(Box::new(listener)));
        self.listeners.len() - 1
    }

    /// Remove a listener. Returns false for unknown or already-removed
    /// tokens.
    pub fn unsubscribe(&mut self, token: ListenerToken) -> bool {
        match self.listeners.get_mut(token) {
            Some(slot @ Some(_)) => {
                *slot = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Drawing {
    fn default() -> Self {
        Self::new()
    }
}
