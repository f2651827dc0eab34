//! The generic state machine driving every agent.
//!
//! States get four hooks; each receives a [`StateCtx`] carrying the
//! agent's body, its role data, and the shared village — there is no
//! global world, the context is always passed in explicitly.

use std::collections::HashMap;

use hamlet_logic::config::SimConfig;

use crate::agent::{Agent, RoleData};
use crate::world::Village;

/// Everything a state hook may touch.
pub struct StateCtx<'a> {
    pub id: hecs::Entity,
    pub agent: &'a mut Agent,
    pub role: &'a mut RoleData,
    pub village: &'a mut Village,
    pub config: &'a SimConfig,
}

pub trait State: Send + Sync {
    /// Runs once when the machine transitions into this state.
    fn entry_actions(&mut self, _ctx: &mut StateCtx) {}
    /// Runs every tick while this state is active.
    fn do_actions(&mut self, _ctx: &mut StateCtx) {}
    /// Runs every tick after `do_actions`; returning a state name
    /// requests a transition.
    fn check_conditions(&mut self, _ctx: &mut StateCtx) -> Option<&'static str> {
        None
    }
    /// Runs once when the machine transitions out of this state.
    fn exit_actions(&mut self, _ctx: &mut StateCtx) {}
}

/// Named-state machine with exactly one active state once started.
pub struct StateMachine {
    states: HashMap<&'static str, Box<dyn State>>,
    active: Option<&'static str>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            active: None,
        }
    }

    pub fn add_state(&mut self, name: &'static str, state: Box<dyn State>) {
        self.states.insert(name, state);
    }

    pub fn active_state(&self) -> Option<&'static str> {
        self.active
    }

    pub fn has_state(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// One step: `do_actions`, then `check_conditions`, then any
    /// requested transition.
    pub fn think(&mut self, ctx: &mut StateCtx) {
        let Some(name) = self.active else { return };
        let next = {
            let state = match self.states.get_mut(name) {
                Some(state) => state,
                None => panic!("active state '{}' is not registered", name),
            };
            state.do_actions(ctx);
            state.check_conditions(ctx)
        };
        if let Some(next) = next {
            self.set_state(next, ctx);
        }
    }

    /// Exit/entry handoff to a named state. An unregistered name is a
    /// programming error and fails fast.
    pub fn set_state(&mut self, name: &'static str, ctx: &mut StateCtx) {
        assert!(
            self.states.contains_key(name),
            "unknown state '{}' requested",
            name
        );
        if let Some(old) = self.active {
            if let Some(state) = self.states.get_mut(old) {
                state.exit_actions(ctx);
            }
            tracing::debug!(agent = ?ctx.id, from = old, to = name, "state transition");
        }
        self.active = Some(name);
        if let Some(state) = self.states.get_mut(name) {
            state.entry_actions(ctx);
        }
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
