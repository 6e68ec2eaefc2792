//! Tick driver and state machine driver.
//!
//! The [`FightEngine`] is the only way collaborators mutate a [`FightState`]
//! with side effects. One outer [`FightEngine::tick`] runs as many inner
//! updates as the clock grants, and each inner update runs the three passes
//! in fixed order over root P1's tree then root P2's:
//!
//! pre-state-machine → state-machine → post-state-machine → render attributes

mod driver;
mod errors;
mod guard;
mod passes;
mod render;

pub use errors::{TickPhase, TransitionError};

use tracing::trace_span;

use crate::env::FightEnv;
use crate::state::FightState;

/// Drives a match one tick at a time.
///
/// The engine borrows the world and the collaborators for its lifetime. The
/// script oracle receives `&mut FightEngine` while evaluating a state, so any
/// transition or hit it requests goes through the same ordering rules.
pub struct FightEngine<'a> {
    pub(crate) state: &'a mut FightState,
    pub(crate) env: FightEnv<'a>,
    depth: u32,
}

impl<'a> FightEngine<'a> {
    /// Creates a new engine over `state` with the given collaborators.
    pub fn new(state: &'a mut FightState, env: FightEnv<'a>) -> Self {
        Self {
            state,
            env,
            depth: 0,
        }
    }

    pub fn state(&self) -> &FightState {
        self.state
    }

    pub fn state_mut(&mut self) -> &mut FightState {
        self.state
    }

    pub fn env(&self) -> FightEnv<'a> {
        self.env
    }

    /// Runs one outer tick and returns the number of inner updates performed.
    pub fn tick(&mut self) -> u32 {
        let updates = self.state.clock.begin_tick();
        for _ in 0..updates {
            self.step();
        }
        updates
    }

    /// Runs exactly one inner update regardless of time dilation.
    pub fn step(&mut self) {
        let span = trace_span!("step", tick = self.state.tick.0);
        let _enter = span.enter();

        self.run_pre_state_machine_pass();
        self.run_state_machine_pass();
        self.run_post_state_machine_pass();
        self.refresh_render_attributes();

        self.state.clock.advance_pause();
        self.state.tick = self.state.tick + 1;
    }
}
