//! Attack-box collision for the headless runner.
//!
//! The core never detects contact itself. After every tick this pass looks for
//! armed attacks whose reach overlaps an opposing body and queues the hit; the
//! core resolves it during the next pre-state-machine pass.

use std::collections::HashSet;

use fight_core::physics::{body_extent, coordinate_scale, front_x};
use fight_core::{Entity, EntityHandle, FightState, MachineOwner, MoveType, RootId};
use tracing::debug;

use crate::script::TableScript;

/// Remembers which attacks already connected.
///
/// An attack is identified by its entity and the entity's transition count,
/// so it connects at most once per state entry.
#[derive(Debug, Default)]
pub struct Collision {
    fired: HashSet<(EntityHandle, u32)>,
}

impl Collision {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues every new contact and returns how many hits were queued.
    pub fn detect(&mut self, state: &mut FightState, script: &TableScript) -> usize {
        self.fired.retain(|&(handle, transitions)| {
            state
                .store
                .get(handle)
                .is_some_and(|entity| entity.machine.transitions == transitions)
        });

        let mut contacts = Vec::new();
        for handle in state.store.walk_all() {
            let Some(attacker) = state.store.get(handle) else {
                continue;
            };
            let key = (handle, attacker.machine.transitions);
            if self.fired.contains(&key) || !matches!(attacker.move_type, MoveType::Attack) {
                continue;
            }
            let Some(definition) = attacker.combat.armed.as_ref() else {
                continue;
            };
            let table = table_of(state, attacker);
            let Some(window) = script.attack_window(table, attacker.machine.state) else {
                continue;
            };
            let reach = attack_span(attacker, window.reach);

            let defender = state
                .store
                .walk(attacker.root.other())
                .into_iter()
                .filter_map(|candidate| state.store.get(candidate))
                .filter(|candidate| !candidate.is_projectile() || attacker.is_projectile())
                .find(|candidate| overlaps(reach, attacker, candidate));
            if let Some(defender) = defender {
                contacts.push((key, defender.handle, definition.clone()));
            }
        }

        let mut queued = 0;
        for ((attacker, transitions), defender, definition) in contacts {
            if state.enqueue_hit(defender, attacker, &definition) {
                debug!(%attacker, %defender, "contact");
                self.fired.insert((attacker, transitions));
                queued += 1;
            }
        }
        queued
    }
}

/// Root whose table the entity is currently running.
fn table_of(state: &FightState, entity: &Entity) -> RootId {
    match entity.machine.owner {
        MachineOwner::Own => entity.root,
        MachineOwner::BorrowingFrom(lender) => {
            state.store.get(lender).map_or(entity.root, |lender| lender.root)
        }
    }
}

/// Horizontal (min, max) covered by an attack reaching `reach` past the body front.
fn attack_span(attacker: &Entity, reach: f64) -> (f64, f64) {
    let front = front_x(attacker);
    let tip = front + reach * attacker.facing.sign();
    (front.min(tip), front.max(tip))
}

fn overlaps(reach: (f64, f64), attacker: &Entity, defender: &Entity) -> bool {
    let scale = coordinate_scale(attacker.coordinate_p(), defender.coordinate_p());
    let (min, max) = body_extent(defender);
    let (min, max) = (min * scale, max * scale);
    reach.0 <= max && min <= reach.1
}
