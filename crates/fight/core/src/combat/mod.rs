//! Hit queueing, resolution and damage accounting.
//!
//! Collision detection lives outside the core. When it finds contact it
//! calls [`FightState::enqueue_hit`], which only snapshots the attack onto the
//! defender. Resolution happens during the next pre-state-machine pass, in
//! walk order, through [`FightEngine::resolve_pending_hits`].
//!
//! [`FightEngine::resolve_pending_hits`]: crate::engine::FightEngine::resolve_pending_hits
mod damage;
mod hitdef;
mod resolve;
mod victory;

pub use hitdef::{
    ActiveHit, CornerPush, FacingRule, GroundType, GuardFlags, HitDefinition, HitPhase,
    PauseTimes, PendingHit,
};
pub use resolve::{HitOutcome, HitRejection};
pub use victory::VictoryType;

use tracing::trace;

use crate::error::report;
use crate::state::{Entity, EntityHandle, FightState, MoveType, StoreError};

impl FightState {
    /// Queues `definition` against `defender`. Nothing is applied until the
    /// next pre-state-machine pass.
    pub fn enqueue_hit(
        &mut self,
        defender: EntityHandle,
        attacker: EntityHandle,
        definition: &HitDefinition,
    ) -> bool {
        self.try_enqueue_hit(defender, attacker, definition)
            .map_err(|err| report(&err))
            .is_ok()
    }

    fn try_enqueue_hit(
        &mut self,
        defender: EntityHandle,
        attacker: EntityHandle,
        definition: &HitDefinition,
    ) -> Result<(), StoreError> {
        let source = self.store.try_get(attacker)?;
        let pending = PendingHit {
            attacker,
            attacker_root: source.root,
            attacker_facing: source.facing,
            definition: definition.clone(),
        };
        self.store.try_get_mut(defender)?.pending_hits.push(pending);
        trace!(%attacker, %defender, "hit queued");
        Ok(())
    }

    /// Arms `definition` as the attack `entity` currently threatens with.
    pub fn arm_attack(&mut self, entity: EntityHandle, definition: HitDefinition) {
        if let Some(entity) = self.store.get_mut(entity) {
            entity.move_type = MoveType::Attack;
            entity.combat.armed = Some(definition);
        }
    }

    pub fn disarm_attack(&mut self, entity: EntityHandle) {
        if let Some(entity) = self.store.get_mut(entity) {
            entity.combat.armed = None;
        }
    }

    /// Ticks the hit currently affecting `entity` has left to run, if any.
    pub fn hit_time_remaining(&self, entity: EntityHandle) -> Option<u32> {
        let hit = self.store.get(entity)?.combat.active_hit.as_ref()?;
        match hit.phase {
            HitPhase::Shaking => Some(hit.hit_time),
            HitPhase::Recoiling { remaining } => Some(remaining),
            HitPhase::Over => Some(0),
        }
    }
}

/// Advances the active hit of an unpaused defender.
///
/// The shake ends as soon as the hit-pause has cleared: the knockback chosen
/// for the defender's stance is applied and the recoil countdown starts.
pub(crate) fn advance_hit_phase(entity: &mut Entity) {
    let facing = entity.facing;
    let Some(hit) = entity.combat.active_hit.as_mut() else {
        return;
    };
    match hit.phase {
        HitPhase::Shaking => {
            entity.body.velocity = hit.velocity.faced(facing);
            hit.phase = if hit.hit_time == 0 {
                HitPhase::Over
            } else {
                HitPhase::Recoiling {
                    remaining: hit.hit_time,
                }
            };
        }
        HitPhase::Recoiling { remaining } => {
            hit.phase = if remaining <= 1 {
                HitPhase::Over
            } else {
                HitPhase::Recoiling {
                    remaining: remaining - 1,
                }
            };
        }
        HitPhase::Over => {}
    }
}
