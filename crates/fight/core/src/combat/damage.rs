//! Life accounting and knockouts.

use tracing::info;

use crate::engine::FightEngine;
use crate::hitattr::AttackAttribute;
use crate::state::{DefeatRecord, EntityHandle, StateNo, TickFlags};

/// What caused a loss of life, recorded if it knocks the entity out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) struct DamageCause {
    pub while_guarding: bool,
    pub self_inflicted: bool,
    pub attack: Option<AttackAttribute>,
}

impl<'a> FightEngine<'a> {
    /// Removes `damage` life from `entity` as if its own logic caused it.
    ///
    /// Negative damage heals. Returns true if this call knocked the entity out.
    pub fn add_damage(&mut self, entity: EntityHandle, damage: i32) -> bool {
        let cause = DamageCause {
            while_guarding: self
                .state
                .store
                .get(entity)
                .is_some_and(|entity| entity.is_guarding()),
            self_inflicted: true,
            attack: None,
        };
        self.apply_damage(entity, damage, cause)
    }

    pub(crate) fn apply_damage(
        &mut self,
        handle: EntityHandle,
        damage: i32,
        cause: DamageCause,
    ) -> bool {
        let Some(entity) = self.state.store.get_mut(handle) else {
            return false;
        };
        let life = entity.life.saturating_sub(damage);
        entity.life = life.clamp(0, entity.life_max());
        if entity.life > 0 {
            return false;
        }
        self.defeat(handle, cause)
    }

    /// Knocks `handle` out. Does nothing if it is already down or the match is
    /// in training mode.
    fn defeat(&mut self, handle: EntityHandle, cause: DamageCause) -> bool {
        if self.state.config.training_mode {
            return false;
        }
        let Some(entity) = self.state.store.get_mut(handle) else {
            return false;
        };
        if !entity.alive {
            return false;
        }

        entity.alive = false;
        entity.control = false;
        entity.combat.falling = true;
        entity.defeat = Some(DefeatRecord {
            while_guarding: cause.while_guarding,
            self_inflicted: cause.self_inflicted,
            attack: cause.attack,
            ticks_since: 0,
        });
        if let Some(hit) = entity.combat.active_hit.as_mut() {
            if hit.velocity.y == 0.0 {
                hit.velocity.y = -1.0;
            }
        }

        let owner = entity.root;
        let is_root = entity.is_root();
        let sound = if entity.flags.contains(TickFlags::NO_KO_SOUND) {
            None
        } else {
            entity.definition.ko_sound
        };
        info!(
            entity = %handle,
            root = %owner,
            guarding = cause.while_guarding,
            self_inflicted = cause.self_inflicted,
            "knocked out"
        );

        if let (Some(sound), Ok(effects)) = (sound, self.env.effects()) {
            effects.play_sound(owner, sound);
        }
        // A landed hit drives its own reaction afterwards.
        if is_root && cause.attack.is_none() {
            self.change_state_without_evaluation(handle, StateNo::HIT_LYING);
        }
        true
    }
}
