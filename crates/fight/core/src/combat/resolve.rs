//! Turning a queued attack into its effect on both participants.
//!
//! A pending hit is checked against the rejection rules, applied to the
//! defender (facing, guard, knockback), then to the attacker (corner push),
//! then damage and power are settled before either state machine is driven.
//! Hit-pause, effects and projectile bookkeeping come last.

use std::sync::Arc;

use tracing::{debug, trace};

use super::damage::DamageCause;
use super::hitdef::{ActiveHit, FacingRule, GroundType, HitDefinition, HitPhase, PendingHit};
use crate::engine::FightEngine;
use crate::env::{HitOverride, ProjectileContact, SparkRequest};
use crate::hitattr::{AttackClass, AttackType, passes_filter};
use crate::physics::{body_extent, coordinate_scale, is_in_corner, position_seen_by};
use crate::state::{
    EntityHandle, FighterDefinition, MachineOwner, MoveContact, MoveType, StateNo, StateType,
    TickFlags, Vec2,
};

/// Why a pending hit was discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HitRejection {
    AttackerGone,
    DefenderGone,
    /// Attacker and defender belong to the same root.
    SameRoot,
    /// Projectiles can only be hit by other projectiles.
    ProjectileImmune,
    /// The attacker's root is running a borrowed state table.
    AttackerBorrowing,
    GlobalPause,
    Filtered,
    Overridden,
    /// The defender has been down longer than the over-hit grace window.
    OverHit,
    JuggleExhausted,
}

impl HitRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AttackerGone => "attacker_gone",
            Self::DefenderGone => "defender_gone",
            Self::SameRoot => "same_root",
            Self::ProjectileImmune => "projectile_immune",
            Self::AttackerBorrowing => "attacker_borrowing",
            Self::GlobalPause => "global_pause",
            Self::Filtered => "filtered",
            Self::Overridden => "overridden",
            Self::OverHit => "over_hit",
            Self::JuggleExhausted => "juggle_exhausted",
        }
    }
}

/// Result of resolving one pending hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    Hit { damage: i32, knocked_out: bool },
    Guarded { damage: i32, knocked_out: bool },
    Rejected(HitRejection),
}

impl HitOutcome {
    pub fn landed(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// Attacker data read once before the defender is mutated.
struct AttackerSnapshot {
    handle: EntityHandle,
    root_handle: Option<EntityHandle>,
    coordinate_p: f64,
    is_root: bool,
    is_projectile: bool,
    stance: StateType,
    definition: Arc<FighterDefinition>,
}

impl<'a> FightEngine<'a> {
    /// Resolves every hit queued on `defender`, in queue order.
    ///
    /// The queue is drained first; each record is consumed at most once.
    pub fn resolve_pending_hits(&mut self, defender: EntityHandle) -> Vec<HitOutcome> {
        let pending = match self.state.store.get_mut(defender) {
            Some(entity) => std::mem::take(&mut entity.pending_hits),
            None => return Vec::new(),
        };
        pending
            .into_iter()
            .map(|hit| self.resolve_pending_hit(defender, hit))
            .collect()
    }

    pub fn resolve_pending_hit(&mut self, defender: EntityHandle, pending: PendingHit) -> HitOutcome {
        let outcome = match self.admit(defender, &pending) {
            Ok(hit_override) => self.apply_hit(defender, &pending, hit_override),
            Err(rejection) => HitOutcome::Rejected(rejection),
        };
        match outcome {
            HitOutcome::Rejected(rejection) => trace!(
                %defender,
                attacker = %pending.attacker,
                reason = rejection.as_str(),
                "hit rejected"
            ),
            landed => debug!(%defender, attacker = %pending.attacker, ?landed, "hit resolved"),
        }
        outcome
    }

    /// Runs the rejection rules. Juggle points spent by a rejected hit stay spent.
    fn admit(
        &mut self,
        defender_handle: EntityHandle,
        pending: &PendingHit,
    ) -> Result<Option<HitOverride>, HitRejection> {
        let store = &self.state.store;
        let attacker = store
            .get(pending.attacker)
            .ok_or(HitRejection::AttackerGone)?;
        let defender = store.get(defender_handle).ok_or(HitRejection::DefenderGone)?;
        let definition = &pending.definition;

        if attacker.root == defender.root {
            return Err(HitRejection::SameRoot);
        }
        if defender.is_projectile() && !attacker.is_projectile() {
            return Err(HitRejection::ProjectileImmune);
        }
        let attacker_owner = self
            .state
            .root_entity(attacker.root)
            .map(|root| root.machine.owner);
        if attacker_owner != Some(MachineOwner::Own) {
            return Err(HitRejection::AttackerBorrowing);
        }
        if self.state.clock.is_paused() {
            return Err(HitRejection::GlobalPause);
        }
        if !passes_filter(defender, &definition.attribute) {
            return Err(HitRejection::Filtered);
        }
        let hit_override = self
            .env
            .overrides()
            .ok()
            .and_then(|overrides| overrides.find_override(defender_handle, &definition.attribute));
        if hit_override == Some(HitOverride::Ignore) {
            return Err(HitRejection::Overridden);
        }
        let grace = self.state.config.over_hit_grace_ticks;
        if defender.defeat.is_some_and(|record| record.ticks_since > grace) {
            return Err(HitRejection::OverHit);
        }

        let juggleable = !defender.is_guarding()
            && match defender.state_type {
                StateType::Air => defender.combat.falling || definition.air_fall,
                StateType::Lying => true,
                StateType::Standing | StateType::Crouching => false,
            };
        let exempt =
            definition.no_juggle_check || attacker.flags.contains(TickFlags::NO_JUGGLE_CHECK);
        if juggleable && !exempt {
            let cost = definition.juggle_cost;
            let defender = self
                .state
                .store
                .get_mut(defender_handle)
                .ok_or(HitRejection::DefenderGone)?;
            defender.combat.is_being_juggled = true;
            defender.combat.juggle_points = defender.combat.juggle_points.saturating_sub(cost);
            if defender.combat.juggle_points < 0 {
                return Err(HitRejection::JuggleExhausted);
            }
        }
        Ok(hit_override)
    }

    fn apply_hit(
        &mut self,
        defender_handle: EntityHandle,
        pending: &PendingHit,
        hit_override: Option<HitOverride>,
    ) -> HitOutcome {
        let definition = &pending.definition;
        let Some(attacker) = self.snapshot_attacker(pending.attacker) else {
            return HitOutcome::Rejected(HitRejection::AttackerGone);
        };

        // Defender side: control, facing, guard and knockback.
        let Some(defender) = self.state.store.get_mut(defender_handle) else {
            return HitOutcome::Rejected(HitRejection::DefenderGone);
        };
        defender.control = false;
        defender.move_type = MoveType::BeingHit;
        defender.facing = match definition.facing {
            FacingRule::FaceAttacker => pending.attacker_facing.opposite(),
            FacingRule::SameAsAttacker => pending.attacker_facing,
            FacingRule::Keep => defender.facing,
        };
        let stance = defender.state_type;
        let was_guarding = defender.is_guarding();
        let must_unguard = was_guarding
            && (definition.unguardable || !definition.guard_flags.guardable_in(stance));
        let guarded = was_guarding && !must_unguard;

        let to_defender = coordinate_scale(defender.coordinate_p(), attacker.coordinate_p);
        let (velocity, mut falling, hit_time) = if guarded {
            (
                Vec2::new(definition.guard_velocity, 0.0),
                false,
                definition.guard_hit_time,
            )
        } else if stance == StateType::Air {
            (definition.air_velocity, definition.air_fall, definition.air_hit_time)
        } else {
            (
                definition.ground_velocity,
                definition.ground_fall,
                definition.ground_hit_time,
            )
        };
        let velocity = velocity.scaled(to_defender);

        let mut redirect = None;
        if let Some(HitOverride::Redirect { state, force_air }) = hit_override {
            redirect = Some(state);
            if force_air {
                defender.state_type = StateType::Air;
                falling = true;
            }
        }
        defender.combat.falling = falling;
        defender.combat.active_hit = Some(ActiveHit {
            attacker: pending.attacker,
            attacker_root: pending.attacker_root,
            definition: definition.clone(),
            guarded,
            velocity,
            hit_time,
            phase: HitPhase::Shaking,
        });
        let defender_is_root = defender.is_root();
        let defender_is_projectile = defender.is_projectile();
        let defender_root = defender.root;
        let defence = defender.definition.defence_multiplier(falling);

        if must_unguard {
            if let Some(idle) = StateNo::idle_for(stance) {
                self.change_state_without_evaluation(defender_handle, idle);
            }
        }

        // Attacker side: corner push.
        let pushable = attacker.is_root
            && attacker.stance != StateType::Air
            && definition.attribute.class == AttackClass::Normal
            && definition.attribute.kind != AttackType::Throw;
        if pushable {
            self.apply_corner_push(defender_handle, &attacker, pending, guarded, velocity.x);
        }

        // Damage and power.
        let base = if guarded {
            definition.guard_damage
        } else {
            definition.hit_damage
        };
        let damage =
            (f64::from(base) * attacker.definition.attack_multiplier() * defence) as i32;
        let knocked_out = self.apply_damage(
            defender_handle,
            damage,
            DamageCause {
                while_guarding: guarded,
                self_inflicted: false,
                attack: Some(definition.attribute),
            },
        );
        let (attacker_gain, defender_gain) = if guarded {
            (definition.attacker_guard_power, definition.defender_guard_power)
        } else {
            (definition.attacker_power, definition.defender_power)
        };
        if let Some(root) = attacker.root_handle {
            self.state.add_power(root, attacker_gain);
        }
        if let Some(root) = self.state.root_handle(defender_root) {
            self.state.add_power(root, defender_gain);
        }

        // State machines. The defender reacts again if the attacker's own
        // state did not move in the meantime, so both observe the hit. A
        // knocked-out defender still reacts; its falling flag is already set.
        let attacker_transitions = self.transition_count(pending.attacker);
        if defender_is_root {
            self.drive_reaction(defender_handle, pending.attacker, definition, redirect);
        }
        if let Some(state) = definition.attacker_state {
            self.change_state(pending.attacker, state);
        }
        if defender_is_root && self.transition_count(pending.attacker) == attacker_transitions {
            self.drive_reaction(defender_handle, pending.attacker, definition, redirect);
        }

        // Hit-pause.
        let pause = if guarded {
            definition.guard_pause
        } else {
            definition.pause
        };
        let standing = self
            .state
            .store
            .get(defender_handle)
            .is_some_and(|entity| entity.alive);
        if standing {
            self.set_hit_paused(defender_handle, pause.defender);
        }
        self.set_hit_paused(pending.attacker, pause.attacker);

        // Contact bookkeeping.
        if let Some(entity) = self.state.store.get_mut(pending.attacker) {
            entity.combat.move_contact = if guarded {
                MoveContact::Guarded
            } else {
                MoveContact::Hit
            };
            entity.combat.contact_ticks = 0;
            entity.combat.armed = None;
            if !guarded {
                entity.combat.hit_count += 1;
            }
        }
        if !guarded {
            if let Some(root) = self.state.root_entity_mut(pending.attacker_root) {
                root.combat.combo += 1;
            }
        }

        self.play_hit_effects(defender_handle, &attacker, definition, guarded);

        let contact = if guarded {
            ProjectileContact::Guarded
        } else {
            ProjectileContact::Hit
        };
        if let Ok(projectiles) = self.env.projectiles() {
            if defender_is_projectile {
                projectiles.on_contact(defender_handle, pending.attacker, contact);
            }
            if attacker.is_projectile {
                projectiles.on_contact(pending.attacker, defender_handle, contact);
            }
        }

        // Without a shake the knockback starts right away.
        if let Some(defender) = self.state.store.get_mut(defender_handle) {
            if !defender.is_paused() {
                super::advance_hit_phase(defender);
            }
        }

        if guarded {
            HitOutcome::Guarded {
                damage,
                knocked_out,
            }
        } else {
            HitOutcome::Hit {
                damage,
                knocked_out,
            }
        }
    }

    fn snapshot_attacker(&self, handle: EntityHandle) -> Option<AttackerSnapshot> {
        let attacker = self.state.store.get(handle)?;
        Some(AttackerSnapshot {
            handle,
            root_handle: self.state.root_handle(attacker.root),
            coordinate_p: attacker.coordinate_p(),
            is_root: attacker.is_root(),
            is_projectile: attacker.is_projectile(),
            stance: attacker.state_type,
            definition: Arc::clone(&attacker.definition),
        })
    }

    fn transition_count(&self, entity: EntityHandle) -> Option<u32> {
        self.state
            .store
            .get(entity)
            .map(|entity| entity.machine.transitions)
    }

    /// Pushes the attacker back when the defender is pinned against the stage
    /// edge the attacker faces.
    fn apply_corner_push(
        &mut self,
        defender_handle: EntityHandle,
        attacker: &AttackerSnapshot,
        pending: &PendingHit,
        guarded: bool,
        knockback_x: f64,
    ) {
        let Ok(stage) = self.env.stage() else {
            return;
        };
        let Some(defender) = self.state.store.get(defender_handle) else {
            return;
        };
        let pinned = is_in_corner(
            defender,
            stage.bounds(),
            stage.coordinate_p(),
            pending.attacker_facing.is_right(),
            self.state.config.corner_epsilon,
        );
        if !pinned {
            return;
        }

        let push = &pending.definition.corner_push;
        let offset = match (guarded, defender.state_type) {
            (true, StateType::Air) => push.air_guard,
            (true, _) => push.guard,
            (false, StateType::Air) => push.air,
            (false, StateType::Lying) => push.down,
            (false, _) => push.ground,
        };
        let to_attacker = coordinate_scale(attacker.coordinate_p, defender.coordinate_p());
        let delta = offset + 2.0 * knockback_x * to_attacker;

        if let Some(entity) = self.state.store.get_mut(attacker.handle) {
            entity.body.velocity.x += delta * entity.facing.sign();
            trace!(attacker = %attacker.handle, delta, "corner push");
        }
    }

    fn drive_reaction(
        &mut self,
        defender: EntityHandle,
        attacker: EntityHandle,
        definition: &HitDefinition,
        redirect: Option<StateNo>,
    ) {
        if let Some(state) = redirect {
            self.change_state(defender, state);
            return;
        }
        if let Some(state) = definition.defender_state {
            if definition.defender_uses_attacker_states {
                self.change_state_to_other_state_machine(defender, attacker, state);
            } else {
                self.change_state(defender, state);
            }
            return;
        }
        let Some(entity) = self.state.store.get(defender) else {
            return;
        };
        let guarded = entity
            .combat
            .active_hit
            .as_ref()
            .is_some_and(|hit| hit.guarded);
        let state = reaction_state(entity.state_type, guarded, definition.ground_type);
        self.change_state(defender, state);
    }

    /// Spark at the attacker's edge nearest the defender, at the defender's height.
    fn play_hit_effects(
        &self,
        defender_handle: EntityHandle,
        attacker: &AttackerSnapshot,
        definition: &HitDefinition,
        guarded: bool,
    ) {
        let Ok(effects) = self.env.effects() else {
            return;
        };
        let (Some(source), Some(defender)) = (
            self.state.store.get(attacker.handle),
            self.state.store.get(defender_handle),
        ) else {
            return;
        };

        let (spark, sound) = if guarded {
            (
                definition.guard_spark.unwrap_or(attacker.definition.guard_spark),
                definition.guard_sound,
            )
        } else {
            (
                definition.spark.unwrap_or(attacker.definition.hit_spark),
                definition.hit_sound,
            )
        };

        let target = position_seen_by(source, defender);
        let (min_x, max_x) = body_extent(source);
        let edge = if source.body.position.x < target.x {
            max_x
        } else {
            min_x
        };
        let position = Vec2::new(edge, target.y) + definition.spark_offset.faced(source.facing);

        effects.spawn_spark(SparkRequest {
            owner: source.root,
            effect: spark,
            position,
            facing: source.facing,
            coordinate_p: source.coordinate_p(),
        });
        if let Some(sound) = sound {
            effects.play_sound(source.root, sound);
        }
    }
}

/// Standard reaction state for a defender in `stance`.
pub(crate) fn reaction_state(stance: StateType, guarded: bool, ground: GroundType) -> StateNo {
    let trip = ground == GroundType::Trip;
    match stance {
        StateType::Standing if guarded => StateNo::GUARD_HIT_STAND,
        StateType::Crouching if guarded => StateNo::GUARD_HIT_CROUCH,
        StateType::Air if guarded => StateNo::GUARD_HIT_AIR,
        StateType::Standing | StateType::Crouching | StateType::Lying if trip => StateNo::HIT_TRIP,
        StateType::Standing => StateNo::HIT_STAND,
        StateType::Crouching => StateNo::HIT_CROUCH,
        StateType::Air => StateNo::HIT_AIR,
        StateType::Lying => StateNo::HIT_LYING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaction_states_by_stance() {
        let high = GroundType::High;
        assert_eq!(reaction_state(StateType::Standing, false, high), StateNo::HIT_STAND);
        assert_eq!(reaction_state(StateType::Crouching, false, high), StateNo::HIT_CROUCH);
        assert_eq!(reaction_state(StateType::Air, false, high), StateNo::HIT_AIR);
        assert_eq!(reaction_state(StateType::Lying, false, high), StateNo::HIT_LYING);

        assert_eq!(reaction_state(StateType::Standing, true, high), StateNo::GUARD_HIT_STAND);
        assert_eq!(reaction_state(StateType::Crouching, true, high), StateNo::GUARD_HIT_CROUCH);
        assert_eq!(reaction_state(StateType::Air, true, high), StateNo::GUARD_HIT_AIR);
    }

    #[test]
    fn trip_sweeps_grounded_defenders() {
        let trip = GroundType::Trip;
        assert_eq!(reaction_state(StateType::Standing, false, trip), StateNo::HIT_TRIP);
        assert_eq!(reaction_state(StateType::Lying, false, trip), StateNo::HIT_TRIP);
        assert_eq!(reaction_state(StateType::Air, false, trip), StateNo::HIT_AIR);
        assert_eq!(reaction_state(StateType::Standing, true, trip), StateNo::GUARD_HIT_STAND);
    }
}
