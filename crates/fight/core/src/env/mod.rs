//! Traits describing the collaborators around the combat core.
//!
//! The script interpreter, stage geometry, input commands, effects, projectile
//! bookkeeping, hit overrides and animation playback are all external. The
//! [`Env`] aggregate bundles them so the engine can reach everything it needs
//! without hard coupling to concrete implementations.
mod animation;
mod command;
mod effects;
mod error;
mod hit_override;
mod projectile;
mod script;
mod stage;

pub use animation::AnimationOracle;
pub use command::{CommandOracle, GUARD_COMMAND};
pub use effects::{EffectsOracle, SparkRequest};
pub use error::OracleError;
pub use hit_override::{HitOverride, HitOverrideOracle};
pub use projectile::{ProjectileContact, ProjectileOracle};
pub use script::ScriptOracle;
pub use stage::{ShadowParams, StageBounds, StageOracle};

/// Aggregates the collaborators required by the engine.
pub struct Env<'a, S, G, C, E, P, H, A>
where
    S: ScriptOracle + ?Sized,
    G: StageOracle + ?Sized,
    C: CommandOracle + ?Sized,
    E: EffectsOracle + ?Sized,
    P: ProjectileOracle + ?Sized,
    H: HitOverrideOracle + ?Sized,
    A: AnimationOracle + ?Sized,
{
    script: Option<&'a S>,
    stage: Option<&'a G>,
    commands: Option<&'a C>,
    effects: Option<&'a E>,
    projectiles: Option<&'a P>,
    overrides: Option<&'a H>,
    animation: Option<&'a A>,
}

pub type FightEnv<'a> = Env<
    'a,
    dyn ScriptOracle + 'a,
    dyn StageOracle + 'a,
    dyn CommandOracle + 'a,
    dyn EffectsOracle + 'a,
    dyn ProjectileOracle + 'a,
    dyn HitOverrideOracle + 'a,
    dyn AnimationOracle + 'a,
>;

impl<S, G, C, E, P, H, A> Clone for Env<'_, S, G, C, E, P, H, A>
where
    S: ScriptOracle + ?Sized,
    G: StageOracle + ?Sized,
    C: CommandOracle + ?Sized,
    E: EffectsOracle + ?Sized,
    P: ProjectileOracle + ?Sized,
    H: HitOverrideOracle + ?Sized,
    A: AnimationOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, G, C, E, P, H, A> Copy for Env<'_, S, G, C, E, P, H, A>
where
    S: ScriptOracle + ?Sized,
    G: StageOracle + ?Sized,
    C: CommandOracle + ?Sized,
    E: EffectsOracle + ?Sized,
    P: ProjectileOracle + ?Sized,
    H: HitOverrideOracle + ?Sized,
    A: AnimationOracle + ?Sized,
{
}

impl<'a, S, G, C, E, P, H, A> Env<'a, S, G, C, E, P, H, A>
where
    S: ScriptOracle + ?Sized,
    G: StageOracle + ?Sized,
    C: CommandOracle + ?Sized,
    E: EffectsOracle + ?Sized,
    P: ProjectileOracle + ?Sized,
    H: HitOverrideOracle + ?Sized,
    A: AnimationOracle + ?Sized,
{
    pub fn new(
        script: Option<&'a S>,
        stage: Option<&'a G>,
        commands: Option<&'a C>,
        effects: Option<&'a E>,
        projectiles: Option<&'a P>,
        overrides: Option<&'a H>,
        animation: Option<&'a A>,
    ) -> Self {
        Self {
            script,
            stage,
            commands,
            effects,
            projectiles,
            overrides,
            animation,
        }
    }

    pub fn with_all(
        script: &'a S,
        stage: &'a G,
        commands: &'a C,
        effects: &'a E,
        projectiles: &'a P,
        overrides: &'a H,
        animation: &'a A,
    ) -> Self {
        Self::new(
            Some(script),
            Some(stage),
            Some(commands),
            Some(effects),
            Some(projectiles),
            Some(overrides),
            Some(animation),
        )
    }

    pub fn empty() -> Self {
        Self {
            script: None,
            stage: None,
            commands: None,
            effects: None,
            projectiles: None,
            overrides: None,
            animation: None,
        }
    }

    /// Returns the ScriptOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::ScriptNotAvailable` if no script oracle was provided.
    pub fn script(&self) -> Result<&'a S, OracleError> {
        self.script.ok_or(OracleError::ScriptNotAvailable)
    }

    pub fn stage(&self) -> Result<&'a G, OracleError> {
        self.stage.ok_or(OracleError::StageNotAvailable)
    }

    pub fn commands(&self) -> Result<&'a C, OracleError> {
        self.commands.ok_or(OracleError::CommandsNotAvailable)
    }

    pub fn effects(&self) -> Result<&'a E, OracleError> {
        self.effects.ok_or(OracleError::EffectsNotAvailable)
    }

    pub fn projectiles(&self) -> Result<&'a P, OracleError> {
        self.projectiles.ok_or(OracleError::ProjectilesNotAvailable)
    }

    pub fn overrides(&self) -> Result<&'a H, OracleError> {
        self.overrides.ok_or(OracleError::HitOverridesNotAvailable)
    }

    pub fn animation(&self) -> Result<&'a A, OracleError> {
        self.animation.ok_or(OracleError::AnimationNotAvailable)
    }
}

impl<'a, S, G, C, E, P, H, A> Env<'a, S, G, C, E, P, H, A>
where
    S: ScriptOracle + 'a,
    G: StageOracle + 'a,
    C: CommandOracle + 'a,
    E: EffectsOracle + 'a,
    P: ProjectileOracle + 'a,
    H: HitOverrideOracle + 'a,
    A: AnimationOracle + 'a,
{
    /// Erases concrete oracle types into the trait-object environment the engine uses.
    pub fn into_fight_env(self) -> FightEnv<'a> {
        Env::new(
            self.script.map(|s| s as &'a dyn ScriptOracle),
            self.stage.map(|g| g as &'a dyn StageOracle),
            self.commands.map(|c| c as &'a dyn CommandOracle),
            self.effects.map(|e| e as &'a dyn EffectsOracle),
            self.projectiles.map(|p| p as &'a dyn ProjectileOracle),
            self.overrides.map(|h| h as &'a dyn HitOverrideOracle),
            self.animation.map(|a| a as &'a dyn AnimationOracle),
        )
    }
}
