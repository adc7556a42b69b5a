//! Bevy integration.
//!
//! The host sends `BuildRequestEvent`; the active build then advances
//! `steps_per_frame` collapses per `Update`, reporting each one as a
//! `TileCollapsedEvent` and the end of the build as `BuildFinishedEvent`.
//! Events are read-only notifications, the solver lives in `WorldGenState`.

use bevy::prelude::*;

use crate::config::GeneratorConfig;
use crate::grid::Position;
use crate::rules::TileId;
use crate::solver::BuildOutcome;
use crate::world::{MapBuild, WorldError, WorldGenerator};

pub struct WorldGenPlugin {
    generator: WorldGenerator,
}

impl WorldGenPlugin {
    pub fn new(generator: WorldGenerator) -> Self {
        Self { generator }
    }

    pub fn from_config(config: GeneratorConfig) -> Result<Self, WorldError> {
        Ok(Self::new(WorldGenerator::new(config)?))
    }
}

impl Plugin for WorldGenPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(WorldGenState::new(self.generator.clone()))
            .add_event::<BuildRequestEvent>()
            .add_event::<TileCollapsedEvent>()
            .add_event::<BuildFinishedEvent>()
            .add_systems(
                Update,
                (start_requested_builds, advance_active_build).chain(),
            );
    }
}

/// Generator plus the build currently being stepped
#[derive(Resource, Debug)]
pub struct WorldGenState {
    generator: WorldGenerator,
    active: Option<MapBuild>,
}

impl WorldGenState {
    pub fn new(generator: WorldGenerator) -> Self {
        Self {
            generator,
            active: None,
        }
    }

    pub fn generator(&self) -> &WorldGenerator {
        &self.generator
    }

    pub fn is_building(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_build(&self) -> Option<&MapBuild> {
        self.active.as_ref()
    }
}

/// Event: start a new build, replacing any build in progress
#[derive(Event, Debug, Clone, Default)]
pub struct BuildRequestEvent {
    /// Seed override; the configured seed when `None`
    pub seed: Option<u64>,
}

/// Event: one cell collapsed
#[derive(Event, Debug, Clone)]
pub struct TileCollapsedEvent {
    pub step: usize,
    pub position: Position,
    pub tile: TileId,
    pub name: String,
}

/// Event: a build reached `Done` and its map is queryable
#[derive(Event, Debug, Clone)]
pub struct BuildFinishedEvent {
    pub seed: u64,
    pub attempt: u32,
    pub outcome: BuildOutcome,
    pub steps: usize,
}

/// System: begin the most recent requested build
pub fn start_requested_builds(
    mut requests: EventReader<BuildRequestEvent>,
    mut state: ResMut<WorldGenState>,
) {
    let Some(request) = requests.read().last() else {
        return;
    };
    let seed = request.seed.unwrap_or(state.generator.config().seed);
    if state.active.is_some() {
        info!("World build superseded by a new request");
    }
    let build = state.generator.begin(seed);
    state.active = Some(build);
    info!("World build requested with seed {}", seed);
}

/// System: advance the active build and publish its progress
pub fn advance_active_build(
    mut state: ResMut<WorldGenState>,
    mut collapsed_events: EventWriter<TileCollapsedEvent>,
    mut finished_events: EventWriter<BuildFinishedEvent>,
) {
    let state = &mut *state;
    let Some(build) = state.active.as_mut() else {
        return;
    };

    for _ in 0..state.generator.config().steps_per_frame {
        let Some(event) = build.step() else {
            break;
        };
        let name = build
            .solver()
            .tileset()
            .name(event.tile)
            .unwrap_or_default()
            .to_string();
        collapsed_events.send(TileCollapsedEvent {
            step: event.step,
            position: event.position,
            tile: event.tile,
            name,
        });
    }

    if !build.is_done() {
        return;
    }
    let Some(build) = state.active.take() else {
        return;
    };
    let (seed, attempt) = (build.seed(), build.attempt());
    let map = build.finish();

    if !map.is_completed() && attempt + 1 < state.generator.config().max_attempts {
        warn!(
            "World build contradicted on attempt {}, retrying",
            attempt
        );
        state.active = Some(state.generator.begin_attempt(seed, attempt + 1));
        return;
    }

    let Some(outcome) = map.outcome() else {
        return;
    };
    let steps = map.steps();
    state.generator.store(map);
    finished_events.send(BuildFinishedEvent {
        seed,
        attempt,
        outcome,
        steps,
    });
    info!(
        "World build finished: {} after {} steps",
        outcome.as_str(),
        steps
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleTable, TileEntry, TileRule};

    fn test_app(config: GeneratorConfig) -> App {
        let mut app = App::new();
        app.add_plugins(WorldGenPlugin::from_config(config).unwrap());
        app
    }

    fn finished(app: &App) -> Vec<BuildFinishedEvent> {
        app.world()
            .resource::<Events<BuildFinishedEvent>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }

    #[test]
    fn test_no_build_without_request() {
        let mut app = test_app(GeneratorConfig {
            world_width: 2,
            world_height: 2,
            ..Default::default()
        });
        app.update();
        let state = app.world().resource::<WorldGenState>();
        assert!(!state.is_building());
        assert!(state.generator().last_map().is_none());
    }

    #[test]
    fn test_build_advances_per_frame() {
        let mut app = test_app(GeneratorConfig {
            world_width: 3,
            world_height: 3,
            steps_per_frame: 4,
            ..Default::default()
        });
        app.world_mut().send_event(BuildRequestEvent { seed: Some(11) });
        app.update();

        let collapsed = app
            .world()
            .resource::<Events<TileCollapsedEvent>>()
            .iter_current_update_events()
            .count();
        let state = app.world().resource::<WorldGenState>();
        let steps = state.active_build().map(|b| b.steps()).unwrap_or(collapsed);
        assert_eq!(collapsed, steps);
        assert!(collapsed <= 4);

        // 9 cells at 4 per frame is done within a few more frames
        for _ in 0..4 {
            app.update();
        }
        let state = app.world().resource::<WorldGenState>();
        assert!(!state.is_building());
        assert!(state.generator().last_map().is_some());
    }

    #[test]
    fn test_finished_event_reports_outcome() {
        let mut app = test_app(GeneratorConfig {
            world_width: 2,
            world_height: 2,
            steps_per_frame: 100,
            ..Default::default()
        });
        app.world_mut().send_event(BuildRequestEvent::default());
        app.update();
        let events = finished(&app);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].seed, 42);
        let state = app.world().resource::<WorldGenState>();
        assert!(state.generator().terrain_at(0, 0).is_ok());
    }

    #[test]
    fn test_retry_on_contradiction() {
        let rules = RuleTable::from_entries([
            TileEntry::new("a", TileRule::parse("GG", "GG", "GG", "SS").unwrap()),
            TileEntry::new("b", TileRule::parse("GG", "WW", "GG", "BB").unwrap()),
        ])
        .unwrap();
        let config = GeneratorConfig {
            world_width: 2,
            world_height: 1,
            max_attempts: 2,
            steps_per_frame: 10,
            ..Default::default()
        };
        let generator = WorldGenerator::with_rules(config, &rules).unwrap();
        let mut app = App::new();
        app.add_plugins(WorldGenPlugin::new(generator));
        app.world_mut().send_event(BuildRequestEvent { seed: Some(5) });

        app.update();
        assert!(finished(&app).is_empty());
        assert!(app.world().resource::<WorldGenState>().is_building());

        app.update();
        let events = finished(&app);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].attempt, 1);
        assert!(!events[0].outcome.is_completed());
    }
}
