//! Server state management
//!
//! HTTP handlers and the tick task share one `ServerState`. Input crosses
//! from handlers to the tick through a single-consumer channel; the tick
//! publishes each finished scene as an immutable `Arc<Scene>`.

use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use hextactics_core::{
    ClickOutcome, EventQueue, GameConfig, GamePhase, GameState, GridError, Hex, HexGrid,
    InputEvent, RegionGenerator, RegionMap, Scene, SceneOptions, TunnelGenerator,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashSet;
use serde::Serialize;
use tokio::sync::mpsc;

/// Everything the tick mutates
struct World {
    game: GameState,
    tunnel: Option<FxHashSet<Hex>>,
    paused: bool,
    tick: u64,
    rng: ChaCha8Rng,
}

impl World {
    fn scene(&self, config: &GameConfig) -> Scene {
        Scene::capture(
            &self.game,
            config.width,
            config.height,
            SceneOptions {
                tunnel: self.tunnel.as_ref(),
                debug_paths: config.debug_paths,
            },
        )
    }
}

/// Result of one tick
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub events: usize,
    pub clicks: usize,
    pub completed_moves: usize,
}

/// Status summary for the status endpoint
#[derive(Clone, Debug, Serialize)]
pub struct WorldStatus {
    pub tick: u64,
    pub phase: GamePhase,
    pub paused: bool,
    pub in_flight: usize,
    pub selected: Option<Hex>,
}

/// Server-wide shared state
pub struct ServerState {
    config: GameConfig,
    world: Mutex<World>,
    scene: RwLock<Arc<Scene>>,
    events_tx: mpsc::UnboundedSender<InputEvent>,
    events_rx: Mutex<mpsc::UnboundedReceiver<InputEvent>>,
}

impl ServerState {
    /// Build the initial world from configuration and partition it into regions
    pub fn new(config: GameConfig) -> anyhow::Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let mut game = config.build_state()?;
        let regions = config.region_generator().generate(game.grid_mut(), &mut rng)?;
        tracing::info!(
            rows = config.rows,
            columns = config.columns,
            regions = regions.region_count(),
            units = game.placement().len(),
            "world created"
        );

        let world = World {
            game,
            tunnel: None,
            paused: false,
            tick: 0,
            rng,
        };
        let scene = Arc::new(world.scene(&config));
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            config,
            world: Mutex::new(world),
            scene: RwLock::new(scene),
            events_tx,
            events_rx: Mutex::new(events_rx),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn world(&self) -> MutexGuard<'_, World> {
        self.world.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, world: &World) {
        let scene = Arc::new(world.scene(&self.config));
        let mut slot = self.scene.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = scene;
    }

    // ========================================================================
    // INPUT & TICK
    // ========================================================================

    /// Queue an event for the next tick
    pub fn submit(&self, event: InputEvent) -> bool {
        self.events_tx.send(event).is_ok()
    }

    /// Drain input, advance animations (unless paused) and publish a scene
    pub fn tick(&self) -> TickReport {
        let mut queue = EventQueue::new();
        {
            let mut rx = self.events_rx.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            while let Ok(event) = rx.try_recv() {
                queue.push(event);
            }
        }

        let mut world = self.world();
        world.tick += 1;

        let mut report = TickReport {
            tick: world.tick,
            events: queue.len(),
            ..Default::default()
        };

        for event in queue.drain() {
            if world.game.process_event(event) != ClickOutcome::Ignored {
                report.clicks += 1;
            }
        }

        if !world.paused {
            report.completed_moves = world.game.update();
        }

        self.publish(&world);
        report
    }

    /// Latest published scene
    pub fn scene(&self) -> Arc<Scene> {
        let slot = self.scene.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&slot)
    }

    pub fn status(&self) -> WorldStatus {
        let world = self.world();
        WorldStatus {
            tick: world.tick,
            phase: world.game.phase(),
            paused: world.paused,
            in_flight: world.game.animations().len(),
            selected: world.game.selected(),
        }
    }

    pub fn set_paused(&self, paused: bool) {
        let mut world = self.world();
        world.paused = paused;
        tracing::info!(paused, "tick loop pause state changed");
    }

    /// Run a read-only query against the current game
    pub fn with_game<T>(&self, f: impl FnOnce(&GameState) -> T) -> T {
        let world = self.world();
        f(&world.game)
    }

    // ========================================================================
    // GENERATORS
    // ========================================================================

    /// Re-partition the grid. A seed makes the result reproducible.
    pub fn regenerate_regions(&self, count: usize, seed: Option<u64>) -> Result<RegionMap, GridError> {
        let mut world = self.world();
        let World { game, rng, .. } = &mut *world;

        let map = match seed {
            Some(seed) => RegionGenerator::new(count)
                .generate(game.grid_mut(), &mut ChaCha8Rng::seed_from_u64(seed))?,
            None => RegionGenerator::new(count).generate(game.grid_mut(), rng)?,
        };

        self.publish(&world);
        Ok(map)
    }

    /// Snapshot what tunnel carving needs so it can run without the world lock
    pub fn prepare_tunnel(
        &self,
        size: usize,
        failure_ceiling: u32,
        seed: Option<u64>,
    ) -> Result<TunnelJob, GridError> {
        let generator = TunnelGenerator::new(size).with_failure_ceiling(failure_ceiling);
        let mut world = self.world();
        generator.validate(world.game.grid())?;

        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::seed_from_u64(world.rng.gen()),
        };
        Ok(TunnelJob {
            grid: world.game.grid().clone(),
            generator,
            rng,
        })
    }

    /// Show a carved tunnel in the scene; returns its cells in order
    pub fn install_tunnel(&self, tunnel: FxHashSet<Hex>) -> Vec<Hex> {
        let mut cells: Vec<Hex> = tunnel.iter().copied().collect();
        cells.sort();

        let mut world = self.world();
        world.tunnel = Some(tunnel);
        self.publish(&world);
        cells
    }
}

/// Tunnel carving detached from the shared world
pub struct TunnelJob {
    grid: HexGrid,
    generator: TunnelGenerator,
    rng: ChaCha8Rng,
}

impl TunnelJob {
    /// Runs to completion; may take a while on large grids
    pub fn run(mut self) -> Result<FxHashSet<Hex>, GridError> {
        self.generator.generate(&self.grid, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hextactics_core::DrawDirective;

    fn state() -> ServerState {
        ServerState::new(GameConfig {
            seed: Some(3),
            animation_steps: 2,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_tick_processes_queued_click() {
        let state = state();
        let point = state.with_game(|g| g.grid().cell_at(0, 0).unwrap().center());
        assert!(state.submit(InputEvent::primary_down(point)));

        let report = state.tick();
        assert_eq!(report.events, 1);
        assert_eq!(report.clicks, 1);
        assert_eq!(state.status().selected, Some(Hex::new(0, 0)));
    }

    #[test]
    fn test_paused_tick_does_not_advance_animations() {
        let state = state();
        let from = state.with_game(|g| g.grid().cell_at(0, 0).unwrap().center());
        let to = state.with_game(|g| g.grid().cell_at(0, 1).unwrap().center());
        state.submit(InputEvent::primary_down(from));
        state.submit(InputEvent::primary_down(to));

        state.set_paused(true);
        state.tick();
        state.tick();
        assert_eq!(state.status().in_flight, 1);

        state.set_paused(false);
        state.tick();
        let report = state.tick();
        assert_eq!(report.completed_moves, 1);
        assert_eq!(state.status().phase, GamePhase::PlayerMove);
    }

    #[test]
    fn test_tunnel_job_runs_without_world_lock() {
        let state = state();
        let job = state.prepare_tunnel(5, 1000, Some(8)).unwrap();

        // The world stays usable while the job is outstanding
        let report = state.tick();
        assert_eq!(report.tick, 1);

        let tunnel = job.run().unwrap();
        let cells = state.install_tunnel(tunnel);
        assert_eq!(cells.len(), 5);

        let scene = state.scene();
        let outlined = scene
            .directives
            .iter()
            .filter(|d| matches!(d, DrawDirective::Polygon { outline, .. } if *outline == hextactics_core::Color::TUNNEL))
            .count();
        assert_eq!(outlined, 5);
    }

    #[test]
    fn test_prepare_tunnel_rejects_low_ceiling() {
        let state = state();
        assert!(matches!(
            state.prepare_tunnel(25, 1, None),
            Err(GridError::InvalidFailureCeiling { requested: 1, minimum: 25 })
        ));
        assert!(matches!(
            state.prepare_tunnel(26, 1000, None),
            Err(GridError::InvalidTunnelSize { .. })
        ));
    }

    #[test]
    fn test_regenerate_regions_rejects_bad_count() {
        let state = state();
        assert!(state.regenerate_regions(0, None).is_err());
        let map = state.regenerate_regions(2, Some(1)).unwrap();
        assert_eq!(map.region_count(), 2);
    }
}
