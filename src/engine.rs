//! Game engine: owns the row stack, score and scroll speed, and runs the
//! `Welcome -> Playing -> GameOver` state machine.
//!
//! The engine never draws. A host calls [`GameEngine::tick`] once per displayed
//! frame and [`GameEngine::handle_click`] for every pointer click (canvas-local
//! pixels), then paints [`GameEngine::snapshot`]. Both entry points take
//! `&mut self` and finish their update before returning, so the stack, score,
//! speed and phase always change together.

use crate::board::{ColumnPicker, RandomColumns, RowFactory, RowStack};
use crate::config::GameConfig;
use crate::error::{ConfigError, GameError, InvalidClick};
use crate::snapshot::{FrameSnapshot, RowSnapshot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum GamePhase {
    /// Stack prepared and painted, waiting for the first click.
    Welcome,
    Playing,
    /// Terminal until `start` / `restart`.
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MissCause {
    /// Clicked a tile of the frontier row that was not active.
    WrongTile,
    /// The frontier row reached the strike line with tiles left.
    Overrun,
}

/// How a run ended; the renderer paints `columns` of row `row_id` in the
/// error color.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Miss {
    pub row_id: u64,
    pub columns: Vec<usize>,
    pub cause: MissCause,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit {
    pub row_id: u64,
    pub column: usize,
    pub row_complete: bool,
    /// Id of the row spawned because this hit completed its row.
    pub spawned: Option<u64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClickOutcome {
    Ignored(InvalidClick),
    Hit(Hit),
    Missed(Miss),
}

#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// Not playing; nothing moved.
    Idle,
    Advanced,
    Missed(Miss),
}

pub struct GameEngine<P = RandomColumns> {
    config: GameConfig,
    factory: RowFactory<P>,
    stack: RowStack,
    score: u32,
    speed: f64,
    phase: GamePhase,
    miss: Option<Miss>,
    running: bool, // host should keep requesting frames
}

impl GameEngine<RandomColumns> {
    /// Engine with rows drawn from an entropy-seeded generator.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let picker = RandomColumns::from_entropy()?;
        Ok(Self::with_picker(config, picker)?)
    }

    /// Engine with a reproducible row sequence.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_picker(config, RandomColumns::from_seed(seed))
    }
}

impl<P: ColumnPicker> GameEngine<P> {
    pub fn with_picker(config: GameConfig, picker: P) -> Result<Self, ConfigError> {
        if let Err(err) = config.validate() {
            log::warn!("refusing game config: {err}");
            return Err(err);
        }
        let speed = config.initial_speed;
        let mut engine = Self {
            config,
            factory: RowFactory::new(picker),
            stack: RowStack::new(),
            score: 0,
            speed,
            phase: GamePhase::Welcome,
            miss: None,
            running: false,
        };
        engine.reset();
        Ok(engine)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
    pub fn phase(&self) -> GamePhase {
        self.phase
    }
    pub fn score(&self) -> u32 {
        self.score
    }
    pub fn speed(&self) -> f64 {
        self.speed
    }
    pub fn stack(&self) -> &RowStack {
        &self.stack
    }
    pub fn miss(&self) -> Option<&Miss> {
        self.miss.as_ref()
    }

    /// Whether the host should keep its frame loop alive.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Fresh session and start scrolling right away.
    pub fn start(&mut self) {
        self.reset();
        self.begin();
    }

    /// Fresh session, armed: the next click on the canvas starts play.
    pub fn restart(&mut self) {
        self.reset();
        self.phase = GamePhase::Welcome;
        self.running = false;
    }

    /// End the frame loop. A running game becomes `GameOver`. Returns `true`
    /// only for the call that actually stopped a running loop; repeated calls
    /// are no-ops, so a host cancels its pending frame exactly once.
    pub fn stop(&mut self) -> bool {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::GameOver;
        }
        let was_running = self.running;
        self.running = false;
        if was_running {
            log::debug!("frame loop stopped");
        }
        was_running
    }

    /// Advance one displayed frame.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != GamePhase::Playing {
            return TickOutcome::Idle;
        }
        self.stack.advance_all(self.speed);

        let strike_y = self.config.strike_y();
        let overrun = self
            .stack
            .frontier()
            .filter(|row| row.has_crossed_boundary(strike_y))
            .map(|row| Miss {
                row_id: row.id(),
                columns: row.active_columns().iter().copied().collect(),
                cause: MissCause::Overrun,
            });
        if let Some(miss) = overrun {
            self.end_run(miss.clone());
            return TickOutcome::Missed(miss);
        }

        let pruned = self.stack.prune_below(self.config.canvas_height);
        if pruned > 0 {
            log::trace!("pruned {pruned} rows below the canvas");
        }
        TickOutcome::Advanced
    }

    /// Resolve a click at canvas-local pixel `(x, y)`.
    pub fn handle_click(&mut self, x: f64, y: f64) -> ClickOutcome {
        if self.phase == GamePhase::GameOver {
            return ClickOutcome::Ignored(InvalidClick::NotAccepting);
        }
        if !self.in_bounds(x, y) {
            return ClickOutcome::Ignored(InvalidClick::OutOfBounds { x, y });
        }
        if self.phase == GamePhase::Welcome {
            log::info!("first click, starting play");
            self.begin();
        }

        let column = self.column_at(x);
        let Some(row) = self.stack.frontier_mut() else {
            return ClickOutcome::Ignored(InvalidClick::NoFrontier);
        };
        if !row.spans(y) {
            return ClickOutcome::Ignored(InvalidClick::OffFrontier);
        }
        let row_id = row.id();

        let Ok(row_complete) = row.resolve_column(column) else {
            let miss = Miss {
                row_id,
                columns: vec![column],
                cause: MissCause::WrongTile,
            };
            self.end_run(miss.clone());
            return ClickOutcome::Missed(miss);
        };

        self.score += 1;
        // The ramp looks at rows created before this hit spawns another one.
        let increment = self.config.speed_increment(self.stack.created());
        self.speed += increment;
        log::trace!("score {} speed {:.2}", self.score, self.speed);

        let spawned = row_complete.then(|| self.spawn_row());
        ClickOutcome::Hit(Hit {
            row_id,
            column,
            row_complete,
            spawned,
        })
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            phase: self.phase,
            score: self.score,
            speed: self.speed,
            canvas_width: self.config.canvas_width,
            canvas_height: self.config.canvas_height,
            col_count: self.config.col_count,
            tile_width: self.config.tile_width(),
            rows: self.stack.iter().map(RowSnapshot::from).collect(),
            miss: self.miss.clone(),
        }
    }

    fn reset(&mut self) {
        self.score = 0;
        self.speed = self.config.initial_speed;
        self.miss = None;
        self.stack.clear();
        for _ in 0..self.config.row_count {
            self.spawn_row();
        }
        // Pull the stack back so it scrolls in from above on the first frames.
        let steps = (self.config.warmup_distance / self.speed).ceil() as usize;
        for _ in 0..steps {
            self.stack.retreat_all(self.speed);
        }
        log::info!(
            "new session: {} rows, speed {}, warm-up {} steps",
            self.stack.len(),
            self.speed,
            steps
        );
    }

    fn begin(&mut self) {
        self.phase = GamePhase::Playing;
        self.running = true;
    }

    fn end_run(&mut self, miss: Miss) {
        log::info!(
            "game over ({:?}) on row {} with score {}",
            miss.cause,
            miss.row_id,
            self.score
        );
        self.miss = Some(miss);
        self.stop();
    }

    fn spawn_row(&mut self) -> u64 {
        let row = self.factory.create_row(&self.stack, &self.config);
        let id = row.id();
        log::debug!(
            "row {id} at y={:.1} tiles {:?}",
            row.vertical_position(),
            row.active_columns()
        );
        self.stack.push(row);
        id
    }

    fn in_bounds(&self, x: f64, y: f64) -> bool {
        (0.0..self.config.canvas_width).contains(&x)
            && (0.0..self.config.canvas_height).contains(&y)
    }

    fn column_at(&self, x: f64) -> usize {
        let col = (x / self.config.tile_width()).floor() as usize;
        col.min(self.config.col_count - 1)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, VecDeque};

    use super::*;

    /// Replays fixed column sets, then falls back to column 0.
    struct Scripted(VecDeque<Vec<usize>>);

    impl ColumnPicker for Scripted {
        fn pick(&mut self, _config: &GameConfig) -> BTreeSet<usize> {
            self.0.pop_front().unwrap_or_else(|| vec![0]).into_iter().collect()
        }
    }

    fn config() -> GameConfig {
        GameConfig {
            canvas_width: 400.0,
            canvas_height: 800.0,
            row_count: 4,
            col_count: 4,
            initial_speed: 2.0,
            black_tile_count: 2,
            multi_tile_probability: 0.0,
            ..GameConfig::default()
        }
    }

    fn engine(rows: &[&[usize]]) -> GameEngine<Scripted> {
        let script = rows.iter().map(|r| r.to_vec()).collect();
        GameEngine::with_picker(config(), Scripted(script)).expect("valid config")
    }

    fn frontier_mid_y(engine: &GameEngine<Scripted>) -> f64 {
        let row = engine.stack().frontier().expect("frontier");
        row.vertical_position() + row.height() / 2.0
    }

    #[test]
    fn construction_prepares_warmed_stack() {
        let e = engine(&[]);
        assert_eq!(e.phase(), GamePhase::Welcome);
        assert_eq!(e.stack().len(), 4);
        // 400px warm-up at speed 2 is 200 retreats of 2px.
        let first = e.stack().rows()[0].vertical_position();
        assert!((first - 400.0).abs() < 1e-9);
        assert!(e.stack().is_contiguous());
        assert!(!e.is_running());
    }

    #[test]
    fn ticks_are_idle_before_start() {
        let mut e = engine(&[]);
        let before = e.stack().rows()[0].vertical_position();
        assert_eq!(e.tick(), TickOutcome::Idle);
        assert!((e.stack().rows()[0].vertical_position() - before).abs() < 1e-12);
    }

    #[test]
    fn first_click_starts_play() {
        let mut e = engine(&[&[1]]);
        let y = frontier_mid_y(&e);
        let outcome = e.handle_click(150.0, y);
        assert!(matches!(outcome, ClickOutcome::Hit(_)));
        assert_eq!(e.phase(), GamePhase::Playing);
        assert!(e.is_running());
    }

    #[test]
    fn out_of_bounds_click_changes_nothing() {
        let mut e = engine(&[&[1]]);
        for (x, y) in [(-1.0, 10.0), (400.0, 10.0), (10.0, 800.0), (f64::NAN, 1.0)] {
            assert!(matches!(
                e.handle_click(x, y),
                ClickOutcome::Ignored(InvalidClick::OutOfBounds { .. })
            ));
        }
        assert_eq!(e.phase(), GamePhase::Welcome);
        assert_eq!(e.score(), 0);
    }

    #[test]
    fn clicks_off_the_frontier_are_ignored() {
        let mut e = engine(&[&[1], &[2]]);
        // Second row sits directly above the frontier.
        let y = frontier_mid_y(&e) - 200.0;
        assert_eq!(
            e.handle_click(250.0, y),
            ClickOutcome::Ignored(InvalidClick::OffFrontier)
        );
        assert_eq!(e.score(), 0);
        assert_eq!(e.phase(), GamePhase::Playing);
    }

    #[test]
    fn completing_a_row_spawns_the_next() {
        let mut e = engine(&[&[0]]);
        let y = frontier_mid_y(&e);
        let ClickOutcome::Hit(hit) = e.handle_click(10.0, y) else {
            panic!("expected a hit");
        };
        assert!(hit.row_complete);
        assert_eq!(hit.spawned, Some(4));
        assert_eq!(e.stack().len(), 5);
        assert_eq!(e.stack().created(), 5);
        assert!(e.stack().is_contiguous());
        assert_eq!(e.stack().frontier().map(|r| r.id()), Some(1));
    }

    #[test]
    fn speed_ramp_slows_after_threshold() {
        let mut e = engine(&[]);
        let y = frontier_mid_y(&e);
        e.handle_click(10.0, y);
        assert!((e.speed() - 2.1).abs() < 1e-9);

        let mut cfg = config();
        cfg.speed_ramp_threshold_rows = 4;
        let mut fast = GameEngine::with_picker(cfg, Scripted(VecDeque::new())).expect("valid");
        let y = frontier_mid_y(&fast);
        fast.handle_click(10.0, y);
        assert!((fast.speed() - 2.05).abs() < 1e-9);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut e = engine(&[]);
        e.start();
        assert!(e.stop());
        assert_eq!(e.phase(), GamePhase::GameOver);
        assert!(!e.stop());
        assert_eq!(e.tick(), TickOutcome::Idle);
    }

    #[test]
    fn game_over_rejects_clicks() {
        let mut e = engine(&[&[3]]);
        let y = frontier_mid_y(&e);
        assert!(matches!(e.handle_click(10.0, y), ClickOutcome::Missed(_)));
        assert_eq!(
            e.handle_click(350.0, y),
            ClickOutcome::Ignored(InvalidClick::NotAccepting)
        );
        assert_eq!(e.score(), 0);
    }

    #[test]
    fn overrun_marks_remaining_tiles() {
        let mut e = engine(&[&[1, 2]]);
        let y = frontier_mid_y(&e);
        e.handle_click(150.0, y);
        let miss = loop {
            if let TickOutcome::Missed(miss) = e.tick() {
                break miss;
            }
        };
        assert_eq!(miss.cause, MissCause::Overrun);
        assert_eq!(miss.columns, vec![2]);
        assert_eq!(e.snapshot().error_columns(miss.row_id), &[2]);
    }

    #[test]
    fn snapshot_mirrors_stack() {
        let e = engine(&[&[0, 3], &[1]]);
        let frame = e.snapshot();
        assert_eq!(frame.rows.len(), 4);
        assert_eq!(frame.rows[0].active, vec![0, 3]);
        assert_eq!(frame.rows[1].active, vec![1]);
        assert!((frame.tile_width - 100.0).abs() < 1e-9);
        assert!(frame.miss.is_none());
    }
}
