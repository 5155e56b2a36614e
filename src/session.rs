//! Game controller.
//!
//! A [`PuzzleSession`] owns one puzzle at a time: the source image, the
//! tile set, the render adapter and the shuffle randomness. The host drives
//! it from its event callbacks; everything happens synchronously inside
//! those calls.
//!
//! ```text
//! Idle ──load_image──▶ Configuring ──start──▶ Playing ──(click, solved)──▶ Solved
//!   ▲                      ▲                                                 │
//!   └──────reset───────────┴──────────────────play_again─────────────────────┘
//! ```

use log::{debug, info, warn};
use serde::Serialize;

use crate::error::PuzzleError;
use crate::geometry::{Geometry, PuzzleConfig};
use crate::moves::{move_tile, tile_at};
use crate::render::{draw_puzzle, draw_source, RenderAdapter, SourceImage};
use crate::rng::{IndexSource, WasmRng};
use crate::shuffle::shuffle;
use crate::tiles::TileSet;
use crate::types::Point;
use crate::win::is_solved;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GameState {
    /// No image yet.
    #[default]
    Idle,
    /// Image loaded and shown whole; tiles initialized but not shuffled.
    Configuring,
    Playing,
    Solved,
}

/// What a click did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// No puzzle in play, or an image load is in flight.
    Ignored,
    /// The puzzle is solved; the host should offer another round.
    PlayAgain,
    /// The point is outside every tile.
    Missed,
    /// The tile under the point is not next to the empty slot.
    Rejected,
    /// The tile moved into the empty slot.
    Moved { solved: bool },
}

/// Identifies one image load. Only the most recently issued ticket is
/// honoured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u32);

impl LoadTicket {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The image replaced the current puzzle.
    Loaded,
    /// A newer load was started (or the session reset); result dropped.
    Stale,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSnapshot {
    pub home: Point,
    pub current: Point,
    pub empty: bool,
}

/// Everything a host needs to draw or inspect the board.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleSnapshot {
    pub state: GameState,
    pub loading: bool,
    pub solved: bool,
    pub cols: u32,
    pub rows: u32,
    pub tile_width: f64,
    pub tile_height: f64,
    pub tiles: Vec<TileSnapshot>,
}

pub struct PuzzleSession<R: RenderAdapter, S = WasmRng> {
    config: PuzzleConfig,
    renderer: R,
    source: S,
    image: Option<SourceImage<R::Image>>,
    tiles: Option<TileSet>,
    state: GameState,
    load_generation: u32,
    pending_load: Option<LoadTicket>,
}

impl<R: RenderAdapter> PuzzleSession<R> {
    /// Session shuffling with entropy from the OS / browser.
    pub fn new(config: PuzzleConfig, renderer: R) -> Self {
        Self::with_source(config, renderer, WasmRng::new())
    }
}

impl<R: RenderAdapter, S: IndexSource> PuzzleSession<R, S> {
    pub fn with_source(config: PuzzleConfig, renderer: R, source: S) -> Self {
        Self {
            config,
            renderer,
            source,
            image: None,
            tiles: None,
            state: GameState::Idle,
            load_generation: 0,
            pending_load: None,
        }
    }

    pub const fn state(&self) -> GameState {
        self.state
    }

    pub const fn tiles(&self) -> Option<&TileSet> {
        self.tiles.as_ref()
    }

    pub const fn image(&self) -> Option<&SourceImage<R::Image>> {
        self.image.as_ref()
    }

    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// True while clicks are gated on an image load.
    pub const fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    /// All tiles home. False when there is no puzzle.
    pub fn is_solved(&self) -> bool {
        self.tiles.as_ref().is_some_and(is_solved)
    }

    /// Takes a decoded image: validates its geometry, lays out unshuffled
    /// tiles and shows the whole picture. On error nothing changes.
    pub fn load_image(&mut self, image: SourceImage<R::Image>) -> Result<(), PuzzleError> {
        let geometry = Geometry::new(&self.config, image.width, image.height)?;
        info!(
            "image loaded: {}x{}, tiles {}x{}",
            image.width,
            image.height,
            geometry.tile_width(),
            geometry.tile_height()
        );
        self.tiles = Some(TileSet::initialize(geometry));
        self.image = Some(image);
        self.state = GameState::Configuring;
        self.redraw();
        Ok(())
    }

    /// Shuffles the configured tiles and starts play.
    pub fn start(&mut self) -> Result<(), PuzzleError> {
        if self.state != GameState::Configuring {
            return Err(PuzzleError::InvalidState {
                action: "start",
                state: self.state,
            });
        }
        let tiles = self.tiles.as_mut().ok_or(PuzzleError::NoImage)?;
        shuffle(tiles, self.config.shuffle, &mut self.source);
        self.state = GameState::Playing;
        info!("puzzle started");
        self.redraw();
        Ok(())
    }

    /// Loads `image` and starts a shuffled puzzle from it. Any image load
    /// still in flight is abandoned.
    pub fn start_new_puzzle(&mut self, image: SourceImage<R::Image>) -> Result<(), PuzzleError> {
        self.load_image(image)?;
        self.abandon_pending_load();
        self.start()
    }

    /// Gates clicks until [`PuzzleSession::finish_image_load`] is called with
    /// the returned ticket. Issuing a new ticket makes older ones stale.
    pub fn begin_image_load(&mut self) -> LoadTicket {
        self.load_generation = self.load_generation.wrapping_add(1);
        let ticket = LoadTicket(self.load_generation);
        self.pending_load = Some(ticket);
        debug!("image load {} started", ticket.get());
        ticket
    }

    /// Completes the load identified by `ticket`.
    ///
    /// Stale tickets are ignored. A failed load leaves the puzzle as it was
    /// and reports [`PuzzleError::ImageLoad`].
    pub fn finish_image_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<SourceImage<R::Image>, String>,
    ) -> Result<LoadOutcome, PuzzleError> {
        if self.pending_load != Some(ticket) {
            debug!("image load {} is stale, dropping", ticket.get());
            return Ok(LoadOutcome::Stale);
        }
        self.pending_load = None;
        match result {
            Ok(image) => {
                self.load_image(image)?;
                Ok(LoadOutcome::Loaded)
            }
            Err(reason) => {
                warn!("image load {} failed: {}", ticket.get(), reason);
                Err(PuzzleError::ImageLoad(reason))
            }
        }
    }

    /// Handles a click at a drawing-surface coordinate.
    pub fn handle_click(&mut self, point: Point) -> ClickOutcome {
        if self.is_loading() {
            return ClickOutcome::Ignored;
        }
        match self.state {
            GameState::Idle | GameState::Configuring => return ClickOutcome::Ignored,
            GameState::Solved => return ClickOutcome::PlayAgain,
            GameState::Playing => {}
        }
        let Some(tiles) = self.tiles.as_mut() else {
            return ClickOutcome::Ignored;
        };
        if is_solved(tiles) {
            self.state = GameState::Solved;
            info!("puzzle solved");
            return ClickOutcome::PlayAgain;
        }

        let Some(index) = tile_at(tiles, point) else {
            return ClickOutcome::Missed;
        };
        if move_tile(tiles, index).is_err() {
            return ClickOutcome::Rejected;
        }
        let solved = is_solved(tiles);
        self.redraw();
        ClickOutcome::Moved { solved }
    }

    /// Starts over with the same image, unshuffled.
    pub fn play_again(&mut self) -> Result<(), PuzzleError> {
        let image = self.image.as_ref().ok_or(PuzzleError::NoImage)?;
        let geometry = Geometry::new(&self.config, image.width, image.height)?;
        self.tiles = Some(TileSet::initialize(geometry));
        self.state = GameState::Configuring;
        info!("play again");
        self.redraw();
        Ok(())
    }

    /// Drops the image and puzzle and clears the surface.
    pub fn reset(&mut self) {
        self.abandon_pending_load();
        self.image = None;
        self.tiles = None;
        self.state = GameState::Idle;
        self.renderer.clear();
        info!("session reset");
    }

    /// Repaints the surface for the current state.
    pub fn redraw(&mut self) {
        let Some(image) = self.image.as_ref() else {
            self.renderer.clear();
            return;
        };
        match (self.state, self.tiles.as_ref()) {
            (GameState::Playing | GameState::Solved, Some(tiles)) => {
                draw_puzzle(&mut self.renderer, image, tiles)
            }
            _ => draw_source(&mut self.renderer, image),
        }
    }

    pub fn snapshot(&self) -> PuzzleSnapshot {
        let mut snap = PuzzleSnapshot {
            state: self.state,
            loading: self.is_loading(),
            solved: self.is_solved(),
            cols: self.config.cols,
            rows: self.config.rows,
            tile_width: 0.0,
            tile_height: 0.0,
            tiles: Vec::new(),
        };
        if let Some(tiles) = &self.tiles {
            let g = tiles.geometry();
            snap.tile_width = g.tile_width();
            snap.tile_height = g.tile_height();
            snap.tiles = tiles
                .tiles()
                .iter()
                .enumerate()
                .map(|(i, t)| TileSnapshot {
                    home: tiles.home_offset(t),
                    current: tiles.current_offset(t),
                    empty: tiles.is_empty_slot(i),
                })
                .collect();
        }
        snap
    }

    fn abandon_pending_load(&mut self) {
        if let Some(ticket) = self.pending_load.take() {
            debug!("image load {} abandoned", ticket.get());
        }
        // Bump so a ticket handed out before this point can never match again.
        self.load_generation = self.load_generation.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{DrawCall, RecordingRenderer};
    use crate::shuffle::testing::ScriptedIndices;
    use crate::types::{Color, GridPos, Rect};

    type TestSession = PuzzleSession<RecordingRenderer, ScriptedIndices>;

    fn session(draws: Vec<usize>) -> TestSession {
        PuzzleSession::with_source(
            PuzzleConfig::default(),
            RecordingRenderer::default(),
            ScriptedIndices::new(draws),
        )
    }

    fn image_400() -> SourceImage<()> {
        SourceImage::new(400, 400, ())
    }

    fn current_of_home(s: &TestSession, col: u32, row: u32) -> GridPos {
        s.tiles()
            .unwrap()
            .tiles()
            .iter()
            .find(|t| t.home() == GridPos::new(col, row))
            .unwrap()
            .current
    }

    /// All-zero draws deal home k+1 into cell k and the hole into (3, 3).
    fn rotated_session() -> TestSession {
        let mut s = session(vec![0; 15]);
        s.start_new_puzzle(image_400()).unwrap();
        s
    }

    #[test]
    fn test_initialized_puzzle_is_solved_before_shuffle() {
        let mut s = session(vec![]);
        s.load_image(image_400()).unwrap();
        assert_eq!(s.state(), GameState::Configuring);
        let g = s.tiles().unwrap().geometry();
        assert_eq!((g.tile_width(), g.tile_height()), (100., 100.));
        assert!(s.is_solved());
        // Whole image shown while configuring.
        assert_eq!(s.renderer().last_frame().len(), 2);
    }

    #[test]
    fn test_clicks_ignored_before_start() {
        let mut s = session(vec![]);
        assert_eq!(s.handle_click(Point::new(150., 150.)), ClickOutcome::Ignored);
        s.load_image(image_400()).unwrap();
        assert_eq!(s.handle_click(Point::new(150., 150.)), ClickOutcome::Ignored);
        assert!(s.tiles().unwrap().tiles().iter().all(|t| t.is_home()));
    }

    #[test]
    fn test_start_requires_configuring() {
        let mut s = session(vec![]);
        assert_eq!(
            s.start(),
            Err(PuzzleError::InvalidState {
                action: "start",
                state: GameState::Idle
            })
        );
    }

    #[test]
    fn test_oversized_grid_from_options_rejected() {
        let config: PuzzleConfig = serde_json::from_str(r#"{"rows": 70000, "cols": 70000}"#).unwrap();
        let mut s: TestSession =
            PuzzleSession::with_source(config, RecordingRenderer::default(), ScriptedIndices::new(vec![]));
        assert_eq!(
            s.load_image(image_400()),
            Err(PuzzleError::InvalidGrid { cols: 70_000, rows: 70_000 })
        );
        assert_eq!(s.state(), GameState::Idle);
        assert!(s.tiles().is_none());
        assert_eq!(
            s.start_new_puzzle(image_400()),
            Err(PuzzleError::InvalidGrid { cols: 70_000, rows: 70_000 })
        );
    }

    #[test]
    fn test_degenerate_image_leaves_state_unchanged() {
        let mut s = rotated_session();
        let before = s.tiles().unwrap().tiles().to_vec();
        assert_eq!(
            s.load_image(SourceImage::new(0, 400, ())),
            Err(PuzzleError::DegenerateImage { width: 0, height: 400 })
        );
        assert_eq!(s.state(), GameState::Playing);
        assert_eq!(s.tiles().unwrap().tiles(), &before[..]);
    }

    #[test]
    fn test_click_adjacent_tile_swaps_with_hole() {
        let mut s = session(vec![]);
        s.load_image(image_400()).unwrap();
        s.start().unwrap();
        // Scripted draws are clamped to the bound; with an empty script every
        // draw is 0, giving the rotated deal. Walk the hole from (3, 3) to (1, 0).
        for p in [(250., 350.), (150., 350.), (150., 250.), (150., 150.), (150., 50.)] {
            assert!(matches!(
                s.handle_click(Point::new(p.0, p.1)),
                ClickOutcome::Moved { .. }
            ));
        }
        assert_eq!(current_of_home(&s, 0, 0), GridPos::new(1, 0));

        let below = s.tiles().unwrap().tiles()[tile_at(s.tiles().unwrap(), Point::new(150., 150.)).unwrap()];
        let outcome = s.handle_click(Point::new(150., 150.));
        assert_eq!(outcome, ClickOutcome::Moved { solved: false });
        assert_eq!(current_of_home(&s, 0, 0), GridPos::new(1, 1));
        assert_eq!(
            current_of_home(&s, below.home().col, below.home().row),
            GridPos::new(1, 0)
        );
    }

    #[test]
    fn test_click_outside_changes_nothing() {
        let mut s = rotated_session();
        let before = s.tiles().unwrap().tiles().to_vec();
        let frames = s.renderer().calls.len();
        assert_eq!(s.handle_click(Point::new(5000., 5000.)), ClickOutcome::Missed);
        assert_eq!(s.tiles().unwrap().tiles(), &before[..]);
        assert_eq!(s.renderer().calls.len(), frames);
    }

    #[test]
    fn test_click_non_adjacent_rejected() {
        let mut s = rotated_session();
        let before = s.tiles().unwrap().tiles().to_vec();
        assert_eq!(s.handle_click(Point::new(50., 50.)), ClickOutcome::Rejected);
        // The hole itself is not movable either.
        assert_eq!(s.handle_click(Point::new(350., 350.)), ClickOutcome::Rejected);
        assert_eq!(s.tiles().unwrap().tiles(), &before[..]);
    }

    #[test]
    fn test_every_move_redraws() {
        let mut s = rotated_session();
        let clears_before = s
            .renderer()
            .calls
            .iter()
            .filter(|c| **c == DrawCall::Clear)
            .count();
        s.handle_click(Point::new(250., 350.));
        let frame = s.renderer().last_frame();
        let clears_after = s
            .renderer()
            .calls
            .iter()
            .filter(|c| **c == DrawCall::Clear)
            .count();
        assert_eq!(clears_after, clears_before + 1);
        assert_eq!(frame.len(), 33);
        assert!(frame.contains(&DrawCall::Fill {
            dst: Rect::new(200., 300., 100., 100.),
            color: Color::WHITE
        }));
    }

    #[test]
    fn test_solving_move_then_play_again() {
        // Classic bound with draws that only swap the hole with tile (1, 0):
        // i = 15..2 draw i (no-op), i = 1 draws 0.
        let mut draws: Vec<usize> = (2..16).rev().collect();
        draws.push(0);
        let mut s = PuzzleSession::with_source(
            PuzzleConfig {
                shuffle: crate::geometry::ShuffleBound::Classic,
                ..PuzzleConfig::default()
            },
            RecordingRenderer::default(),
            ScriptedIndices::new(draws),
        );
        s.start_new_puzzle(image_400()).unwrap();
        assert_eq!(current_of_home(&s, 0, 0), GridPos::new(1, 0));
        assert!(!s.is_solved());

        assert_eq!(
            s.handle_click(Point::new(50., 50.)),
            ClickOutcome::Moved { solved: true }
        );
        assert!(s.is_solved());
        assert_eq!(s.state(), GameState::Playing);

        // The next click notices the win before looking for a tile.
        assert_eq!(s.handle_click(Point::new(150., 50.)), ClickOutcome::PlayAgain);
        assert_eq!(s.state(), GameState::Solved);
        assert_eq!(s.handle_click(Point::new(150., 50.)), ClickOutcome::PlayAgain);

        s.play_again().unwrap();
        assert_eq!(s.state(), GameState::Configuring);
        assert!(s.is_solved());
    }

    #[test]
    fn test_clicks_gated_while_loading() {
        let mut s = rotated_session();
        let ticket = s.begin_image_load();
        assert!(s.is_loading());
        assert_eq!(s.handle_click(Point::new(250., 350.)), ClickOutcome::Ignored);
        assert_eq!(
            s.finish_image_load(ticket, Ok(SourceImage::new(800, 600, ()))),
            Ok(LoadOutcome::Loaded)
        );
        assert!(!s.is_loading());
        assert_eq!(s.state(), GameState::Configuring);
        assert_eq!(s.tiles().unwrap().geometry().tile_width(), 200.);
        assert_eq!(s.tiles().unwrap().geometry().tile_height(), 150.);
    }

    #[test]
    fn test_last_load_wins() {
        let mut s = session(vec![]);
        let first = s.begin_image_load();
        let second = s.begin_image_load();
        assert_eq!(
            s.finish_image_load(second, Ok(SourceImage::new(400, 400, ()))),
            Ok(LoadOutcome::Loaded)
        );
        assert_eq!(
            s.finish_image_load(first, Ok(SourceImage::new(800, 800, ()))),
            Ok(LoadOutcome::Stale)
        );
        assert_eq!(s.image().unwrap().width, 400);
    }

    #[test]
    fn test_failed_load_keeps_puzzle() {
        let mut s = rotated_session();
        let before = s.tiles().unwrap().tiles().to_vec();
        let ticket = s.begin_image_load();
        assert_eq!(
            s.finish_image_load(ticket, Err("decode error".into())),
            Err(PuzzleError::ImageLoad("decode error".into()))
        );
        assert!(!s.is_loading());
        assert_eq!(s.state(), GameState::Playing);
        assert_eq!(s.tiles().unwrap().tiles(), &before[..]);
        assert!(matches!(
            s.handle_click(Point::new(250., 350.)),
            ClickOutcome::Moved { .. }
        ));
    }

    #[test]
    fn test_start_new_puzzle_abandons_pending_load() {
        let mut s = session(vec![]);
        let ticket = s.begin_image_load();
        s.start_new_puzzle(image_400()).unwrap();
        assert!(!s.is_loading());
        assert_eq!(
            s.finish_image_load(ticket, Ok(SourceImage::new(800, 800, ()))),
            Ok(LoadOutcome::Stale)
        );
        assert_eq!(s.state(), GameState::Playing);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut s = rotated_session();
        let ticket = s.begin_image_load();
        s.reset();
        assert_eq!(s.state(), GameState::Idle);
        assert!(s.tiles().is_none());
        assert!(!s.is_solved());
        assert_eq!(s.renderer().calls.last(), Some(&DrawCall::Clear));
        assert_eq!(
            s.finish_image_load(ticket, Ok(image_400())),
            Ok(LoadOutcome::Stale)
        );
        assert_eq!(s.play_again(), Err(PuzzleError::NoImage));
    }

    #[test]
    fn test_snapshot_serializes() {
        let s = rotated_session();
        let snap = s.snapshot();
        assert_eq!(snap.state, GameState::Playing);
        assert_eq!(snap.tiles.len(), 16);
        assert_eq!(snap.tiles.iter().filter(|t| t.empty).count(), 1);
        let empty = snap.tiles.iter().find(|t| t.empty).unwrap();
        assert_eq!(empty.home, Point::new(0., 0.));
        assert_eq!(empty.current, Point::new(300., 300.));

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["state"], "playing");
        assert_eq!(json["tileWidth"], 100.0);
        assert_eq!(json["tiles"][15]["empty"], true);
    }
}
