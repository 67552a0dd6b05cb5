//! Application flow
//!
//! Sequences the screens of the device: splash, menu, selection notice,
//! the menu actions and the game. Exactly one activity is current; it
//! owns the input and the screen until it hands over to the next.
//!
//! The caller drives the application with one [`App::update`] per tick
//! and redraws with [`App::render`] whenever [`App::take_redraw`] says
//! the screen changed. Timed screens compare tick timestamps; nothing in
//! here sleeps.

use core::fmt::Write;

use heapless::String;

use crate::color::Color;
use crate::config::DeviceConfig;
use crate::game::{GameEngine, GamePhase, Rng, TickReport};
use crate::input::{InputSampler, Line, LineLevels};
use crate::menu::{MenuAction, MenuEvent, MenuItem, MenuNavigator, SPLASH_IMAGE};
use crate::traits::{AssetStore, Canvas};

/// The screen currently in control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Activity {
    /// Startup image
    Splash,
    /// Grid menu
    Menu,
    /// "Selected:" notice before an item's action
    Notice(MenuItem),
    /// White screen, back to the menu on the next tick
    Blank,
    /// Named image on screen
    Image(&'static str),
    /// Game in progress (any phase but exited)
    Game,
    /// Game left; play again or return to the menu
    GameExited,
    /// Farewell screen before stopping
    Goodbye,
    /// Application finished
    Exited,
}

/// Whether the caller should keep ticking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppStatus {
    Running,
    Stopped,
}

/// Top-level state of the device
pub struct App<'a> {
    config: DeviceConfig,
    input: InputSampler,
    menu: MenuNavigator<'a>,
    game: GameEngine,
    rng: Rng,
    activity: Activity,
    /// When the current activity started
    since_ms: u32,
    last_tick: TickReport,
    redraw: bool,
}

impl<'a> App<'a> {
    /// Start at the splash screen
    pub fn new(config: DeviceConfig, items: &'a [MenuItem], seed: u32, now_ms: u32) -> Self {
        let mut rng = Rng::new(seed);
        Self {
            config,
            input: InputSampler::new(config.input.debounce_ms),
            menu: MenuNavigator::new(items, config.menu.columns),
            game: GameEngine::new(config.game, rng.next_u32()),
            rng,
            activity: Activity::Splash,
            since_ms: now_ms,
            last_tick: TickReport::default(),
            redraw: true,
        }
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn menu(&self) -> &MenuNavigator<'a> {
        &self.menu
    }

    pub fn game(&self) -> &GameEngine {
        &self.game
    }

    /// Report of the most recent game tick
    pub fn last_tick(&self) -> TickReport {
        self.last_tick
    }

    /// How long the caller should wait before the next update
    pub fn tick_interval_ms(&self) -> u32 {
        match self.activity {
            Activity::Game => self.config.game.tick_ms,
            _ => self.config.menu.tick_ms,
        }
    }

    /// Whether the screen must be redrawn; clears the flag
    pub fn take_redraw(&mut self) -> bool {
        core::mem::take(&mut self.redraw)
    }

    fn enter(&mut self, activity: Activity, now_ms: u32) {
        self.activity = activity;
        self.since_ms = now_ms;
        self.redraw = true;
    }

    fn elapsed(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.since_ms)
    }

    fn start_game(&mut self, high_score: u32, now_ms: u32) {
        self.game = GameEngine::new(self.config.game, self.rng.next_u32()).with_high_score(high_score);
        self.enter(Activity::Game, now_ms);
    }

    fn run_action(&mut self, action: MenuAction, now_ms: u32) {
        match action {
            MenuAction::StartGame => self.start_game(0, now_ms),
            MenuAction::ShowImage(asset) => self.enter(Activity::Image(asset), now_ms),
            MenuAction::ClearScreen => self.enter(Activity::Blank, now_ms),
            MenuAction::Exit => self.enter(Activity::Goodbye, now_ms),
            MenuAction::Nothing => self.enter(Activity::Menu, now_ms),
        }
    }

    /// Service one tick
    ///
    /// `raw` is the polarity-normalized level of every input line.
    pub fn update(&mut self, raw: LineLevels, now_ms: u32) -> AppStatus {
        self.input.poll(raw, now_ms);
        self.last_tick = TickReport::default();

        let timing = self.config.timing;
        match self.activity {
            Activity::Splash => {
                if self.elapsed(now_ms) >= timing.splash_ms {
                    self.enter(Activity::Menu, now_ms);
                }
            }
            Activity::Menu => match self.menu.handle(&self.input) {
                MenuEvent::Activated(item) => self.enter(Activity::Notice(item), now_ms),
                MenuEvent::Moved => self.redraw = true,
                MenuEvent::Idle => {}
            },
            Activity::Notice(item) => {
                if self.elapsed(now_ms) >= timing.selected_ms {
                    self.run_action(item.action, now_ms);
                }
            }
            Activity::Blank => self.enter(Activity::Menu, now_ms),
            Activity::Image(_) => {
                if self.elapsed(now_ms) >= timing.content_ms {
                    self.enter(Activity::Menu, now_ms);
                }
            }
            Activity::Game => {
                self.last_tick = self.game.update(&self.input);
                self.redraw = true;
                if self.game.phase() == GamePhase::Exited {
                    self.enter(Activity::GameExited, now_ms);
                }
            }
            Activity::GameExited => {
                if self.input.debounced_edge(Line::X) {
                    self.start_game(self.game.best(), now_ms);
                } else if self.input.debounced_edge(Line::Y) {
                    self.enter(Activity::Menu, now_ms);
                }
            }
            Activity::Goodbye => {
                if self.elapsed(now_ms) >= timing.goodbye_ms {
                    self.enter(Activity::Exited, now_ms);
                }
            }
            Activity::Exited => {}
        }

        if self.activity == Activity::Exited {
            AppStatus::Stopped
        } else {
            AppStatus::Running
        }
    }

    /// Draw the current activity
    ///
    /// Pure with respect to the application state, so a paged display can
    /// call it once per page.
    pub fn render<C, A>(&self, canvas: &mut C, assets: &A)
    where
        C: Canvas + ?Sized,
        A: AssetStore + ?Sized,
    {
        match self.activity {
            Activity::Splash => {
                if !draw_fullscreen(canvas, assets, SPLASH_IMAGE) {
                    canvas.clear(Color::WHITE);
                    canvas.draw_text("Splash missing!", 50, 100, Color::RED);
                }
            }
            Activity::Menu => self.menu.render(canvas, assets, &self.config.menu),
            Activity::Notice(item) => {
                canvas.clear(Color::WHITE);
                canvas.draw_text("Selected:", 10, 10, Color::RED);
                canvas.draw_text(item.label, 10, 30, Color::BLUE);
            }
            Activity::Blank => canvas.clear(Color::WHITE),
            Activity::Image(asset) => {
                if !draw_fullscreen(canvas, assets, asset) {
                    let mut text: String<48> = String::new();
                    let _ = write!(text, "{} not found", asset);
                    canvas.clear(Color::WHITE);
                    canvas.draw_text(&text, 10, 100, Color::RED);
                }
            }
            Activity::Game => self.game.render(canvas),
            Activity::GameExited => {
                canvas.clear(Color::BLACK);
                canvas.draw_text("Game Exited", 70, 100, Color::WHITE);
                canvas.draw_text("Press X to play", 60, 140, Color::GREEN);
                canvas.draw_text("  Y to exit", 70, 160, Color::RED);
            }
            Activity::Goodbye => {
                canvas.clear(Color::WHITE);
                canvas.draw_text("Goodbye!", 60, 100, Color::RED);
            }
            Activity::Exited => canvas.clear(Color::BLACK),
        }
    }
}

/// Blit a panel-sized image; `false` if it is missing or short
fn draw_fullscreen<C, A>(canvas: &mut C, assets: &A, name: &str) -> bool
where
    C: Canvas + ?Sized,
    A: AssetStore + ?Sized,
{
    let (w, h) = canvas.size();
    match assets.get(name) {
        Some(data) => canvas.blit_raw(data, 0, 0, w, h).is_ok(),
        None => false,
    }
}
