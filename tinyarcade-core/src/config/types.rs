//! Configuration type definitions
//!
//! Every tunable of the device lives here with its default. The firmware
//! build script reads `device.toml` into [`DeviceConfig`] on the host,
//! validates it and bakes the result into the binary as a constant.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the panel driver holds pixels between draws and the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BufferingPolicy {
    /// Whole frame in RAM, one transfer per present
    #[default]
    FullFrame,
    /// One scan line in RAM, one line per present
    LineStreamed,
}

/// Panel geometry and bus settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PanelConfig {
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
    /// Buffering policy
    pub buffering: BufferingPolicy,
    /// SPI clock in Hz
    pub spi_frequency_hz: u32,
}

impl PanelConfig {
    pub const DEFAULT: Self = Self {
        width: 240,
        height: 240,
        buffering: BufferingPolicy::FullFrame,
        spi_frequency_hz: 40_000_000,
    };

    /// Bytes of pixel buffer the policy needs
    pub const fn buffer_len(&self) -> usize {
        match self.buffering {
            BufferingPolicy::FullFrame => self.width as usize * self.height as usize * 2,
            BufferingPolicy::LineStreamed => self.width as usize * 2,
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Obstacle game tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Playfield width in pixels
    pub playfield_width: i32,
    /// Playfield height in pixels
    pub playfield_height: i32,
    /// Side of the player and obstacle squares
    pub block_size: i32,
    /// Player start position
    pub start_x: i32,
    pub start_y: i32,
    /// Player movement per tick per held direction
    pub step: i32,
    /// Obstacle fall speed at game start (pixels per tick)
    pub initial_speed: i32,
    /// Ticks between spawns at game start
    pub initial_spawn_delay: u32,
    /// Spawn delay never drops below this
    pub min_spawn_delay: u32,
    /// Score needed per difficulty step
    pub points_per_level: u32,
    /// Game tick period
    pub tick_ms: u32,
}

impl GameConfig {
    pub const DEFAULT: Self = Self {
        playfield_width: 240,
        playfield_height: 240,
        block_size: 10,
        start_x: 115,
        start_y: 220,
        step: 5,
        initial_speed: 2,
        initial_spawn_delay: 20,
        min_spawn_delay: 5,
        points_per_level: 10,
        tick_ms: 50,
    };
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Menu grid layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MenuConfig {
    /// Items per grid row
    pub columns: usize,
    /// Side of one grid cell in pixels
    pub cell_size: u16,
    /// Side of the icon inside a cell
    pub icon_size: u16,
    /// Menu poll period
    pub tick_ms: u32,
}

impl MenuConfig {
    pub const DEFAULT: Self = Self {
        columns: 3,
        cell_size: 80,
        icon_size: 60,
        tick_ms: 100,
    };
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Input line settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InputConfig {
    /// Minimum time between accepted edges on one line
    pub debounce_ms: u32,
    /// Lines read low when pressed (pull-up wiring)
    pub active_low: bool,
}

impl InputConfig {
    pub const DEFAULT: Self = Self {
        debounce_ms: 50,
        active_low: true,
    };
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// How long the timed screens stay up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// Splash image at startup
    pub splash_ms: u32,
    /// "Selected:" notice before an item's action runs
    pub selected_ms: u32,
    /// Static content (text or image) shown by a menu item
    pub content_ms: u32,
    /// Goodbye screen before exit
    pub goodbye_ms: u32,
}

impl TimingConfig {
    pub const DEFAULT: Self = Self {
        splash_ms: 2000,
        selected_ms: 1000,
        content_ms: 2000,
        goodbye_ms: 1500,
    };
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeviceConfig {
    pub panel: PanelConfig,
    pub game: GameConfig,
    pub menu: MenuConfig,
    pub input: InputConfig,
    pub timing: TimingConfig,
}

impl DeviceConfig {
    pub const DEFAULT: Self = Self {
        panel: PanelConfig::DEFAULT,
        game: GameConfig::DEFAULT,
        menu: MenuConfig::DEFAULT,
        input: InputConfig::DEFAULT,
        timing: TimingConfig::DEFAULT,
    };

    /// Check cross-field constraints
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let panel = &self.panel;
        if panel.width == 0 || panel.height == 0 {
            return Err(ConfigError::EmptyPanel);
        }

        let game = &self.game;
        if game.block_size <= 0
            || game.block_size > game.playfield_width
            || game.block_size > game.playfield_height
        {
            return Err(ConfigError::BlockSize);
        }
        if game.playfield_width > i32::from(panel.width)
            || game.playfield_height > i32::from(panel.height)
        {
            return Err(ConfigError::PlayfieldTooLarge);
        }
        if game.start_x < 0
            || game.start_y < 0
            || game.start_x > game.playfield_width - game.block_size
            || game.start_y > game.playfield_height - game.block_size
        {
            return Err(ConfigError::StartOutsidePlayfield);
        }
        if game.step <= 0 || game.initial_speed <= 0 {
            return Err(ConfigError::NonPositiveMotion);
        }
        if game.min_spawn_delay == 0 || game.min_spawn_delay > game.initial_spawn_delay {
            return Err(ConfigError::SpawnDelay);
        }
        if game.points_per_level == 0 {
            return Err(ConfigError::PointsPerLevel);
        }
        if game.tick_ms == 0 || self.menu.tick_ms == 0 {
            return Err(ConfigError::TickPeriod);
        }

        let menu = &self.menu;
        if menu.columns == 0 {
            return Err(ConfigError::MenuColumns);
        }
        if menu.icon_size > menu.cell_size {
            return Err(ConfigError::IconLargerThanCell);
        }

        Ok(())
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Configuration validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Panel width or height is zero
    EmptyPanel,
    /// Block size is not positive or does not fit the playfield
    BlockSize,
    /// Playfield is larger than the panel
    PlayfieldTooLarge,
    /// Player start position puts the player outside the playfield
    StartOutsidePlayfield,
    /// Step or initial speed is not positive
    NonPositiveMotion,
    /// Spawn delay floor is zero or above the initial delay
    SpawnDelay,
    /// Points per level is zero
    PointsPerLevel,
    /// A tick period is zero
    TickPeriod,
    /// Menu has no columns
    MenuColumns,
    /// Icon does not fit its cell
    IconLargerThanCell,
}

impl ConfigError {
    /// Human-readable description
    pub const fn describe(&self) -> &'static str {
        match self {
            ConfigError::EmptyPanel => "panel width and height must be non-zero",
            ConfigError::BlockSize => "game.block_size must be positive and fit the playfield",
            ConfigError::PlayfieldTooLarge => "game playfield must fit the panel",
            ConfigError::StartOutsidePlayfield => "game start position must keep the player inside the playfield",
            ConfigError::NonPositiveMotion => "game.step and game.initial_speed must be positive",
            ConfigError::SpawnDelay => "game.min_spawn_delay must be 1..=initial_spawn_delay",
            ConfigError::PointsPerLevel => "game.points_per_level must be non-zero",
            ConfigError::TickPeriod => "tick periods must be non-zero",
            ConfigError::MenuColumns => "menu.columns must be non-zero",
            ConfigError::IconLargerThanCell => "menu.icon_size must not exceed menu.cell_size",
        }
    }
}
