//! Build script for tinyarcade-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Reads and validates device.toml, then generates the device constants
//!   and board pin wiring
//! - Embeds the raw images under assets/ as the asset table

use std::env;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tinyarcade_core::config::{BufferingPolicy, DeviceConfig};

/// Frame buffers above this do not leave room for the stack and statics
const MAX_BUFFER_BYTES: usize = 192 * 1024;

/// GPIOs usable as SPI1 SCK / TX on the RP2040
const SPI1_SCK_PINS: [u8; 3] = [10, 14, 26];
const SPI1_MOSI_PINS: [u8; 3] = [11, 15, 27];

/// Number of user GPIOs on the RP2040
const GPIO_COUNT: u8 = 30;

/// GPIO assignment from the [pins] table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct PinMap {
    sck: u8,
    mosi: u8,
    cs: u8,
    dc: u8,
    rst: u8,
    backlight: u8,
    up: u8,
    down: u8,
    left: u8,
    right: u8,
    select: u8,
    a: u8,
    b: u8,
    x: u8,
    y: u8,
}

impl PinMap {
    fn named(&self) -> [(&'static str, u8); 15] {
        [
            ("sck", self.sck),
            ("mosi", self.mosi),
            ("cs", self.cs),
            ("dc", self.dc),
            ("rst", self.rst),
            ("backlight", self.backlight),
            ("up", self.up),
            ("down", self.down),
            ("left", self.left),
            ("right", self.right),
            ("select", self.select),
            ("a", self.a),
            ("b", self.b),
            ("x", self.x),
            ("y", self.y),
        ]
    }
}

/// Layout of device.toml
#[derive(Debug, Deserialize)]
struct DeviceFile {
    #[serde(flatten)]
    device: DeviceConfig,
    pins: PinMap,
}

fn main() {
    setup_linker();
    let file = load_device_file();
    validate_device(&file);
    generate_board(&file);
    generate_assets();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read and parse device.toml
fn load_device_file() -> DeviceFile {
    // Re-run if device.toml changes
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a device.toml configuration file.         ║\n\
            ║  Please create one in the tinyarcade-firmware directory.         ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Syntax errors and bad values (e.g. an unknown buffering policy) both
    // surface here
    match toml::from_str(&config_content) {
        Ok(file) => file,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid device.toml                                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            // Count chars, not bytes: TOML errors quote user text
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Validate settings and pin assignment, reporting every problem at once
fn validate_device(file: &DeviceFile) {
    let mut errors: Vec<String> = Vec::new();

    if let Err(e) = file.device.validate() {
        errors.push(e.describe().to_string());
    }

    let panel = &file.device.panel;
    if panel.buffer_len() > MAX_BUFFER_BYTES {
        errors.push(format!(
            "panel buffer of {} bytes does not fit RAM, use line_streamed",
            panel.buffer_len()
        ));
    }

    let named = file.pins.named();
    for (i, (name, gpio)) in named.iter().enumerate() {
        if *gpio >= GPIO_COUNT {
            errors.push(format!("pins.{} = {} is not a GPIO (0-29)", name, gpio));
        }
        if let Some((other, _)) = named[..i].iter().find(|(_, g)| g == gpio) {
            errors.push(format!("pins.{} reuses GPIO {} (pins.{})", name, gpio, other));
        }
    }
    if !SPI1_SCK_PINS.contains(&file.pins.sck) {
        errors.push(format!("pins.sck must be one of {:?} (SPI1)", SPI1_SCK_PINS));
    }
    if !SPI1_MOSI_PINS.contains(&file.pins.mosi) {
        errors.push(format!("pins.mosi must be one of {:?} (SPI1)", SPI1_MOSI_PINS));
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid device configuration                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=device.toml validated successfully");
}

/// Write the device constant and the board wiring function
fn generate_board(file: &DeviceFile) {
    let DeviceConfig {
        panel,
        game,
        menu,
        input,
        timing,
    } = &file.device;
    let pins = &file.pins;
    let pull = if input.active_low { "Up" } else { "Down" };

    let mut out = String::new();
    let _ = writeln!(out, "// Generated from device.toml by build.rs\n");

    let _ = writeln!(
        out,
        "pub const DEVICE_CONFIG: DeviceConfig = DeviceConfig {{\n    \
         panel: PanelConfig {{ width: {}, height: {}, buffering: BufferingPolicy::{}, spi_frequency_hz: {} }},\n    \
         game: GameConfig {{ playfield_width: {}, playfield_height: {}, block_size: {}, start_x: {}, start_y: {}, \
         step: {}, initial_speed: {}, initial_spawn_delay: {}, min_spawn_delay: {}, points_per_level: {}, tick_ms: {} }},\n    \
         menu: MenuConfig {{ columns: {}, cell_size: {}, icon_size: {}, tick_ms: {} }},\n    \
         input: InputConfig {{ debounce_ms: {}, active_low: {} }},\n    \
         timing: TimingConfig {{ splash_ms: {}, selected_ms: {}, content_ms: {}, goodbye_ms: {} }},\n}};\n",
        panel.width,
        panel.height,
        policy_name(panel.buffering),
        panel.spi_frequency_hz,
        game.playfield_width,
        game.playfield_height,
        game.block_size,
        game.start_x,
        game.start_y,
        game.step,
        game.initial_speed,
        game.initial_spawn_delay,
        game.min_spawn_delay,
        game.points_per_level,
        game.tick_ms,
        menu.columns,
        menu.cell_size,
        menu.icon_size,
        menu.tick_ms,
        input.debounce_ms,
        input.active_low,
        timing.splash_ms,
        timing.selected_ms,
        timing.content_ms,
        timing.goodbye_ms,
    );

    let _ = writeln!(
        out,
        "/// Pixel buffer size for the configured panel and policy\n\
         pub const BUFFER_LEN: usize = {};\n",
        panel.buffer_len()
    );

    for (name, gpio) in pins.named() {
        let _ = writeln!(out, "pub const PIN_{}: u8 = {};", name.to_uppercase(), gpio);
    }

    let _ = writeln!(
        out,
        "\n/// Claim the board peripherals wired in device.toml\n\
         pub fn take_board_io(p: Peripherals, spi_config: spi::Config) -> BoardIo {{\n    \
         BoardIo {{\n        \
         spi: Spi::new_blocking_txonly(p.SPI1, p.PIN_{sck}, p.PIN_{mosi}, spi_config),\n        \
         cs: Output::new(p.PIN_{cs}, Level::High),\n        \
         dc: Output::new(p.PIN_{dc}, Level::Low),\n        \
         rst: Output::new(p.PIN_{rst}, Level::High),\n        \
         backlight: Output::new(p.PIN_{backlight}, Level::Low),\n        \
         lines: LinePins {{\n            \
         up: Input::new(p.PIN_{up}, Pull::{pull}),\n            \
         down: Input::new(p.PIN_{down}, Pull::{pull}),\n            \
         left: Input::new(p.PIN_{left}, Pull::{pull}),\n            \
         right: Input::new(p.PIN_{right}, Pull::{pull}),\n            \
         select: Input::new(p.PIN_{select}, Pull::{pull}),\n            \
         a: Input::new(p.PIN_{a}, Pull::{pull}),\n            \
         b: Input::new(p.PIN_{b}, Pull::{pull}),\n            \
         x: Input::new(p.PIN_{x}, Pull::{pull}),\n            \
         y: Input::new(p.PIN_{y}, Pull::{pull}),\n        \
         }},\n    \
         }}\n\
         }}",
        sck = pins.sck,
        mosi = pins.mosi,
        cs = pins.cs,
        dc = pins.dc,
        rst = pins.rst,
        backlight = pins.backlight,
        up = pins.up,
        down = pins.down,
        left = pins.left,
        right = pins.right,
        select = pins.select,
        a = pins.a,
        b = pins.b,
        x = pins.x,
        y = pins.y,
        pull = pull,
    );

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("board.rs"), out).unwrap();
}

fn policy_name(policy: BufferingPolicy) -> &'static str {
    match policy {
        BufferingPolicy::FullFrame => "FullFrame",
        BufferingPolicy::LineStreamed => "LineStreamed",
    }
}

/// Embed every `.raw` file under assets/ keyed by its relative path
fn generate_assets() {
    println!("cargo:rerun-if-changed=assets");

    let root = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap()).join("assets");
    let mut files = Vec::new();
    collect_raw_files(&root, &mut files);
    files.sort();

    let mut out = String::from("// Generated from assets/ by build.rs\n\n");
    out.push_str("pub static ASSETS: &[(&str, &[u8])] = &[\n");
    for path in &files {
        let Ok(relative) = path.strip_prefix(&root) else {
            continue;
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let len = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        if len % 2 != 0 {
            println!(
                "cargo:warning=assets/{} has an odd length ({} bytes), not RGB565",
                name, len
            );
        }

        let _ = writeln!(
            out,
            "    ({:?}, include_bytes!({:?})),",
            name,
            path.display().to_string()
        );
    }
    out.push_str("];\n");

    if files.is_empty() {
        println!("cargo:warning=no assets found, images will render placeholders");
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("assets.rs"), out).unwrap();
}

fn collect_raw_files(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_raw_files(&path, files);
        } else if path.extension().is_some_and(|ext| ext == "raw") {
            files.push(path);
        }
    }
}
