//! Application task
//!
//! One cooperative loop drives everything:
//! - read the input lines and step the application
//! - redraw the panel when the screen changed
//! - sleep until the next tick (50ms in game, 100ms elsewhere)
//!
//! When the application stops the panel and backlight are switched off
//! and the task ends.

use defmt::*;
use embassy_time::{Instant, Timer};

use tinyarcade_core::app::{Activity, App, AppStatus};
use tinyarcade_core::game::TickReport;
use tinyarcade_core::menu::DEFAULT_ITEMS;

use crate::assets::ASSETS;
use crate::board::DEVICE_CONFIG;
use crate::context::DeviceContext;

/// Application task - runs until the user picks Exit
#[embassy_executor::task]
pub async fn app_task(mut ctx: DeviceContext, seed: u32) {
    info!("App task started");

    let start = Instant::now();
    let mut app = App::new(DEVICE_CONFIG, &DEFAULT_ITEMS, seed, 0);
    let mut activity = app.activity();
    let mut selected = app.menu().selected();

    loop {
        let now_ms = start.elapsed().as_millis() as u32;
        let status = app.update(ctx.lines.read(), now_ms);

        if app.activity() != activity {
            info!("Activity {} -> {}", activity, app.activity());
            if activity == Activity::Game {
                info!(
                    "Game ended: score {}, best {}",
                    app.game().score(),
                    app.game().best()
                );
            }
            activity = app.activity();
        }
        if app.menu().selected() != selected {
            selected = app.menu().selected();
            debug!("Menu cursor at {}", selected);
        }
        if activity == Activity::Game {
            report_tick(&app, app.last_tick());
        }

        if app.take_redraw() {
            if let Err(e) = ctx.display.render_frame(|d| app.render(d, ASSETS)) {
                warn!("Frame not sent: {}", e);
            }
        }

        if status == AppStatus::Stopped {
            break;
        }

        Timer::after_millis(u64::from(app.tick_interval_ms())).await;
    }

    info!("Application exited, panel off");
    if let Err(e) = ctx.display.set_display_on(false) {
        warn!("Display off failed: {}", e);
    }
    ctx.backlight.set_low();
}

fn report_tick(app: &App<'_>, report: TickReport) {
    let game = app.game();
    if report.level_up {
        debug!(
            "Level up: speed {}, spawn every {} ticks",
            game.speed(),
            game.spawn_delay()
        );
    }
    if report.spawn_dropped {
        warn!("Obstacle list full, spawn at frame {} dropped", game.frame());
    }
    if report.collided {
        info!("Collision at score {}", game.score());
    }
}
