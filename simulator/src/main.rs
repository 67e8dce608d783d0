//! Battery meter simulator for desktop.
//!
//! Drives [`MeterEngine`] from keyboard-controlled synthetic telemetry and
//! shows the rasterised meter in an `embedded-graphics-simulator` window.
//!
//! # Keys
//!
//! | Key | Action |
//! |-----|--------|
//! | M | Cycle mode (icon, circle, text, gone) |
//! | P | Toggle charger |
//! | Up / Down | Level +5 / -5 |
//! | U | Toggle unknown status |
//! | S | Toggle power save |
//! | T | Toggle inside percentage |
//! | A | Toggle auto charge/drain cycle |
//! | L | Run the level sweep |
//! | D | Enter / exit demo mode |
//! | 1 / 2 / 3 | Demo: 4% unplugged / 50% unplugged / 100% plugged |

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]

mod telemetry;
mod timing;

use std::fmt::Write;
use std::thread;
use std::time::{Duration, Instant};

use battery_meter::colors::{BLACK, WHITE};
use battery_meter::demo::LevelSweep;
use battery_meter::raster::{Framebuffer, rasterize};
use battery_meter::{MeterConfig, MeterEngine, Viewport};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use log::{error, info};
use profont::PROFONT_7_POINT;

use crate::telemetry::SyntheticBattery;
use crate::timing::{DRAIN_STEP, FRAME_TIME};

const METER_WIDTH: u32 = 40;
const METER_HEIGHT: u32 = 40;
const METER_PIXELS: usize = (METER_WIDTH * METER_HEIGHT) as usize;
const LABEL_HEIGHT: u32 = 10;
const METER_PADDING: i32 = 2;

const LABEL_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_7_POINT, WHITE);

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let mut engine = match MeterEngine::new(MeterConfig::default()) {
        Ok(engine) => engine,
        Err(err) => {
            error!("invalid meter configuration: {err}");
            return;
        }
    };
    let mut fb = match Framebuffer::<METER_PIXELS>::new(METER_WIDTH, METER_HEIGHT, BLACK) {
        Ok(fb) => fb,
        Err(err) => {
            error!("framebuffer: {err}");
            return;
        }
    };

    let viewport = Viewport::new(METER_WIDTH as i32, METER_HEIGHT as i32).with_padding(
        METER_PADDING,
        METER_PADDING,
        METER_PADDING,
        METER_PADDING,
    );
    engine.on_size_changed(viewport);

    let mut battery = SyntheticBattery::new(64);
    engine.on_battery_changed(battery.to_state());

    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(METER_WIDTH, METER_HEIGHT + LABEL_HEIGHT));
    let output_settings = OutputSettingsBuilder::new().scale(8).build();
    let mut window = Window::new("Battery Meter Sim", &output_settings);

    display.clear(BLACK).ok();
    window.update(&display);

    let mut power_save = false;
    let mut auto_drain = false;
    let mut next_drain = Instant::now();
    let mut sweep: Option<LevelSweep> = None;
    let mut next_sweep_step = Instant::now();
    let mut wakeup_at: Option<Instant> = None;

    loop {
        let frame_start = Instant::now();

        // Handle events
        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => return,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    match keycode {
                        Keycode::M => {
                            let mode = engine.mode().next();
                            engine.set_mode(mode);
                            let (w, h) = engine.measure(METER_WIDTH as i32, METER_HEIGHT as i32);
                            info!("mode {} (preferred size {w}x{h})", mode.label());
                        }
                        Keycode::P => {
                            battery.toggle_plugged();
                            engine.on_battery_changed(battery.to_state());
                        }
                        Keycode::Up => {
                            battery.adjust(5);
                            engine.on_battery_changed(battery.to_state());
                        }
                        Keycode::Down => {
                            battery.adjust(-5);
                            engine.on_battery_changed(battery.to_state());
                        }
                        Keycode::U => {
                            battery.toggle_unknown_status();
                            engine.on_battery_changed(battery.to_state());
                        }
                        Keycode::S => {
                            power_save = !power_save;
                            engine.set_power_save_active(power_save);
                            info!("power save {}", if power_save { "on" } else { "off" });
                        }
                        Keycode::T => engine.set_show_percent(!engine.show_percent()),
                        Keycode::A => {
                            auto_drain = !auto_drain;
                            info!("auto drain {}", if auto_drain { "on" } else { "off" });
                        }
                        Keycode::L if sweep.is_none() => {
                            info!("level sweep started");
                            sweep = Some(LevelSweep::new(engine.live_battery()));
                            next_sweep_step = frame_start;
                        }
                        Keycode::D => {
                            let command = if engine.is_demo_active() { "exit" } else { "enter" };
                            engine.dispatch_demo(command, None, None).ok();
                        }
                        Keycode::Num1 => {
                            engine.dispatch_demo("battery", Some("4"), Some("false")).ok();
                        }
                        Keycode::Num2 => {
                            engine.dispatch_demo("battery", Some("50"), Some("false")).ok();
                        }
                        Keycode::Num3 => {
                            engine.dispatch_demo("battery", Some("100"), Some("true")).ok();
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        // Synthetic telemetry
        if let Some(active) = sweep.as_mut()
            && frame_start >= next_sweep_step
        {
            match active.next() {
                Some(state) => {
                    engine.on_battery_changed(state);
                    next_sweep_step = frame_start + Duration::from_millis(u64::from(LevelSweep::STEP_MS));
                }
                None => {
                    info!("level sweep finished");
                    sweep = None;
                }
            }
        } else if auto_drain && sweep.is_none() && frame_start >= next_drain {
            battery.drain_step();
            engine.on_battery_changed(battery.to_state());
            next_drain = frame_start + DRAIN_STEP;
        }

        // A disposed or stopped pulse drops its wakeup
        if engine.next_wakeup_delay_ms().is_none() {
            wakeup_at = None;
        }
        let wakeup_due = wakeup_at.is_some_and(|at| frame_start >= at);

        if engine.take_redraw_request() || wakeup_due {
            let commands = engine.render();
            wakeup_at = engine
                .next_wakeup_delay_ms()
                .map(|ms| Instant::now() + Duration::from_millis(u64::from(ms)));

            fb.clear();
            rasterize(&commands, &mut fb);
            blit(&fb, &mut display);
            draw_label(&mut display, &engine, battery.level());
        }

        window.update(&display);

        let elapsed = frame_start.elapsed();
        if let Some(remaining) = FRAME_TIME.checked_sub(elapsed) {
            thread::sleep(remaining);
        }
    }
}

/// Copy the meter framebuffer into the top of the window.
fn blit(
    fb: &Framebuffer<METER_PIXELS>,
    display: &mut SimulatorDisplay<Rgb565>,
) {
    let width = fb.width() as usize;
    display
        .draw_iter(
            fb.pixels()
                .iter()
                .enumerate()
                .map(|(i, &color)| Pixel(Point::new((i % width) as i32, (i / width) as i32), color)),
        )
        .ok();
}

/// Mode and live level under the meter.
fn draw_label(
    display: &mut SimulatorDisplay<Rgb565>,
    engine: &MeterEngine,
    level: i32,
) {
    Rectangle::new(Point::new(0, METER_HEIGHT as i32), Size::new(METER_WIDTH, LABEL_HEIGHT))
        .into_styled(PrimitiveStyle::with_fill(BLACK))
        .draw(display)
        .ok();

    let mut label: heapless::String<16> = heapless::String::new();
    let marker = if engine.is_demo_active() { "*" } else { "" };
    write!(label, "{}{marker} {level}", engine.mode().label()).ok();
    Text::with_baseline(&label, Point::new(1, METER_HEIGHT as i32 + 1), LABEL_STYLE, Baseline::Top)
        .draw(display)
        .ok();
}
