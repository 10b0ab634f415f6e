use anyhow::{anyhow, Result};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use raylib::prelude::*;

mod assets;
mod constants;
mod cycler;
mod engine;
mod ffmpeg;
mod frame;
mod options;
mod state;
mod texture_loader;
mod timer;

use crate::constants::*;
use crate::engine::RadarLoopEngine;
use crate::ffmpeg::Ffmpeg;
use crate::options::{Cli, Settings};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = Settings::from_cli(Cli::parse())?;

    let assets = settings.discover_assets()?;
    info!(
        "Input path: {}, {} frames, map: {}",
        settings.image_dir.display(),
        assets.frames.len(),
        assets.map.as_ref().map_or("none".to_string(), |p| p.display().to_string())
    );

    let (mut rl, thread) = raylib::init()
        .size(RENDER_WIDTH * 3 / 4, RENDER_HEIGHT * 3 / 4)
        .title("Radar Loop")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    let mut engine = RadarLoopEngine::initialize(&mut rl, &thread, &settings, assets)?;
    let cancel = engine.cancel_handle();

    // Start ffmpeg process and connect pipes so we can send rendered frames
    let mut ffmpeg = match &settings.export {
        Some(path) => Some(Ffmpeg::new(RENDER_WIDTH, RENDER_HEIGHT, FPS, path)?),
        None => None,
    };

    let mut framebuffer = rl
        .load_render_texture(&thread, RENDER_WIDTH as u32, RENDER_HEIGHT as u32)
        .map_err(|e| anyhow!("Failed to create render texture: {}", e))?;

    // --- Main Loop ---
    while !rl.window_should_close() {
        // Exports use a fixed step so the video timing does not depend on the display
        let dt = if ffmpeg.is_some() { FRAME_TIME } else { rl.get_frame_time() };

        let running = engine.render_frame(dt, &mut rl, &thread, &mut framebuffer);

        // Draw inverted copy of framebuffer to the screen
        {
            let mut d = rl.begin_drawing(&thread);
            d.clear_background(Color::BLACK);

            let sw = d.get_screen_width() as f32;
            let sh = d.get_screen_height() as f32;
            let side = sw.min(sh);

            d.draw_texture_pro(
                &framebuffer,
                Rectangle::new(0.0, 0.0, framebuffer.width() as f32, -(framebuffer.height() as f32)),
                Rectangle::new((sw - side) * 0.5, (sh - side) * 0.5, side, side),
                Vector2::new(0.0, 0.0),
                0.0,
                Color::WHITE,
            );
        }

        if let Some(ffmpeg) = ffmpeg.as_mut() {
            if engine.loops_completed() >= settings.loops {
                cancel.cancel();
                break;
            }
            if !running {
                warn!("Animation loop stopped before the export completed");
                break;
            }

            let image = framebuffer
                .load_image()
                .map_err(|e| anyhow!("Failed to read back rendered frame: {}", e))?;
            ffmpeg.write(&image)?;
        }
    }

    engine.shutdown();
    drop(ffmpeg);
    Ok(())
}
