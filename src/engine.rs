use std::time::Duration;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use raylib::prelude::*;

use crate::assets::RadarAssets;
use crate::cycler::FrameCycler;
use crate::frame::{MapLayer, RadarFrame};
use crate::options::Settings;
use crate::state::LoopState;
use crate::texture_loader::load_texture_with_exif_rotation;
use crate::timer::CancelHandle;

pub struct RadarLoopEngine {
    cycler: FrameCycler<RadarFrame>,
    map: Option<MapLayer>,
    site_id: Option<String>,
    hud: bool,
}

impl RadarLoopEngine {
    /// Uploads the map and frames, then starts the animation loop.
    pub fn initialize(rl: &mut RaylibHandle, thread: &RaylibThread, settings: &Settings, assets: RadarAssets) -> Result<Self> {
        info!("Preloading images...");

        let map = assets.map.and_then(|path| match load_texture_with_exif_rotation(rl, thread, &path) {
            Ok(image) => Some(MapLayer::new(image)),
            Err(e) => {
                warn!("Skipping base map: {:#}", e);
                None
            }
        });

        let mut frames = Vec::with_capacity(assets.frames.len());
        for path in assets.frames {
            match load_texture_with_exif_rotation(rl, thread, &path) {
                Ok(image) => frames.push(RadarFrame::new(image)),
                Err(e) => warn!("Skipping frame: {:#}", e),
            }
        }

        info!("...done. {} frames loaded", frames.len());

        let mut cycler = FrameCycler::with_delays(frames, settings.short_delay, settings.long_delay);

        info!("Starting animation loop...");
        cycler.start(settings.short_delay).context("No radar frame could be loaded")?;
        info!("...looping");

        Ok(Self {
            cycler,
            map,
            site_id: settings.site_id.clone(),
            hud: settings.hud,
        })
    }

    /// Advances the loop by `dt` seconds and draws the scene. Returns false once the loop stopped.
    pub fn render_frame(&mut self, dt: f32, rl: &mut RaylibHandle, thread: &RaylibThread, framebuffer: &mut RenderTexture2D) -> bool {
        // The cycler already logged the fault, the last frame simply stays on screen
        if let Err(e) = self.cycler.update(Duration::from_secs_f32(dt)) {
            debug!("Animation loop halted: {}", e);
        }

        let hud_text = if self.hud { Some(self.hud_text()) } else { None };

        rl.draw_texture_mode(thread, framebuffer, |mut tmd| {
            let mut d = tmd.begin_drawing(thread);
            d.clear_background(Color::BLACK);

            if let Some(map) = &self.map {
                map.draw(&mut d);
            }
            for frame in self.cycler.frames() {
                frame.draw(&mut d);
            }
            if let Some(text) = &hud_text {
                d.draw_text(text, 20, 20, 20, Color::WHITE);
            }
        });

        self.cycler.state() == LoopState::Running
    }

    fn hud_text(&self) -> String {
        let position = match self.cycler.active() {
            Some(i) => format!("{}/{}", i + 1, self.cycler.len()),
            None => format!("-/{}", self.cycler.len()),
        };
        match &self.site_id {
            Some(site) => format!("{}  frame {}", site, position),
            None => format!("frame {}", position),
        }
    }

    /// Drops the pending advance and hides every frame.
    pub fn shutdown(&mut self) {
        self.cycler.stop();
        self.cycler.clear();
        info!("Animation loop shut down after {} loops", self.cycler.loops_completed());
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cycler.cancel_handle()
    }

    pub fn loops_completed(&self) -> usize {
        self.cycler.loops_completed()
    }
}
