use raylib::prelude::*;
use crate::constants::*;
use crate::cycler::FrameMarker;

/// Scale that fits a `width` x `height` image inside the render target, keeping its ratio.
pub fn fit_scale(width: i32, height: i32) -> f32 {
    if width <= 0 || height <= 0 {
        return 0.0;
    }
    let scale_x = RENDER_WIDTH as f32 / width as f32;
    let scale_y = RENDER_HEIGHT as f32 / height as f32;
    scale_x.min(scale_y)
}

// Frames and the map share the same placement so the overlay lines up
fn draw_fitted(image: &Texture2D, d: &mut RaylibDrawHandle) {
    let tex_width = image.width() as f32;
    let tex_height = image.height() as f32;

    let scale = fit_scale(image.width(), image.height());
    let scaled_width = tex_width * scale;
    let scaled_height = tex_height * scale;

    let dest = Rectangle::new(
        (RENDER_WIDTH as f32 - scaled_width) * 0.5,
        (RENDER_HEIGHT as f32 - scaled_height) * 0.5,
        scaled_width,
        scaled_height,
    );

    d.draw_texture_pro(
        image,
        Rectangle::new(0.0, 0.0, tex_width, tex_height), // Source rect uses original texture size
        dest,
        Vector2::new(0.0, 0.0),
        0.0,
        Color::WHITE,
    );
}

pub struct RadarFrame {
    image: Texture2D,
    pub visible: bool,
}

impl RadarFrame {
    pub fn new(image: Texture2D) -> Self {
        Self { image, visible: false }
    }

    pub fn draw(&self, d: &mut RaylibDrawHandle) {
        if self.visible {
            draw_fitted(&self.image, d);
        }
    }
}

impl FrameMarker for RadarFrame {
    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

/// Base map, visible through the transparent parts of the radar frames.
pub struct MapLayer {
    image: Texture2D,
}

impl MapLayer {
    pub fn new(image: Texture2D) -> Self {
        Self { image }
    }

    pub fn draw(&self, d: &mut RaylibDrawHandle) {
        draw_fitted(&self.image, d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_image_fills_square_target() {
        assert_eq!(fit_scale(RENDER_WIDTH / 2, RENDER_HEIGHT / 2), 2.0);
        assert_eq!(fit_scale(RENDER_WIDTH * 2, RENDER_HEIGHT * 2), 0.5);
    }

    #[test]
    fn wide_image_is_limited_by_width() {
        let scale = fit_scale(RENDER_WIDTH * 4, RENDER_HEIGHT);
        assert_eq!(scale, 0.25);
    }

    #[test]
    fn degenerate_image_gets_zero_scale() {
        assert_eq!(fit_scale(0, 100), 0.0);
    }
}
