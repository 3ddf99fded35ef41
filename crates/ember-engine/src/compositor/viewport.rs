use crate::coords::{PixelRect, Vec2};

/// One split-screen view: where it lands on screen and where its camera looks.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportDefinition {
    /// Bottom-left based pixel rectangle on the presentation surface.
    pub rect: PixelRect,
    pub aspect_ratio: f32,
    /// Requested camera centre; clamped per layer at render time.
    pub camera_position: Vec2,
}

impl ViewportDefinition {
    pub fn new(rect: PixelRect) -> Self {
        Self {
            rect,
            aspect_ratio: rect.aspect_ratio(),
            camera_position: Vec2::ZERO,
        }
    }
}

/// Tiles the screen width evenly, left to right, each view full height.
///
/// The view count is clamped to `1..=screen_width` so no view is narrower than a
/// pixel. Leftover pixels from an uneven division stay uncovered on the right.
pub fn split_screen(screen_width: u32, screen_height: u32, views: u32) -> Vec<ViewportDefinition> {
    let views = views.clamp(1, screen_width.max(1));
    let width = screen_width / views;
    (0..views)
        .map(|i| ViewportDefinition::new(PixelRect::new(i * width, 0, width, screen_height)))
        .collect()
}
