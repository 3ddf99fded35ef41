use crate::coords::{Aabb2, Rgba};

/// Compositor construction parameters.
#[derive(Debug, Clone)]
pub struct CompositorConfig {
    /// Background each viewport is cleared to before its layers draw.
    pub clear_color: Rgba,

    /// Physical resolution in pixels; also the size of the off-screen targets.
    pub screen_width: u32,
    pub screen_height: u32,

    /// Pixel height the artist authored sprites for (e.g. 144, 240, 1080).
    pub import_size: u32,

    /// Virtual units visible along the screen's shorter axis.
    pub virtual_size: f32,

    /// Number of side-by-side views; at least one.
    pub split_screen_views: u32,

    /// Region the camera frame is kept inside. `Aabb2::UNBOUNDED` disables clamping.
    pub world_bounds: Aabb2,

    /// Seeds particle sampling. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            clear_color: Rgba::BLACK,
            screen_width: 1600,
            screen_height: 900,
            import_size: 240,
            virtual_size: 10.0,
            split_screen_views: 1,
            world_bounds: Aabb2::UNBOUNDED,
            seed: None,
        }
    }
}
