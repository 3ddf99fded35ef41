use crate::coords::{Aabb2, Vec2};

/// Virtual-resolution camera shared by every viewport.
///
/// Two sizes are tracked:
/// - the window virtual size, derived once from the screen aspect and the
///   artist's virtual size (the shorter axis spans `virtual_size` units)
/// - the frame size, recomputed per viewport and layer before drawing
///
/// `position` is the clamped centre used by the most recent layer.
#[derive(Debug, Clone)]
pub struct VirtualCamera {
    screen: Vec2,
    aspect_ratio: f32,
    virtual_size: f32,
    window_virtual: Vec2,
    frame_size: Vec2,
    position: Vec2,
    world_bounds: Aabb2,
}

impl VirtualCamera {
    pub fn new(screen_width: u32, screen_height: u32, virtual_size: f32, world_bounds: Aabb2) -> Self {
        let mut camera = Self {
            screen: Vec2::ONE,
            aspect_ratio: 1.0,
            virtual_size,
            window_virtual: Vec2::splat(virtual_size),
            frame_size: Vec2::splat(virtual_size),
            position: Vec2::ZERO,
            world_bounds,
        };
        camera.set_screen_resolution(screen_width, screen_height);
        camera
    }

    /// Updates the physical resolution and re-derives the window virtual size.
    pub fn set_screen_resolution(&mut self, width: u32, height: u32) {
        self.screen = Vec2::new(width as f32, height.max(1) as f32);
        self.aspect_ratio = self.screen.x / self.screen.y;
        self.set_virtual_size(self.virtual_size);
    }

    pub fn set_virtual_size(&mut self, virtual_size: f32) {
        debug_assert!(virtual_size > 0.0, "virtual size must be positive");
        self.virtual_size = virtual_size;
        let a = self.aspect_ratio;
        let height = if a < 1.0 { virtual_size / a } else { virtual_size };
        let width = if a >= 1.0 { virtual_size * a } else { virtual_size };
        self.window_virtual = Vec2::new(width, height);
        self.frame_size = self.window_virtual;
    }

    /// Frame size for a viewport of `viewport_aspect`, half way between the
    /// window's own size and the size that aspect implies, times `layer_scale`.
    pub fn recalculate_frame(&mut self, viewport_aspect: f32, layer_scale: f32) {
        let implied = Vec2::new(
            self.window_virtual.y * viewport_aspect,
            self.window_virtual.x / viewport_aspect,
        );
        self.frame_size = self.window_virtual.lerp(implied, 0.5) * layer_scale;
    }

    /// Places the camera at `requested`, then pulls it so the frame stays
    /// inside the world bounds scaled by `layer_scale`.
    ///
    /// Per axis: a frame at least as large as the world is centred on it;
    /// otherwise only the violated edge is corrected. The result is a fixed point.
    pub fn clamp_to_world(&mut self, requested: Vec2, layer_scale: f32) -> Vec2 {
        let world = self.world_bounds * layer_scale;
        let half = self.frame_size * 0.5;
        self.position = Vec2::new(
            clamp_axis(requested.x, half.x, world.mins.x, world.maxs.x),
            clamp_axis(requested.y, half.y, world.mins.y, world.maxs.y),
        );
        self.position
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn frame_size(&self) -> Vec2 {
        self.frame_size
    }

    #[inline]
    pub fn window_virtual_size(&self) -> Vec2 {
        self.window_virtual
    }

    #[inline]
    pub fn virtual_size(&self) -> f32 {
        self.virtual_size
    }

    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    #[inline]
    pub fn world_bounds(&self) -> Aabb2 {
        self.world_bounds
    }

    pub fn set_world_bounds(&mut self, bounds: Aabb2) {
        debug_assert!(bounds.mins.x <= bounds.maxs.x && bounds.mins.y <= bounds.maxs.y);
        self.world_bounds = bounds;
    }

    /// The current frame around the camera centre.
    pub fn bounds_around_camera(&self) -> Aabb2 {
        Aabb2::from_center_half_extents(self.position, self.frame_size * 0.5)
    }

    /// The current frame around the world origin.
    pub fn bounds_around_world_center(&self) -> Aabb2 {
        Aabb2::from_center_half_extents(Vec2::ZERO, self.frame_size * 0.5)
    }

    #[inline]
    pub fn pixels_per_virtual_unit(&self) -> f32 {
        self.screen.y / self.window_virtual.y
    }

    #[inline]
    pub fn virtual_units_per_pixel(&self) -> f32 {
        self.window_virtual.y / self.screen.y
    }
}

fn clamp_axis(pos: f32, half: f32, min: f32, max: f32) -> f32 {
    if half * 2.0 >= max - min {
        return min * 0.5 + max * 0.5;
    }
    if pos - half < min {
        min + half
    } else if pos + half > max {
        max - half
    } else {
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() <= 1e-4 * b.abs().max(1.0)
    }

    fn camera(bounds: Aabb2) -> VirtualCamera {
        VirtualCamera::new(1600, 800, 10.0, bounds)
    }

    fn world() -> Aabb2 {
        Aabb2::new(Vec2::new(-50.0, -20.0), Vec2::new(50.0, 20.0))
    }

    // ── virtual size ──────────────────────────────────────────────────────

    #[test]
    fn landscape_screen_keeps_height() {
        let cam = camera(Aabb2::UNBOUNDED);
        assert_eq!(cam.window_virtual_size(), Vec2::new(20.0, 10.0));
    }

    #[test]
    fn portrait_screen_keeps_width() {
        let cam = VirtualCamera::new(800, 1600, 10.0, Aabb2::UNBOUNDED);
        assert_eq!(cam.window_virtual_size(), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn matching_viewport_keeps_window_frame() {
        let mut cam = camera(Aabb2::UNBOUNDED);
        cam.recalculate_frame(2.0, 1.0);
        assert_eq!(cam.frame_size(), Vec2::new(20.0, 10.0));
    }

    #[test]
    fn half_width_viewport_blends_sizes() {
        let mut cam = camera(Aabb2::UNBOUNDED);
        cam.recalculate_frame(1.0, 1.0);
        // implied (10, 20) blended with (20, 10)
        assert_eq!(cam.frame_size(), Vec2::new(15.0, 15.0));
    }

    #[test]
    fn layer_scale_multiplies_frame() {
        let mut cam = camera(Aabb2::UNBOUNDED);
        cam.recalculate_frame(2.0, 2.0);
        assert_eq!(cam.frame_size(), Vec2::new(40.0, 20.0));
    }

    #[test]
    fn pixel_ratios_are_reciprocal() {
        let cam = camera(Aabb2::UNBOUNDED);
        assert_eq!(cam.pixels_per_virtual_unit(), 80.0);
        assert!(approx(cam.virtual_units_per_pixel(), 0.0125));
    }

    // ── clamp ─────────────────────────────────────────────────────────────

    #[test]
    fn unbounded_world_never_moves_camera() {
        let mut cam = camera(Aabb2::UNBOUNDED);
        let p = Vec2::new(1.0e6, -3.0e5);
        assert_eq!(cam.clamp_to_world(p, 1.0), p);
        assert_eq!(cam.clamp_to_world(p, 0.5), p);
    }

    #[test]
    fn inside_position_is_untouched() {
        let mut cam = camera(world());
        assert_eq!(cam.clamp_to_world(Vec2::new(3.0, 2.0), 1.0), Vec2::new(3.0, 2.0));
    }

    #[test]
    fn clamp_brings_frame_inside_in_one_call() {
        let mut cam = camera(world());
        let requests = [
            Vec2::new(-400.0, 0.0),
            Vec2::new(400.0, 300.0),
            Vec2::new(-60.0, -25.0),
            Vec2::new(47.0, 19.0),
        ];
        for req in requests {
            let first = cam.clamp_to_world(req, 1.0);
            assert!(world().contains(cam.bounds_around_camera()), "{req:?} -> {first:?}");
            let second = cam.clamp_to_world(first, 1.0);
            assert_eq!(first, second, "clamp is not a fixed point for {req:?}");
        }
    }

    #[test]
    fn clamp_uses_scaled_world() {
        let mut cam = camera(world());
        let p = cam.clamp_to_world(Vec2::new(1000.0, 0.0), 2.0);
        assert_eq!(p.x, 90.0);
    }

    #[test]
    fn frame_larger_than_world_centres_on_it() {
        let small = Aabb2::new(Vec2::new(10.0, 10.0), Vec2::new(14.0, 12.0));
        let mut cam = camera(small);
        let p = cam.clamp_to_world(Vec2::new(-90.0, 90.0), 1.0);
        assert_eq!(p, Vec2::new(12.0, 11.0));
        assert_eq!(cam.clamp_to_world(p, 1.0), p);
    }

    #[test]
    fn mixed_axes_clamp_independently() {
        // x spans less than the frame, y spans more.
        let bounds = Aabb2::new(Vec2::new(-4.0, -50.0), Vec2::new(4.0, 50.0));
        let mut cam = camera(bounds);
        let p = cam.clamp_to_world(Vec2::new(30.0, 80.0), 1.0);
        assert_eq!(p, Vec2::new(0.0, 45.0));
    }
}
