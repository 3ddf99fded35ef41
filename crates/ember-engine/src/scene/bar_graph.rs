use crate::coords::{Aabb2, Rgba, Vec2};
use crate::render::MeshBuilder;

/// Axis the bar fills along.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum BarOrientation {
    /// Fills left to right.
    #[default]
    Horizontal,
    /// Fills bottom to top.
    Vertical,
}

/// Two-tone fill gauge (health bars, loading meters).
///
/// The displayed fill approaches the target at `fill_speed` fractions per second;
/// a speed of zero snaps immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct BarGraph {
    pub bounds: Aabb2,
    pub fill_color: Rgba,
    pub unfilled_color: Rgba,
    pub orientation: BarOrientation,
    pub fill_speed: f32,
    fill: f32,
    target_fill: f32,
}

impl BarGraph {
    pub fn new(bounds: Aabb2, fill_color: Rgba) -> Self {
        Self {
            bounds,
            fill_color,
            unfilled_color: Rgba::GRAY,
            orientation: BarOrientation::Horizontal,
            fill_speed: 0.0,
            fill: 0.0,
            target_fill: 0.0,
        }
    }

    pub fn unfilled_color(mut self, color: Rgba) -> Self {
        self.unfilled_color = color;
        self
    }

    pub fn vertical(mut self) -> Self {
        self.orientation = BarOrientation::Vertical;
        self
    }

    pub fn animated(mut self, fill_speed: f32) -> Self {
        self.fill_speed = fill_speed.max(0.0);
        self
    }

    /// Sets the target fill fraction, clamped to `[0, 1]`.
    pub fn set_fill(&mut self, fraction: f32) {
        self.target_fill = fraction.clamp(0.0, 1.0);
        if self.fill_speed <= 0.0 {
            self.fill = self.target_fill;
        }
    }

    #[inline]
    pub fn fill(&self) -> f32 {
        self.fill
    }

    pub fn update(&mut self, dt: f32) {
        if self.fill_speed <= 0.0 {
            self.fill = self.target_fill;
            return;
        }
        let step = self.fill_speed * dt;
        let delta = self.target_fill - self.fill;
        self.fill = if delta.abs() <= step {
            self.target_fill
        } else {
            self.fill + step.copysign(delta)
        };
    }

    /// Unfilled track first, then the filled portion on top.
    pub fn render(&self, out: &mut MeshBuilder) {
        out.push_rect(self.bounds, self.unfilled_color);

        if self.fill <= 0.0 {
            return;
        }
        let b = self.bounds;
        let filled = match self.orientation {
            BarOrientation::Horizontal => {
                Aabb2::new(b.mins, Vec2::new(b.mins.x + b.width() * self.fill, b.maxs.y))
            }
            BarOrientation::Vertical => {
                Aabb2::new(b.mins, Vec2::new(b.maxs.x, b.mins.y + b.height() * self.fill))
            }
        };
        out.push_rect(filled, self.fill_color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar() -> BarGraph {
        BarGraph::new(Aabb2::new(Vec2::ZERO, Vec2::new(10.0, 2.0)), Rgba::WHITE)
    }

    #[test]
    fn set_fill_snaps_without_animation() {
        let mut b = bar();
        b.set_fill(0.4);
        assert_eq!(b.fill(), 0.4);
    }

    #[test]
    fn animated_fill_approaches_target() {
        let mut b = bar().animated(1.0);
        b.set_fill(0.5);
        assert_eq!(b.fill(), 0.0);
        b.update(0.25);
        assert_eq!(b.fill(), 0.25);
        b.update(1.0);
        assert_eq!(b.fill(), 0.5);
    }

    #[test]
    fn empty_bar_renders_only_track() {
        let mut mb = MeshBuilder::new();
        bar().render(&mut mb);
        assert_eq!(mb.quad_count(), 1);
    }

    #[test]
    fn vertical_fill_grows_upwards() {
        let mut b = bar().vertical();
        b.set_fill(0.5);
        let mut mb = MeshBuilder::new();
        b.render(&mut mb);
        assert_eq!(mb.quad_count(), 2);
        // Top-right corner of the filled quad.
        assert_eq!(mb.vertices()[7].position(), Vec2::new(10.0, 1.0));
    }
}
