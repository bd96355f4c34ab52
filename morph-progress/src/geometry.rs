//! Size-derived geometry of the indicator.

use glam::Vec2;

/// Share of the full radius used as the resting indeterminate radius.
const INDETERMINATE_MIN_RADIUS_RATIO: f32 = 0.8;

/// Axis-aligned rectangle the progress arcs are inscribed in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ArcBounds {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
}

impl ArcBounds {
    /// Width of the rectangle.
    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height of the rectangle.
    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Center point of the rectangle.
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) * 0.5,
            (self.top + self.bottom) * 0.5,
        )
    }
}

/// Everything `on_size_changed` derives from the view size and stroke width.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewMetrics {
    /// View center.
    pub center: Vec2,
    /// Largest radius that fits the view.
    pub radius: f32,
    /// Smallest radius of the indeterminate pulse.
    pub indeterminate_min_radius: f32,
    /// How much the pulse grows beyond its minimum.
    pub indeterminate_delta_radius: f32,
    /// Radius the pulse collapses to before it becomes the arc's head.
    pub collapsed_radius: f32,
    /// Arc rectangle, inset by the stroke width.
    pub arc_bounds: ArcBounds,
}

impl ViewMetrics {
    /// Computes metrics for a `width` x `height` view.
    pub fn new(width: f32, height: f32, stroke_width: f32) -> Self {
        let center = Vec2::new(width * 0.5, height * 0.5);
        let radius = center.x.min(center.y);
        let indeterminate_min_radius = radius * INDETERMINATE_MIN_RADIUS_RATIO;

        Self {
            center,
            radius,
            indeterminate_min_radius,
            indeterminate_delta_radius: radius - indeterminate_min_radius,
            collapsed_radius: stroke_width * 0.5,
            arc_bounds: ArcBounds {
                left: center.x - radius + stroke_width,
                top: center.y - radius + stroke_width,
                right: center.x + radius - stroke_width,
                bottom: center.y + radius - stroke_width,
            },
        }
    }

    /// Largest radius of the indeterminate pulse.
    #[inline]
    pub fn indeterminate_max_radius(&self) -> f32 {
        self.indeterminate_min_radius + self.indeterminate_delta_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_view_metrics() {
        let metrics = ViewMetrics::new(200.0, 200.0, 16.0);
        assert_eq!(metrics.center, Vec2::new(100.0, 100.0));
        assert_eq!(metrics.radius, 100.0);
        assert_eq!(metrics.indeterminate_min_radius, 80.0);
        assert_eq!(metrics.indeterminate_delta_radius, 20.0);
        assert_eq!(metrics.indeterminate_max_radius(), 100.0);
        assert_eq!(metrics.collapsed_radius, 8.0);
        assert_eq!(
            metrics.arc_bounds,
            ArcBounds {
                left: 16.0,
                top: 16.0,
                right: 184.0,
                bottom: 184.0,
            }
        );
    }

    #[test]
    fn test_wide_view_uses_shorter_side() {
        let metrics = ViewMetrics::new(300.0, 100.0, 10.0);
        assert_eq!(metrics.radius, 50.0);
        assert_eq!(metrics.arc_bounds.width(), 80.0);
        assert_eq!(metrics.arc_bounds.height(), 80.0);
        assert_eq!(metrics.arc_bounds.center(), metrics.center);
    }
}
