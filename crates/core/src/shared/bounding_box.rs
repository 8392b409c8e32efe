/// Axis-aligned face box in frame pixel coordinates.
///
/// Coordinates may lie outside the frame until [`BoundingBox::clamped`]
/// is applied; detector output occasionally overhangs the edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    /// Converts detector coordinates in [0, 1] to pixel space.
    ///
    /// Truncates toward zero, matching the integer casts the face
    /// detector's reference decoding uses.
    pub fn from_normalized(nx1: f32, ny1: f32, nx2: f32, ny2: f32, frame_w: u32, frame_h: u32) -> Self {
        Self {
            x1: (nx1 * frame_w as f32) as i32,
            y1: (ny1 * frame_h as f32) as i32,
            x2: (nx2 * frame_w as f32) as i32,
            y2: (ny2 * frame_h as f32) as i32,
        }
    }

    /// Clamps to `[0, frame_w-1] x [0, frame_h-1]`.
    ///
    /// The result can still be empty (x2 <= x1 or y2 <= y1) when the
    /// original box lies entirely outside the frame.
    pub fn clamped(&self, frame_w: u32, frame_h: u32) -> Self {
        Self {
            x1: self.x1.max(0),
            y1: self.y1.max(0),
            x2: self.x2.min(frame_w as i32 - 1),
            y2: self.y2.min(frame_h as i32 - 1),
        }
    }

    /// Maps a box detected on a frame downscaled by `scale` (< 1.0) back to
    /// original-frame coordinates. Truncates toward zero.
    pub fn scale_up(&self, scale: f64) -> Self {
        Self {
            x1: (self.x1 as f64 / scale) as i32,
            y1: (self.y1 as f64 / scale) as i32,
            x2: (self.x2 as f64 / scale) as i32,
            y2: (self.y2 as f64 / scale) as i32,
        }
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_from_normalized_scales_by_frame_size() {
        let b = BoundingBox::from_normalized(0.25, 0.5, 0.75, 1.0, 400, 200);
        assert_eq!(b, BoundingBox { x1: 100, y1: 100, x2: 300, y2: 200 });
    }

    #[test]
    fn test_from_normalized_truncates() {
        // 0.333 * 100 = 33.3 → 33, not 34
        let b = BoundingBox::from_normalized(0.333, 0.333, 0.999, 0.999, 100, 100);
        assert_eq!(b.x1, 33);
        assert_eq!(b.x2, 99);
    }

    #[test]
    fn test_clamped_inside_frame_unchanged() {
        let b = BoundingBox { x1: 10, y1: 20, x2: 30, y2: 40 };
        assert_eq!(b.clamped(100, 100), b);
    }

    #[test]
    fn test_clamped_bounds_invariant() {
        let b = BoundingBox { x1: -15, y1: -3, x2: 150, y2: 120 };
        let c = b.clamped(100, 80);
        assert_eq!(c, BoundingBox { x1: 0, y1: 0, x2: 99, y2: 79 });
        assert!(0 <= c.x1 && c.x1 <= c.x2 && c.x2 <= 99);
        assert!(0 <= c.y1 && c.y1 <= c.y2 && c.y2 <= 79);
    }

    #[test]
    fn test_clamped_fully_outside_is_empty() {
        let b = BoundingBox { x1: 200, y1: 200, x2: 250, y2: 250 };
        assert!(b.clamped(100, 100).is_empty());
    }

    #[test]
    fn test_scale_up_inverts_downscale() {
        // Detected on a frame downscaled by 0.5 → reported at 2x
        let b = BoundingBox { x1: 10, y1: 20, x2: 50, y2: 60 };
        let up = b.scale_up(0.5);
        assert_eq!(up, BoundingBox { x1: 20, y1: 40, x2: 100, y2: 120 });
    }

    #[test]
    fn test_scale_up_truncates() {
        let b = BoundingBox { x1: 10, y1: 10, x2: 20, y2: 20 };
        let up = b.scale_up(0.3);
        // 10 / 0.3 = 33.33 → 33; 20 / 0.3 = 66.67 → 66
        assert_eq!(up, BoundingBox { x1: 33, y1: 33, x2: 66, y2: 66 });
    }

    #[rstest]
    #[case::zero_width(BoundingBox { x1: 5, y1: 0, x2: 5, y2: 10 }, true)]
    #[case::zero_height(BoundingBox { x1: 0, y1: 5, x2: 10, y2: 5 }, true)]
    #[case::inverted(BoundingBox { x1: 10, y1: 10, x2: 5, y2: 5 }, true)]
    #[case::valid(BoundingBox { x1: 0, y1: 0, x2: 1, y2: 1 }, false)]
    fn test_is_empty(#[case] b: BoundingBox, #[case] expected: bool) {
        assert_eq!(b.is_empty(), expected);
    }
}
