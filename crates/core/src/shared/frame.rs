use ndarray::ArrayView3;

use crate::shared::bounding_box::BoundingBox;

/// A single image frame: contiguous RGB bytes in row-major order.
///
/// Format conversion happens at I/O boundaries only; the pipeline
/// treats pixel data as opaque until blob construction.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Extracts the face region under `bbox`, clamping to frame bounds first.
    ///
    /// Clamping rule: `x1' = max(0, x1)`, `y1' = max(0, y1)`,
    /// `x2' = min(x2, width-1)`, `y2' = min(y2, height-1)`; the slice upper
    /// bounds are exclusive. Returns `None` when the clamped region has zero
    /// area (box entirely outside the frame or collapsed to a line), in which
    /// case the caller skips the face.
    pub fn crop(&self, bbox: &BoundingBox) -> Option<Frame> {
        let clamped = bbox.clamped(self.width, self.height);
        let w = clamped.x2 - clamped.x1;
        let h = clamped.y2 - clamped.y1;
        if w <= 0 || h <= 0 {
            return None;
        }

        let ch = self.channels as usize;
        let row_stride = self.width as usize * ch;
        let mut data = Vec::with_capacity(w as usize * h as usize * ch);
        for row in clamped.y1..clamped.y2 {
            let start = row as usize * row_stride + clamped.x1 as usize * ch;
            data.extend_from_slice(&self.data[start..start + w as usize * ch]);
        }
        Some(Frame::new(data, w as u32, h as u32, self.channels))
    }

    /// Nearest-neighbor resize to the given dimensions.
    pub fn resize(&self, new_width: u32, new_height: u32) -> Frame {
        let src = self.as_ndarray();
        let sx = self.width as f64 / new_width as f64;
        let sy = self.height as f64 / new_height as f64;
        let ch = self.channels as usize;

        let mut data = Vec::with_capacity(new_width as usize * new_height as usize * ch);
        for y in 0..new_height as usize {
            let src_y = ((y as f64 * sy) as usize).min(self.height as usize - 1);
            for x in 0..new_width as usize {
                let src_x = ((x as f64 * sx) as usize).min(self.width as usize - 1);
                for c in 0..ch {
                    data.push(src[[src_y, src_x, c]]);
                }
            }
        }
        Frame::new(data, new_width, new_height, self.channels)
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x1: i32, y1: i32, x2: i32, y2: i32) -> BoundingBox {
        BoundingBox { x1, y1, x2, y2 }
    }

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, 3);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * channels")]
    fn test_mismatched_data_length_panics_in_debug() {
        let data = vec![0u8; 10]; // wrong size for 2x2x3
        Frame::new(data, 2, 2, 3);
    }

    #[test]
    fn test_as_ndarray_shape() {
        let data = vec![0u8; 24]; // 2x4x3
        let frame = Frame::new(data, 4, 2, 3);
        let arr = frame.as_ndarray();
        assert_eq!(arr.shape(), &[2, 4, 3]); // (height, width, channels)
    }

    #[test]
    fn test_as_ndarray_pixel_access() {
        // 2x2 RGB: set pixel (row=1, col=0) to red
        let mut data = vec![0u8; 12];
        data[6] = 255; // row=1, col=0, R
        let frame = Frame::new(data, 2, 2, 3);
        let arr = frame.as_ndarray();
        assert_eq!(arr[[1, 0, 0]], 255); // R
        assert_eq!(arr[[1, 0, 1]], 0); // G
        assert_eq!(arr[[1, 0, 2]], 0); // B
    }

    #[test]
    fn test_crop_interior_region() {
        // 4x4, pixel value = row * 4 + col in the R channel
        let mut data = vec![0u8; 48];
        for row in 0..4 {
            for col in 0..4 {
                data[(row * 4 + col) * 3] = (row * 4 + col) as u8;
            }
        }
        let frame = Frame::new(data, 4, 4, 3);
        let crop = frame.crop(&bbox(1, 1, 3, 3)).unwrap();
        assert_eq!(crop.width(), 2);
        assert_eq!(crop.height(), 2);
        // top-left of crop is frame pixel (row=1, col=1)
        assert_eq!(crop.data()[0], 5);
    }

    #[test]
    fn test_crop_clamps_to_frame_bounds() {
        let frame = Frame::new(vec![7u8; 10 * 10 * 3], 10, 10, 3);
        // Overhangs every edge; clamps to [0, 9) x [0, 9)
        let crop = frame.crop(&bbox(-5, -5, 20, 20)).unwrap();
        assert_eq!(crop.width(), 9);
        assert_eq!(crop.height(), 9);
    }

    #[test]
    fn test_crop_outside_frame_is_none() {
        let frame = Frame::new(vec![0u8; 10 * 10 * 3], 10, 10, 3);
        assert!(frame.crop(&bbox(50, 50, 80, 80)).is_none());
        assert!(frame.crop(&bbox(-30, -30, -10, -10)).is_none());
    }

    #[test]
    fn test_crop_zero_area_is_none() {
        let frame = Frame::new(vec![0u8; 10 * 10 * 3], 10, 10, 3);
        // Collapses to a vertical line after clamping
        assert!(frame.crop(&bbox(3, 2, 3, 8)).is_none());
    }

    #[test]
    fn test_resize_dimensions() {
        let frame = Frame::new(vec![128u8; 8 * 4 * 3], 8, 4, 3);
        let resized = frame.resize(4, 2);
        assert_eq!(resized.width(), 4);
        assert_eq!(resized.height(), 2);
        assert_eq!(resized.data().len(), 4 * 2 * 3);
    }

    #[test]
    fn test_resize_preserves_uniform_color() {
        let frame = Frame::new(vec![42u8; 6 * 6 * 3], 6, 6, 3);
        let resized = frame.resize(3, 3);
        assert!(resized.data().iter().all(|&v| v == 42));
    }

    #[test]
    fn test_resize_upscale() {
        let frame = Frame::new(vec![9u8; 2 * 2 * 3], 2, 2, 3);
        let resized = frame.resize(4, 4);
        assert_eq!(resized.width(), 4);
        assert!(resized.data().iter().all(|&v| v == 9));
    }
}
