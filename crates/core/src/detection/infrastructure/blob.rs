use crate::shared::frame::Frame;

/// Builds the OpenCV-style input tensor the three networks expect.
///
/// The frame is stretch-resized to `size` x `size` (no letterboxing — the
/// models were trained on stretched input), channels are reordered RGB→BGR,
/// and the per-channel `mean` (given in B, G, R order) is subtracted.
/// Output layout is NCHW float32 with scale factor 1.0 (no division by 255).
pub fn mean_subtracted_blob(frame: &Frame, size: u32, mean: [f32; 3]) -> ndarray::Array4<f32> {
    let resized = frame.resize(size, size);
    let src = resized.as_ndarray();
    let n = size as usize;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, n, n));
    for y in 0..n {
        for x in 0..n {
            for c in 0..3 {
                // channel c of the blob reads source channel 2-c (BGR)
                tensor[[0, c, y, x]] = src[[y, x, 2 - c]] as f32 - mean[c];
            }
        }
    }
    tensor
}
