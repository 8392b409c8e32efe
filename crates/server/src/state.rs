use std::sync::Mutex;

use agelens_core::pipeline::analyze_frame_use_case::AnalyzeFrameUseCase;
use agelens_core::pipeline::detection_history::DetectionHistory;

/// Process-wide state: the networks are loaded once at startup and the use
/// case holding them lives for the process lifetime. Inference borrows the
/// sessions mutably, so concurrent requests serialize on the mutex.
pub struct AppState {
    pub pipeline: Mutex<AnalyzeFrameUseCase>,
    pub history: DetectionHistory,
}

impl AppState {
    pub fn new(pipeline: AnalyzeFrameUseCase) -> Self {
        Self {
            pipeline: Mutex::new(pipeline),
            history: DetectionHistory::new(),
        }
    }
}
