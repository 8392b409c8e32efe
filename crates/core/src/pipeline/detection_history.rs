use std::collections::VecDeque;
use std::sync::Mutex;

use crate::detection::domain::face_detection::FaceDetection;
use crate::shared::constants::HISTORY_CAPACITY;

/// Bounded FIFO ring of the most recent detections.
///
/// The only shared mutable state in the system: concurrent requests append
/// here, so append-and-trim runs under one lock. Eviction is oldest-first,
/// never by access order.
pub struct DetectionHistory {
    entries: Mutex<VecDeque<FaceDetection>>,
    capacity: usize,
}

impl DetectionHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn push(&self, detection: FaceDetection) {
        let mut entries = self.entries.lock().unwrap();
        entries.push_back(detection);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    pub fn extend(&self, detections: impl IntoIterator<Item = FaceDetection>) {
        let mut entries = self.entries.lock().unwrap();
        for detection in detections {
            entries.push_back(detection);
            while entries.len() > self.capacity {
                entries.pop_front();
            }
        }
    }

    /// Oldest-to-newest copy of the retained detections.
    pub fn snapshot(&self) -> Vec<FaceDetection> {
        self.entries.lock().unwrap().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DetectionHistory {
    fn default() -> Self {
        Self::new()
    }
}
