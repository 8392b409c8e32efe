pub mod analyze_frame_use_case;
pub mod detection_history;
