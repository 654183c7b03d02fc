pub mod cascade_engine;
pub mod detector_bank;
pub mod detector_selection;
pub mod face_detector;
