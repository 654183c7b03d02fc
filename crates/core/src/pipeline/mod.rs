pub mod configuration_controller;
pub mod face_size_threshold;
pub mod frame_annotator;
pub mod frame_processor;
pub mod pipeline_logger;
pub mod stream_runner;
