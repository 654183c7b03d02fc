pub mod directory_permission_gate;
pub mod image_file_sink;
pub mod image_sequence_source;
