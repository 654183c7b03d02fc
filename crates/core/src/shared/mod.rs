pub mod constants;
pub mod frame;
pub mod model_stager;
pub mod region;
pub mod stream_info;
