pub mod buffer;
pub mod memory;
pub mod vertex_buffer;
