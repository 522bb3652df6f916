pub mod buffers;
pub mod descriptors;
