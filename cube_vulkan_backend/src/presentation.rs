pub mod image_views;
pub mod swap_chain;
