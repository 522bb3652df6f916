pub mod vulkan_app;
