pub mod debug;
pub mod platform;
pub mod result;
pub mod tools;
pub mod validation;
