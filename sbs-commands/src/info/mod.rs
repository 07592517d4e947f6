pub mod about;
pub mod support;
