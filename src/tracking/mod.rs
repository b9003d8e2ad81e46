pub mod number;
pub mod status;
pub mod timeline;
