pub mod album;
pub mod song;
pub mod value;
