pub mod album;
pub mod asset;
pub mod catalog;
pub mod shared;
pub mod song;
