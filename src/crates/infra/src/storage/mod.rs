pub mod cloudinary;
pub mod factory;
pub mod local;

pub use cloudinary::CloudinaryAssetHost;
pub use factory::AssetHostFactory;
pub use local::LocalAssetHost;
