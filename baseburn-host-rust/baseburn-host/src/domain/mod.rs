pub mod error;
pub mod manifest;

pub use error::HostError;
pub use manifest::{AccountAssociation, FrameMetadata, MiniAppManifest};
