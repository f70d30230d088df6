//! Image operations: generation, editing, upscaling, background removal.

mod background;
mod edit;
mod generate;
mod types;
mod upscale;

pub use edit::{EditImageRequest, DEFAULT_EDIT_MODEL};
pub use generate::{GenerateImageRequest, DEFAULT_GENERATE_MODEL};
pub use types::{to_data_uri, GeneratedImage, ImageFormat};
pub use upscale::UpscaleRequest;
