pub mod camera;
pub mod photo;

pub use camera::BrowserCamera;
pub use photo::ImagePhotoLoader;
