pub mod archive_upload;
pub mod custom_resource;
pub mod environment;
pub mod service_image;
