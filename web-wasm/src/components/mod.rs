pub mod camera_panel;
pub mod header;
pub mod registration_form;
pub mod upload_form;
pub mod warning_banner;
