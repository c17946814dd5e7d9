pub mod format;
pub mod secret;
pub mod slugify;
