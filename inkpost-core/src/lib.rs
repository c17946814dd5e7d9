pub mod authorization;
pub mod models;
pub mod moderation;
pub mod pagination;
pub mod representation;
pub mod settings;
pub mod utils;
pub mod validation;
