pub mod api_server;
pub mod bootstrap;
pub mod pagination;
pub mod moderation;
