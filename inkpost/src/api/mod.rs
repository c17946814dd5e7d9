pub mod access;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod payload;
pub mod router;
pub mod views;

#[cfg(test)]
pub mod test_utils;

#[cfg(test)]
mod access_tests;
