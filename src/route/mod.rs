pub mod about;
pub mod auth;
pub mod docs;
pub mod events;
pub mod health;
pub mod message;
pub mod model;
pub mod post;
pub mod profile;
pub mod upload;
