pub mod chat;
pub mod health;
pub mod notify;
pub mod sessions;
pub mod status;
