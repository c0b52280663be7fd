pub mod ability;
pub mod catalog;
pub mod health;
pub mod roles;
pub mod teams;
pub mod users;
