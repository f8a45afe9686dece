pub mod addresses;
pub mod catalog;
pub mod health;
pub mod roles;
pub mod sales;
pub mod users;
