pub mod addresses;
pub mod catalog;
pub mod sales;
pub mod users;
