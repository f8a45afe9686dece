pub mod address_repo;
pub mod error;
pub mod product_repo;
pub mod region_repo;
pub mod role_repo;
pub mod sale_repo;
pub mod user_repo;
