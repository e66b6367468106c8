pub mod repository;
pub mod signature;
pub mod types;
