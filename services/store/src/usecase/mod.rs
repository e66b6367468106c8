pub mod account;
pub mod admin_auth;
pub mod admin_payments;
pub mod admin_products;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod hooks;
pub mod input;
pub mod receipt;
pub mod settings;
pub mod webhook;
