pub mod account;
pub mod admin;
pub mod admin_payments;
pub mod admin_products;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod health;
pub mod mercadopago;
pub mod response;
pub mod session;
