pub mod cache;
pub mod db;
pub mod hooks;
pub mod mail;
pub mod mercadopago;
