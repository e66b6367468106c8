//! sea-orm entities for the store database.

pub mod app_settings;
pub mod order_items;
pub mod orders;
pub mod payment_hook_deliveries;
pub mod payment_hooks;
pub mod products;
pub mod users;
