mod account_test;
mod catalog_test;
mod helpers;
mod webhook_test;
