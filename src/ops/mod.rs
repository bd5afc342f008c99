pub mod filter;
pub mod install;
pub mod store;
