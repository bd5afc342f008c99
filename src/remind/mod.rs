pub mod notify;
pub mod scheduler;
