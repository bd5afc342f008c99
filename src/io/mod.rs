pub mod config_io;
pub mod gateway;
pub mod local;
pub mod remote;
pub mod state;
