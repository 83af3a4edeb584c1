pub mod config;
pub mod db;
pub mod dispatch;
pub mod email;
pub mod gate;
pub mod models;
pub mod server;
pub mod template;
