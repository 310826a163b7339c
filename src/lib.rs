pub mod app;
pub mod cmd;
pub mod config;
pub mod error;
pub mod features;
pub mod kube;
pub mod logging;
pub mod message;
pub mod notification;
pub mod route;
pub mod scope;
pub mod signal;
pub mod workers;
