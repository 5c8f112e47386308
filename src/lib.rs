#![forbid(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod favorites;
pub mod formats;
pub mod kv_store;
pub mod logging;
pub mod preferences;
pub mod query;
pub mod render;
pub mod session;
pub mod shell;
pub mod view;
pub mod wishlist;
