//! Platform-free logic behind the nightsky page decorations.
//!
//! Nothing in this crate touches a browser API. DOM access, timers and
//! network calls are reached through the small traits in [`http`],
//! [`contact`], [`repos`], [`navigation`] and [`starfield`], which the web
//! crate implements and the tests script.

pub mod config;
pub mod contact;
pub mod http;
pub mod navigation;
pub mod repos;
pub mod starfield;
pub mod svg;

pub use config::SiteConfig;
