pub mod bootstrap;
pub mod config;
pub mod context;
pub mod dom;
pub mod error;
pub mod fetch;
pub mod include;
pub mod modal;
pub mod paths;
pub mod slideshow;
pub mod team;
pub mod view;
pub mod year;

pub use config::SiteConfig;
pub use context::SiteContext;
pub use error::SiteError;
