pub use cache::{CacheStatus, Cacheable, RenderPolicy, RevalidationCache};
pub use client::ContentClient;
pub use cms::{CmsSettings, ContentSource, ImageUrlBuilder, SanityHttpSource};
pub use config::SiteConfig;
pub use contact::{ContactForm, ContactSettings, Mailer, ResendMailer};
pub use error::{CmsError, ContactError, Result, ServerError};
pub use fetched::Fetched;
pub use model::*;
pub use pages::{PageOutput, Route, SiteInfo, SiteRenderer};

pub mod cache;
pub mod client;
pub mod cms;
pub mod config;
pub mod contact;
pub mod error;
pub mod fetched;
mod model;
pub mod pages;
pub mod render;
pub mod server;
