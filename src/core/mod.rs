pub mod batch;
pub mod client;
pub mod form;
pub mod interactive;
pub mod routes;
pub mod session;
pub mod view;

pub use crate::domain::model::{ClickCount, SessionInfo, ShortLink};
pub use crate::domain::ports::{ConfigProvider, ShortenerApi, TokenStore};
pub use crate::utils::error::Result;
