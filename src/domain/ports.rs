use crate::domain::model::{SessionInfo, ShortLink};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 短網址後端的 HTTP 契約
#[async_trait]
pub trait ShortenerApi: Send + Sync {
    async fn shorten(&self, long_url: &str) -> Result<ShortLink>;
    async fn resolve(&self, short_code: &str) -> Result<String>;
    async fn click_count(&self, short_code: &str) -> Result<u64>;
    /// 未登入時回傳 `None`
    async fn current_user(&self) -> Result<Option<SessionInfo>>;
    async fn logout(&self) -> Result<()>;
}

pub trait TokenStore: Send + Sync {
    fn load(&self) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn save(&self, token: &str) -> impl std::future::Future<Output = Result<()>> + Send;
    fn clear(&self) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 各版本後端對短碼路徑的配置不同
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum RouteStyle {
    /// `/url/{code}` 與 `/url/{code}/stats`
    #[default]
    Prefixed,
    /// `/{code}` 與 `/{code}/stats`
    Root,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum AuthTransport {
    #[default]
    Bearer,
    Cookie,
}

pub trait ConfigProvider: Send + Sync {
    fn api_base(&self) -> &str;
    fn route_style(&self) -> RouteStyle;
    fn timeout(&self) -> Duration;
    fn token_file(&self) -> &str;
    fn auth_transport(&self) -> AuthTransport;
}
