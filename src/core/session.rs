use crate::core::routes::Routes;
use crate::domain::model::SessionInfo;
use crate::domain::ports::{ShortenerApi, TokenStore};
use crate::utils::error::{Result, ShortenerError};
use url::Url;

/// 客戶端的登入狀態：只負責保存、查詢與清除後端發出的 token
pub struct SessionManager<'a, A: ShortenerApi, S: TokenStore> {
    api: &'a A,
    store: &'a S,
    routes: &'a Routes,
}

impl<'a, A: ShortenerApi, S: TokenStore> SessionManager<'a, A, S> {
    pub fn new(api: &'a A, store: &'a S, routes: &'a Routes) -> Self {
        Self { api, store, routes }
    }

    pub fn login_url(&self, provider: &str) -> Result<Url> {
        crate::utils::validation::validate_non_empty_string("provider", provider)?;
        Ok(self.routes.login(provider.trim()))
    }

    /// 處理登入回呼網址；沒有 token 時什麼都不存，仍視為成功
    pub async fn complete_login(&self, callback_url: &str) -> Result<bool> {
        match extract_callback_token(callback_url)? {
            Some(token) => {
                self.store.save(&token).await?;
                tracing::info!("🔑 Sign-in token stored");
                Ok(true)
            }
            None => {
                tracing::warn!("Callback URL carried no token, nothing stored");
                Ok(false)
            }
        }
    }

    pub async fn store_token(&self, token: &str) -> Result<()> {
        crate::utils::validation::validate_non_empty_string("token", token)?;
        self.store.save(token).await
    }

    pub async fn current_user(&self) -> Result<Option<SessionInfo>> {
        self.api.current_user().await
    }

    /// 先清掉本機 token 再通知後端，後端失敗時本機狀態仍是登出
    pub async fn logout(&self) -> Result<()> {
        self.store.clear().await?;
        tracing::info!("Local session token cleared");

        if let Err(e) = self.api.logout().await {
            tracing::warn!("Backend logout failed after clearing local token: {}", e);
            return Err(e);
        }
        Ok(())
    }
}

pub fn extract_callback_token(callback_url: &str) -> Result<Option<String>> {
    let url = Url::parse(callback_url.trim()).map_err(|e| ShortenerError::ValidationError {
        message: format!("Invalid callback URL '{}': {}", callback_url, e),
    })?;

    Ok(url
        .query_pairs()
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.trim().to_string())
        .filter(|token| !token.is_empty()))
}
