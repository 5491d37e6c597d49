use crate::domain::model::ShortLink;
use crate::domain::ports::ShortenerApi;
use crate::utils::error::ShortenerError;

pub const NETWORK_ERROR: &str = "Network error. Is the backend running?";
pub const GENERIC_ERROR: &str = "Something went wrong";
pub const RESOLVE_ERROR: &str = "Could not resolve — short code may be invalid.";
pub const STATS_ERROR: &str = "Could not fetch stats.";
pub const STATS_NETWORK_ERROR: &str = "Network error.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Shorten,
    Fetch,
}

impl Mode {
    pub fn heading(self) -> &'static str {
        match self {
            Mode::Shorten => "Shorten URL",
            Mode::Fetch => "Fetch Link",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 輸入為空或同一動作仍在進行，沒有送出請求
    Skipped,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortenPanel {
    pub long_url: String,
    pub short_link: Option<ShortLink>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchPanel {
    pub code: String,
    pub resolved_url: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsPanel {
    pub click_count: Option<u64>,
    pub loading: bool,
    pub error: Option<String>,
}

/// 縮短／查詢表單的完整狀態：模式、輸入、結果、載入中旗標與錯誤訊息
pub struct LinkForm<A: ShortenerApi> {
    api: A,
    mode: Mode,
    shorten: ShortenPanel,
    fetch: FetchPanel,
    stats: StatsPanel,
}

impl<A: ShortenerApi> LinkForm<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            mode: Mode::default(),
            shorten: ShortenPanel::default(),
            fetch: FetchPanel::default(),
            stats: StatsPanel::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn shorten_panel(&self) -> &ShortenPanel {
        &self.shorten
    }

    pub fn fetch_panel(&self) -> &FetchPanel {
        &self.fetch
    }

    pub fn stats_panel(&self) -> &StatsPanel {
        &self.stats
    }

    pub fn set_long_url(&mut self, value: impl Into<String>) {
        self.shorten.long_url = value.into();
    }

    pub fn set_code(&mut self, value: impl Into<String>) {
        self.fetch.code = value.into();
    }

    pub fn can_shorten(&self) -> bool {
        !self.shorten.loading && !self.shorten.long_url.trim().is_empty()
    }

    pub fn can_resolve(&self) -> bool {
        !self.fetch.loading && !self.fetch.code.trim().is_empty()
    }

    pub fn can_fetch_stats(&self) -> bool {
        !self.stats.loading && !self.fetch.code.trim().is_empty()
    }

    pub async fn submit_shorten(&mut self) -> Outcome {
        if !self.can_shorten() {
            return Outcome::Skipped;
        }

        self.shorten.error = None;
        self.shorten.short_link = None;

        let result = {
            let _loading = LoadingGuard::new(&mut self.shorten.loading);
            self.api.shorten(&self.shorten.long_url).await
        };

        match result {
            Ok(link) => {
                tracing::info!("✅ Shortened to {}", link.url);
                self.shorten.short_link = Some(link);
                Outcome::Succeeded
            }
            Err(e) => {
                tracing::warn!("Shorten failed: {}", e);
                self.shorten.error = Some(shorten_message(&e));
                Outcome::Failed
            }
        }
    }

    pub async fn submit_resolve(&mut self) -> Outcome {
        if !self.can_resolve() {
            return Outcome::Skipped;
        }

        self.fetch.error = None;
        self.fetch.resolved_url = None;
        self.stats.click_count = None;
        self.stats.error = None;

        let code = self.fetch.code.trim().to_string();
        let result = {
            let _loading = LoadingGuard::new(&mut self.fetch.loading);
            self.api.resolve(&code).await
        };

        match result {
            Ok(long_url) => {
                tracing::info!("✅ {} resolves to {}", code, long_url);
                self.fetch.resolved_url = Some(long_url);
                Outcome::Succeeded
            }
            Err(e) => {
                tracing::warn!("Resolve of {} failed: {}", code, e);
                self.fetch.error = Some(resolve_message(&e));
                Outcome::Failed
            }
        }
    }

    pub async fn submit_stats(&mut self) -> Outcome {
        if !self.can_fetch_stats() {
            return Outcome::Skipped;
        }

        self.stats.error = None;
        self.stats.click_count = None;

        let code = self.fetch.code.trim().to_string();
        let result = {
            let _loading = LoadingGuard::new(&mut self.stats.loading);
            self.api.click_count(&code).await
        };

        match result {
            Ok(count) => {
                tracing::info!("📊 {} has {} clicks", code, count);
                self.stats.click_count = Some(count);
                Outcome::Succeeded
            }
            Err(e) => {
                tracing::warn!("Stats for {} failed: {}", code, e);
                self.stats.error = Some(stats_message(&e));
                Outcome::Failed
            }
        }
    }

    /// 切換模式會清掉所有結果與錯誤，但保留輸入框內容
    pub fn switch_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.shorten.error = None;
        self.shorten.short_link = None;
        self.fetch.error = None;
        self.fetch.resolved_url = None;
        self.stats.click_count = None;
        self.stats.error = None;
    }

    pub fn dismiss_errors(&mut self) {
        self.shorten.error = None;
        self.fetch.error = None;
        self.stats.error = None;
    }

    pub fn has_error(&self) -> bool {
        self.shorten.error.is_some() || self.fetch.error.is_some() || self.stats.error.is_some()
    }
}

/// 請求期間維持 loading，結束或 future 被取消時都會清除
struct LoadingGuard<'a>(&'a mut bool);

impl<'a> LoadingGuard<'a> {
    fn new(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

fn shorten_message(error: &ShortenerError) -> String {
    match error {
        ShortenerError::Network(_) => NETWORK_ERROR.to_string(),
        ShortenerError::Api {
            message: Some(message),
            ..
        } if !message.trim().is_empty() => message.clone(),
        _ => GENERIC_ERROR.to_string(),
    }
}

fn resolve_message(error: &ShortenerError) -> String {
    match error {
        ShortenerError::Network(_) => NETWORK_ERROR.to_string(),
        _ => RESOLVE_ERROR.to_string(),
    }
}

fn stats_message(error: &ShortenerError) -> String {
    match error {
        ShortenerError::Network(_) => STATS_NETWORK_ERROR.to_string(),
        _ => STATS_ERROR.to_string(),
    }
}
