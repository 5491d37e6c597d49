use crate::core::routes::Routes;
use crate::domain::model::{
    ApiErrorBody, ClickCount, ResolveResponse, SessionInfo, ShortLink, ShortenRequest,
    ShortenResponse,
};
use crate::domain::ports::{AuthTransport, ConfigProvider, ShortenerApi};
use crate::utils::error::{Result, ShortenerError};
use async_trait::async_trait;
use reqwest::header::{COOKIE, LOCATION};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use url::{ParseError, Url};

const USER_AGENT: &str = concat!("sniplink/", env!("CARGO_PKG_VERSION"));

/// reqwest 實作的後端客戶端，不跟隨轉址也不重試
#[derive(Debug, Clone)]
pub struct HttpShortenerClient {
    client: Client,
    routes: Routes,
    token: Option<String>,
    transport: AuthTransport,
}

impl HttpShortenerClient {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let routes = Routes::new(config.api_base(), config.route_style())?;
        // resolve 需要讀取 3xx 的 Location，所以一律關閉自動轉址
        let client = Client::builder()
            .timeout(config.timeout())
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            routes,
            token: None,
            transport: config.auth_transport(),
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match (&self.token, self.transport) {
            (Some(token), AuthTransport::Bearer) => request.bearer_auth(token),
            (Some(token), AuthTransport::Cookie) => {
                request.header(COOKIE, format!("jwt={}", token))
            }
            (None, _) => request,
        }
    }

    async fn get(&self, url: Url) -> Result<Response> {
        tracing::debug!("GET {}", url);
        let response = self.authorize(self.client.get(url)).send().await?;
        tracing::debug!("Response status: {}", response.status());
        Ok(response)
    }

    fn short_link_from(&self, body: ShortenResponse) -> Result<ShortLink> {
        let code = body.short_code.filter(|c| !c.trim().is_empty());
        let url = body.short_url.filter(|u| !u.trim().is_empty());

        match (code, url) {
            (Some(code), Some(url)) => Ok(ShortLink { code, url }),
            (Some(code), None) => {
                let url = self.routes.short_link(&code)?;
                Ok(ShortLink { code, url })
            }
            (None, Some(url)) => {
                let absolute = match Url::parse(&url) {
                    Ok(parsed) => Some(parsed),
                    Err(ParseError::RelativeUrlWithoutBase) if url.contains('/') => {
                        Some(self.routes.absolute(&url)?)
                    }
                    Err(_) => None,
                };

                match absolute {
                    Some(parsed) => {
                        let code = parsed
                            .path_segments()
                            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
                            .map(str::to_string)
                            .ok_or_else(|| {
                                ShortenerError::malformed(format!("short URL has no code: {}", url))
                            })?;
                        let url = if url.contains("://") { url } else { parsed.to_string() };
                        Ok(ShortLink { code, url })
                    }
                    // 舊版後端的 shortUrl 其實只是短碼
                    None => Ok(ShortLink {
                        url: self.routes.short_link(&url)?,
                        code: url,
                    }),
                }
            }
            (None, None) => Err(ShortenerError::malformed(
                "response carries neither shortCode nor shortUrl",
            )),
        }
    }
}

async fn api_error(response: Response) -> ShortenerError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let parsed: ApiErrorBody = serde_json::from_str(&body).unwrap_or_default();
    tracing::warn!(
        "Backend rejected request with {} ({})",
        status,
        parsed.error_code.as_deref().unwrap_or("no error code")
    );

    ShortenerError::Api {
        status: status.as_u16(),
        code: parsed.error_code.clone(),
        message: parsed.into_message(),
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| ShortenerError::malformed(format!("{} body: {} ({})", what, e, body.trim())))
}

#[async_trait]
impl ShortenerApi for HttpShortenerClient {
    async fn shorten(&self, long_url: &str) -> Result<ShortLink> {
        let url = self.routes.shorten();
        tracing::debug!("POST {}", url);

        let request = self.client.post(url).json(&ShortenRequest {
            long_url: long_url.to_string(),
        });
        let response = self.authorize(request).send().await?;
        tracing::debug!("Response status: {}", response.status());

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: ShortenResponse = read_json(response, "shorten").await?;
        self.short_link_from(body)
    }

    async fn resolve(&self, short_code: &str) -> Result<String> {
        let response = self.get(self.routes.resolve(short_code)?).await?;
        let status = response.status();

        if status.is_redirection() {
            return response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(|location| location.trim().to_string())
                .filter(|location| !location.is_empty())
                .ok_or_else(|| ShortenerError::malformed("redirect without Location header"));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ShortenerError::NotFound {
                short_code: short_code.to_string(),
            });
        }

        if !status.is_success() {
            return Err(api_error(response).await);
        }

        let body: ResolveResponse = read_json(response, "resolve").await?;
        body.long_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ShortenerError::malformed("resolve body carries no longUrl"))
    }

    async fn click_count(&self, short_code: &str) -> Result<u64> {
        let response = self.get(self.routes.stats(short_code)?).await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ShortenerError::NotFound {
                short_code: short_code.to_string(),
            });
        }

        if !status.is_success() {
            return Err(api_error(response).await);
        }

        let count: ClickCount = read_json(response, "stats").await?;
        Ok(count.value())
    }

    async fn current_user(&self) -> Result<Option<SessionInfo>> {
        let response = self.get(self.routes.current_user()).await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::debug!("No authenticated session");
            return Ok(None);
        }

        if !status.is_success() {
            return Err(api_error(response).await);
        }

        let info: SessionInfo = read_json(response, "session").await?;
        Ok(Some(info))
    }

    async fn logout(&self) -> Result<()> {
        let response = self.get(self.routes.logout()).await?;
        let status = response.status();

        if status.is_success() || status.is_redirection() {
            Ok(())
        } else {
            Err(api_error(response).await)
        }
    }
}
