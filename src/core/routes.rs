pub use crate::domain::ports::RouteStyle;
use crate::utils::error::{Result, ShortenerError};
use url::Url;

/// 依基底網址與路徑配置組出後端端點
#[derive(Debug, Clone)]
pub struct Routes {
    base: Url,
    style: RouteStyle,
}

impl Routes {
    pub fn new(base: &str, style: RouteStyle) -> Result<Self> {
        let base = Url::parse(base).map_err(|e| ShortenerError::InvalidConfigValueError {
            field: "api.base_url".to_string(),
            value: base.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        if base.cannot_be_a_base() {
            return Err(ShortenerError::InvalidConfigValueError {
                field: "api.base_url".to_string(),
                value: base.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }
        Ok(Self { base, style })
    }

    pub fn style(&self) -> RouteStyle {
        self.style
    }

    pub fn shorten(&self) -> Url {
        self.join(&["shorten"])
    }

    pub fn resolve(&self, short_code: &str) -> Result<Url> {
        let code = code_segment(short_code)?;
        Ok(match self.style {
            RouteStyle::Prefixed => self.join(&["url", code]),
            RouteStyle::Root => self.join(&[code]),
        })
    }

    pub fn stats(&self, short_code: &str) -> Result<Url> {
        let code = code_segment(short_code)?;
        Ok(match self.style {
            RouteStyle::Prefixed => self.join(&["url", code, "stats"]),
            RouteStyle::Root => self.join(&[code, "stats"]),
        })
    }

    pub fn current_user(&self) -> Url {
        self.join(&["api", "me"])
    }

    pub fn logout(&self) -> Url {
        self.join(&["logout"])
    }

    pub fn login(&self, provider: &str) -> Url {
        self.join(&["oauth2", "authorization", provider])
    }

    /// 顯示給使用者的短網址
    pub fn short_link(&self, short_code: &str) -> Result<String> {
        Ok(self.resolve(short_code)?.to_string())
    }

    /// 後端回傳的相對路徑（如 `/url/abc`）接上基底網址
    pub fn absolute(&self, reference: &str) -> Result<Url> {
        self.base.join(reference).map_err(|e| {
            ShortenerError::malformed(format!("invalid short URL {}: {}", reference, e))
        })
    }

    // 每個 segment 各自 percent-encode，短碼不會跨越兩層路徑
    fn join(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// `.` 與 `..` 會被 URL 正規化成上一層路徑，無法當作單一路徑段送出
fn code_segment(short_code: &str) -> Result<&str> {
    match short_code {
        "" | "." | ".." => Err(ShortenerError::ValidationError {
            message: format!("'{}' is not a valid short code", short_code),
        }),
        code => Ok(code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_routes() {
        let routes = Routes::new("http://localhost:8080", RouteStyle::Prefixed).unwrap();
        assert_eq!(routes.shorten().as_str(), "http://localhost:8080/shorten");
        assert_eq!(routes.resolve("abc").unwrap().as_str(), "http://localhost:8080/url/abc");
        assert_eq!(
            routes.stats("abc").unwrap().as_str(),
            "http://localhost:8080/url/abc/stats"
        );
        assert_eq!(routes.current_user().as_str(), "http://localhost:8080/api/me");
        assert_eq!(routes.logout().as_str(), "http://localhost:8080/logout");
    }

    #[test]
    fn test_root_routes() {
        let routes = Routes::new("https://sn.ip/", RouteStyle::Root).unwrap();
        assert_eq!(routes.resolve("Zx9").unwrap().as_str(), "https://sn.ip/Zx9");
        assert_eq!(routes.stats("Zx9").unwrap().as_str(), "https://sn.ip/Zx9/stats");
        assert_eq!(routes.short_link("Zx9").unwrap(), "https://sn.ip/Zx9");
    }

    #[test]
    fn test_base_with_path_prefix() {
        let routes = Routes::new("https://api.example.com/v1/", RouteStyle::Prefixed).unwrap();
        assert_eq!(
            routes.shorten().as_str(),
            "https://api.example.com/v1/shorten"
        );
        assert_eq!(
            routes.login("github").as_str(),
            "https://api.example.com/v1/oauth2/authorization/github"
        );
    }

    #[test]
    fn test_short_code_is_a_single_segment() {
        let routes = Routes::new("http://localhost:8080", RouteStyle::Root).unwrap();
        assert_eq!(
            routes.resolve("a/b?c").unwrap().as_str(),
            "http://localhost:8080/a%2Fb%3Fc"
        );
    }

    #[test]
    fn test_dot_codes_are_rejected() {
        for style in [RouteStyle::Prefixed, RouteStyle::Root] {
            let routes = Routes::new("http://localhost:8080", style).unwrap();
            for code in [".", "..", ""] {
                assert!(matches!(
                    routes.resolve(code),
                    Err(ShortenerError::ValidationError { .. })
                ));
                assert!(routes.stats(code).is_err());
                assert!(routes.short_link(code).is_err());
            }
        }

        // 含點但不是純點的短碼照常編碼
        let routes = Routes::new("http://localhost:8080", RouteStyle::Prefixed).unwrap();
        assert_eq!(
            routes.stats("...").unwrap().as_str(),
            "http://localhost:8080/url/.../stats"
        );
    }

    #[test]
    fn test_absolute_joins_relative_short_url() {
        let routes = Routes::new("https://api.example.com/v1/", RouteStyle::Prefixed).unwrap();
        assert_eq!(
            routes.absolute("/url/abc").unwrap().as_str(),
            "https://api.example.com/url/abc"
        );
        assert_eq!(
            routes.absolute("url/abc").unwrap().as_str(),
            "https://api.example.com/v1/url/abc"
        );
    }

    #[test]
    fn test_rejects_invalid_base() {
        assert!(Routes::new("not a url", RouteStyle::Prefixed).is_err());
        assert!(Routes::new("mailto:someone@example.com", RouteStyle::Prefixed).is_err());
    }
}
