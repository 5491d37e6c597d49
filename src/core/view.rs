use crate::core::form::{LinkForm, Mode};
use crate::domain::model::SessionInfo;
use crate::domain::ports::ShortenerApi;
use std::fmt::Write;

/// 依頁面的版面把表單輸出成文字
pub fn render<A: ShortenerApi>(form: &LinkForm<A>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "── {} ──", form.mode().heading());

    let toggle = match form.mode() {
        Mode::Shorten => "[Shorten URL]  Fetch Link ",
        Mode::Fetch => " Shorten URL  [Fetch Link]",
    };
    let _ = writeln!(out, "{}", toggle);

    match form.mode() {
        Mode::Shorten => render_shorten(form, &mut out),
        Mode::Fetch => render_fetch(form, &mut out),
    }

    out
}

fn render_shorten<A: ShortenerApi>(form: &LinkForm<A>, out: &mut String) {
    let panel = form.shorten_panel();
    let _ = writeln!(out, "Long URL: {}", panel.long_url);

    if panel.loading {
        let _ = writeln!(out, "… shortening");
    }

    if let Some(link) = &panel.short_link {
        let _ = writeln!(out, "YOUR SHORT LINK");
        let _ = writeln!(out, "  {}", link.url);
    }

    if let Some(error) = &panel.error {
        render_error(error, out);
    }
}

fn render_fetch<A: ShortenerApi>(form: &LinkForm<A>, out: &mut String) {
    let fetch = form.fetch_panel();
    let stats = form.stats_panel();
    let _ = writeln!(out, "Short code: {}", fetch.code);

    if fetch.loading {
        let _ = writeln!(out, "… resolving");
    }
    if stats.loading {
        let _ = writeln!(out, "… loading stats");
    }

    if let Some(url) = &fetch.resolved_url {
        let _ = writeln!(out, "ORIGINAL URL");
        let _ = writeln!(out, "  {}", url);
    }

    if let Some(count) = stats.click_count {
        let _ = writeln!(out, "CLICK COUNT");
        let _ = writeln!(out, "  {}", count);
    }

    if let Some(error) = &fetch.error {
        render_error(error, out);
    }
    if let Some(error) = &stats.error {
        render_error(error, out);
    }
}

fn render_error(message: &str, out: &mut String) {
    let _ = writeln!(out, "✗ {}", message);
}

pub fn render_session(session: Option<&SessionInfo>) -> String {
    match session {
        Some(info) if !info.provider.is_empty() => {
            format!("Signed in as {} via {}", info.username, info.provider)
        }
        Some(info) => format!("Signed in as {}", info.username),
        None => "Not signed in".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::form::tests::{mark_loading, MockApi, Reply};
    use crate::core::form::RESOLVE_ERROR;

    #[tokio::test]
    async fn test_render_shorten_result() {
        let mut form = LinkForm::new(MockApi::new(Reply::Ok));
        form.set_long_url("https://example.com/long");
        form.submit_shorten().await;

        let text = render(&form);
        assert!(text.starts_with("── Shorten URL ──"));
        assert!(text.contains("[Shorten URL]"));
        assert!(text.contains("YOUR SHORT LINK\n  http://localhost:8080/url/b7"));
        assert!(!text.contains('✗'));
    }

    #[tokio::test]
    async fn test_render_fetch_with_error_and_count() {
        let mut form = LinkForm::new(MockApi::new(Reply::Ok));
        form.switch_mode(Mode::Fetch);
        form.set_code("b7");
        form.submit_stats().await;

        form.api().set_reply(Reply::NotFound);
        form.submit_resolve().await;
        form.api().set_reply(Reply::Ok);
        form.submit_stats().await;

        let text = render(&form);
        assert!(text.starts_with("── Fetch Link ──"));
        assert!(text.contains("CLICK COUNT\n  42"));
        assert!(text.contains(&format!("✗ {}", RESOLVE_ERROR)));
        assert!(!text.contains("ORIGINAL URL"));
    }

    #[test]
    fn test_render_loading_markers() {
        let mut form = LinkForm::new(MockApi::new(Reply::Ok));
        mark_loading(&mut form);
        assert!(render(&form).contains("… shortening"));

        form.switch_mode(Mode::Fetch);
        let text = render(&form);
        assert!(text.contains("… resolving"));
        assert!(text.contains("… loading stats"));
        assert!(!text.contains("… shortening"));
    }

    #[test]
    fn test_render_session() {
        let info = SessionInfo {
            username: "octocat".to_string(),
            avatar: String::new(),
            provider: "github".to_string(),
        };
        assert_eq!(
            render_session(Some(&info)),
            "Signed in as octocat via github"
        );
        assert_eq!(render_session(None), "Not signed in");
    }
}
