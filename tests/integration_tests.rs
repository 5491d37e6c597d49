use anyhow::Result;
use httpmock::prelude::*;
use serde_json::json;
use sniplink::core::batch::BatchShortener;
use sniplink::core::form::{Mode, Outcome, NETWORK_ERROR, RESOLVE_ERROR, STATS_ERROR};
use sniplink::core::routes::RouteStyle;
use sniplink::{HttpShortenerClient, LinkForm, Settings};
use tempfile::TempDir;

fn settings_for(server: &MockServer, route_style: RouteStyle) -> Settings {
    Settings {
        api_base: server.base_url(),
        route_style,
        timeout_seconds: 5,
        ..Settings::default()
    }
}

#[tokio::test]
async fn test_form_shorten_then_fetch_against_backend() -> Result<()> {
    let server = MockServer::start();

    let shorten_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/shorten")
            .header("Content-Type", "application/json")
            .json_body(json!({"longUrl": "https://docs.example.com/guide/getting-started"}));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"shortCode": "4c"}));
    });
    let resolve_mock = server.mock(|when, then| {
        when.method(GET).path("/url/4c");
        then.status(301)
            .header("Location", "https://docs.example.com/guide/getting-started")
            .header("Access-Control-Expose-Headers", "Location");
    });
    let stats_mock = server.mock(|when, then| {
        when.method(GET).path("/url/4c/stats");
        then.status(200).body("1");
    });

    let client = HttpShortenerClient::new(&settings_for(&server, RouteStyle::Prefixed))?;
    let mut form = LinkForm::new(client);

    form.set_long_url("https://docs.example.com/guide/getting-started");
    assert_eq!(form.submit_shorten().await, Outcome::Succeeded);
    let link = form.shorten_panel().short_link.clone().unwrap();
    assert_eq!(link.code, "4c");
    assert_eq!(link.url, server.url("/url/4c"));

    form.switch_mode(Mode::Fetch);
    form.set_code(link.code.clone());
    assert_eq!(form.submit_resolve().await, Outcome::Succeeded);
    assert_eq!(
        form.fetch_panel().resolved_url.as_deref(),
        Some("https://docs.example.com/guide/getting-started")
    );

    assert_eq!(form.submit_stats().await, Outcome::Succeeded);
    assert_eq!(form.stats_panel().click_count, Some(1));

    shorten_mock.assert();
    resolve_mock.assert();
    stats_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_form_reports_backend_validation_message() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/shorten");
        then.status(400).json_body(json!({
            "errorCode": "INVALID_URL",
            "message": "Invalid URL: Host cannot be empty",
            "timestamp": "2025-01-01T00:00:00"
        }));
    });

    let client = HttpShortenerClient::new(&settings_for(&server, RouteStyle::Prefixed))?;
    let mut form = LinkForm::new(client);
    form.set_long_url("https://");

    assert_eq!(form.submit_shorten().await, Outcome::Failed);
    assert_eq!(form.shorten_panel().long_url, "https://");
    assert_eq!(
        form.shorten_panel().error.as_deref(),
        Some("Invalid URL: Host cannot be empty")
    );
    Ok(())
}

#[tokio::test]
async fn test_form_unknown_code_on_root_routes() -> Result<()> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/zzz");
        then.status(404).json_body(json!({
            "errorCode": "URL_NOT_FOUND",
            "message": "URL not found for short code: zzz"
        }));
    });

    let client = HttpShortenerClient::new(&settings_for(&server, RouteStyle::Root))?;
    let mut form = LinkForm::new(client);
    form.switch_mode(Mode::Fetch);
    form.set_code("zzz");

    assert_eq!(form.submit_resolve().await, Outcome::Failed);
    assert_eq!(form.fetch_panel().error.as_deref(), Some(RESOLVE_ERROR));
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_form_dot_code_never_reaches_another_route() -> Result<()> {
    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.method(GET);
        then.status(200).body("3");
    });

    let client = HttpShortenerClient::new(&settings_for(&server, RouteStyle::Root))?;
    let mut form = LinkForm::new(client);
    form.switch_mode(Mode::Fetch);
    form.set_code(" .. ");

    assert_eq!(form.submit_resolve().await, Outcome::Failed);
    assert_eq!(form.fetch_panel().error.as_deref(), Some(RESOLVE_ERROR));
    assert_eq!(form.submit_stats().await, Outcome::Failed);
    assert_eq!(form.stats_panel().error.as_deref(), Some(STATS_ERROR));
    assert_eq!(form.stats_panel().click_count, None);
    any.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_form_blank_input_sends_nothing() -> Result<()> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/shorten");
        then.status(200).json_body(json!({"shortCode": "x"}));
    });

    let client = HttpShortenerClient::new(&settings_for(&server, RouteStyle::Prefixed))?;
    let mut form = LinkForm::new(client);
    form.set_long_url("    ");

    assert_eq!(form.submit_shorten().await, Outcome::Skipped);
    mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_form_network_failure() -> Result<()> {
    let settings = Settings {
        api_base: "http://127.0.0.1:9".to_string(),
        timeout_seconds: 2,
        ..Settings::default()
    };
    let mut form = LinkForm::new(HttpShortenerClient::new(&settings)?);
    form.set_long_url("https://example.com");

    assert_eq!(form.submit_shorten().await, Outcome::Failed);
    assert_eq!(form.shorten_panel().error.as_deref(), Some(NETWORK_ERROR));
    Ok(())
}

#[tokio::test]
async fn test_batch_shorten_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("links.csv");
    let output = temp_dir.path().join("report.csv");
    std::fs::write(
        &input,
        "title,long_url\nDocs,https://docs.example.com\nBroken,notaurl\n",
    )?;

    let server = MockServer::start();
    let ok_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/shorten")
            .json_body(json!({"longUrl": "https://docs.example.com"}));
        then.status(200).json_body(json!({"shortUrl": "https://sn.ip/url/9"}));
    });
    let bad_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/shorten")
            .json_body(json!({"longUrl": "notaurl"}));
        then.status(400).json_body(json!({
            "errorCode": "INVALID_URL",
            "message": "URL must start with http:// or https://"
        }));
    });

    let client = HttpShortenerClient::new(&settings_for(&server, RouteStyle::Prefixed))?;
    let report = BatchShortener::new(&client)
        .run(input.to_str().unwrap(), output.to_str().unwrap())
        .await?;

    ok_mock.assert();
    bad_mock.assert();
    assert_eq!(report.total, 2);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 1);

    let mut reader = csv::Reader::from_path(&output)?;
    let rows: Vec<csv::StringRecord> = reader.records().collect::<std::result::Result<_, _>>()?;
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][1], "9");
    assert_eq!(&rows[0][2], "https://sn.ip/url/9");
    assert_eq!(&rows[1][3], "URL must start with http:// or https://");
    Ok(())
}
