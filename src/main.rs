use clap::Parser;
use sniplink::config::toml_config::LogFormat;
use sniplink::config::{Command, Settings};
use sniplink::core::batch::BatchShortener;
use sniplink::core::session::SessionManager;
use sniplink::core::{interactive, view, ConfigProvider, ShortenerApi, TokenStore};
use sniplink::utils::error::{ErrorSeverity, ShortenerError};
use sniplink::utils::{logger, validation};
use sniplink::{CliConfig, FileTokenStore, HttpShortenerClient, LinkForm};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();
    let settings = cli.settings();

    // 初始化日誌
    match &settings {
        Ok(s) if s.log_format == LogFormat::Json => logger::init_json_logger(s.log_level.as_deref()),
        _ => logger::init_cli_logger(cli.verbose),
    }

    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if cli.verbose {
        tracing::debug!("Resolved settings: {:?}", settings);
    }

    if let Err(e) = run(&cli, &settings).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run(cli: &CliConfig, settings: &Settings) -> sniplink::Result<()> {
    let store = FileTokenStore::new(settings.token_file());
    let token = store.load().await?;
    let client = HttpShortenerClient::new(settings)?.with_token(token);

    match &cli.command {
        Command::Shorten { long_url } => {
            validation::validate_non_empty_string("long URL", long_url)?;
            let link = client.shorten(long_url).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&link)?);
            } else {
                println!("{}", link.url);
            }
        }
        Command::Resolve { code } => {
            validation::validate_short_code(code)?;
            let long_url = client.resolve(code.trim()).await?;
            if cli.json {
                let body = serde_json::json!({ "shortCode": code.trim(), "longUrl": long_url });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("{}", long_url);
            }
        }
        Command::Stats { code } => {
            validation::validate_short_code(code)?;
            let count = client.click_count(code.trim()).await?;
            if cli.json {
                let body = serde_json::json!({ "shortCode": code.trim(), "clickCount": count });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("{}", count);
            }
        }
        Command::Whoami => {
            let session = SessionManager::new(&client, &store, client.routes());
            let user = session.current_user().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                println!("{}", view::render_session(user.as_ref()));
            }
        }
        Command::Login {
            provider,
            callback,
            token,
        } => {
            let session = SessionManager::new(&client, &store, client.routes());
            if let Some(callback) = callback {
                if session.complete_login(callback).await? {
                    println!("✅ Signed in, token saved to {}", store.path().display());
                } else {
                    println!("No token in the callback URL, nothing changed");
                }
            } else if let Some(token) = token {
                session.store_token(token).await?;
                println!("✅ Token saved to {}", store.path().display());
            } else {
                let url = session.login_url(provider)?;
                println!("Open this URL in a browser to sign in with {}:", provider);
                println!("  {}", url);
                println!("Then run: sniplink login --callback '<URL you were sent back to>'");
            }
        }
        Command::Logout => {
            let session = SessionManager::new(&client, &store, client.routes());
            match session.logout().await {
                Ok(()) => println!("Signed out"),
                // 本機 token 已清除，後端通知失敗只提示
                Err(ShortenerError::Network(e)) => {
                    tracing::warn!("Backend unreachable during logout: {}", e);
                    println!("Signed out locally (backend unreachable)");
                }
                Err(e) => return Err(e),
            }
        }
        Command::Batch { input, output } => {
            let batch = BatchShortener::new(&client);
            let report = batch.run(input, output).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "✅ {} URLs processed: {} shortened, {} failed",
                    report.total, report.succeeded, report.failed
                );
                println!("📁 Report saved to: {}", report.output_path);
            }
        }
        Command::Interactive => {
            println!("{}", interactive::HELP);
            let mut form = LinkForm::new(client);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            interactive::run(&mut form, stdin, tokio::io::stdout()).await?;
        }
    }

    Ok(())
}
