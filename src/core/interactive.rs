use crate::core::form::{LinkForm, Mode, Outcome};
use crate::core::view;
use crate::domain::ports::ShortenerApi;
use crate::utils::error::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const HELP: &str = "\
Type a long URL (shorten mode) or a short code (fetch mode) and press Enter.
  :shorten   switch to shorten mode
  :fetch     switch to fetch mode
  :stats     show the click count of the current short code
  :dismiss   hide error messages
  :help      show this help
  :quit      leave
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Render,
    Print(&'static str),
    Quit,
}

/// 把一行輸入套用到表單上
pub async fn handle_line<A: ShortenerApi>(form: &mut LinkForm<A>, line: &str) -> Step {
    let input = line.trim();

    match input {
        ":q" | ":quit" | ":exit" => Step::Quit,
        ":help" | ":h" => Step::Print(HELP),
        ":shorten" => {
            form.switch_mode(Mode::Shorten);
            Step::Render
        }
        ":fetch" => {
            form.switch_mode(Mode::Fetch);
            Step::Render
        }
        ":dismiss" => {
            form.dismiss_errors();
            Step::Render
        }
        ":stats" => {
            if form.mode() != Mode::Fetch {
                return Step::Print("Stats are available in fetch mode (:fetch)\n");
            }
            match form.submit_stats().await {
                Outcome::Skipped => Step::Print("Enter a short code first\n"),
                _ => Step::Render,
            }
        }
        command if command.starts_with(':') => Step::Print("Unknown command, try :help\n"),
        text => {
            let outcome = match form.mode() {
                Mode::Shorten => {
                    form.set_long_url(text);
                    form.submit_shorten().await
                }
                Mode::Fetch => {
                    form.set_code(text);
                    form.submit_resolve().await
                }
            };
            if outcome == Outcome::Skipped {
                tracing::debug!("Blank input, no request sent");
            }
            Step::Render
        }
    }
}

pub async fn run<A, R, W>(form: &mut LinkForm<A>, reader: R, mut writer: W) -> Result<()>
where
    A: ShortenerApi,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    writer.write_all(view::render(form).as_bytes()).await?;
    writer.write_all(b"> ").await?;
    writer.flush().await?;

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        match handle_line(form, &line).await {
            Step::Quit => break,
            Step::Print(text) => writer.write_all(text.as_bytes()).await?,
            Step::Render => writer.write_all(view::render(form).as_bytes()).await?,
        }
        writer.write_all(b"> ").await?;
        writer.flush().await?;
    }

    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
