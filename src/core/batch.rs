use crate::domain::ports::ShortenerApi;
use crate::utils::error::{Result, ShortenerError};
use serde::Serialize;
use std::path::Path;

const URL_COLUMNS: [&str; 3] = ["long_url", "longurl", "url"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRow {
    pub long_url: String,
    pub short_code: Option<String>,
    pub short_url: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub output_path: String,
}

/// 批次縮短：讀檔 → 逐筆呼叫後端 → 輸出 CSV 報表
pub struct BatchShortener<'a, A: ShortenerApi> {
    api: &'a A,
}

impl<'a, A: ShortenerApi> BatchShortener<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    pub async fn run(&self, input: &str, output: &str) -> Result<BatchReport> {
        tracing::info!("📥 Reading URLs from {}", input);
        let urls = self.extract(input).await?;
        tracing::info!("Found {} URLs", urls.len());

        let rows = self.transform(urls).await;
        let failed = rows.iter().filter(|row| row.error.is_some()).count();

        self.load(&rows, output)?;
        tracing::info!("📁 Report written to {}", output);

        Ok(BatchReport {
            total: rows.len(),
            succeeded: rows.len() - failed,
            failed,
            output_path: output.to_string(),
        })
    }

    pub async fn extract(&self, input: &str) -> Result<Vec<String>> {
        let content = tokio::fs::read_to_string(input).await?;
        parse_urls(&content)
    }

    /// 逐筆送出，單筆失敗只記錄在該列
    pub async fn transform(&self, urls: Vec<String>) -> Vec<BatchRow> {
        let mut rows = Vec::with_capacity(urls.len());

        for long_url in urls {
            let row = match self.api.shorten(&long_url).await {
                Ok(link) => BatchRow {
                    long_url,
                    short_code: Some(link.code),
                    short_url: Some(link.url),
                    error: None,
                },
                Err(e) => {
                    tracing::warn!("Could not shorten {}: {}", long_url, e);
                    BatchRow {
                        long_url,
                        short_code: None,
                        short_url: None,
                        error: Some(e.user_friendly_message()),
                    }
                }
            };
            rows.push(row);
        }

        rows
    }

    pub fn load(&self, rows: &[BatchRow], output: &str) -> Result<()> {
        if let Some(parent) = Path::new(output).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(output)?;
        if rows.is_empty() {
            writer.write_record(["long_url", "short_code", "short_url", "error"])?;
        }
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// 有網址欄位標題的 CSV，或每行一個網址的純文字
pub fn parse_urls(content: &str) -> Result<Vec<String>> {
    let content = content.trim_start();
    if content.is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let header_column = reader
        .headers()?
        .iter()
        .position(|cell| URL_COLUMNS.contains(&cell.to_ascii_lowercase().as_str()));

    let Some(column) = header_column else {
        return Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect());
    };

    let mut urls = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(value) = record.get(column).filter(|v| !v.is_empty()) {
            urls.push(value.to_string());
        }
    }

    if urls.is_empty() {
        return Err(ShortenerError::ValidationError {
            message: "CSV input has a URL column but no values".to_string(),
        });
    }

    Ok(urls)
}
