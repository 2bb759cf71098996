//! 共通HTTPヘルパー

use crate::error::{ExtmError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, Response};

/// GETしてステータスを検査
async fn get_checked(client: &Client, url: &str) -> Result<Response> {
    let response = client.get(url).send().await?;
    let status = response.status().as_u16();

    if !response.status().is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ExtmError::HttpStatus { status, message });
    }

    Ok(response)
}

/// 本文をテキストとして取得
pub async fn get_text(client: &Client, url: &str) -> Result<String> {
    let response = get_checked(client, url).await?;
    Ok(response.text().await?)
}

/// プログレスバー付きダウンロード
pub async fn download_with_progress(client: &Client, url: &str) -> Result<Vec<u8>> {
    let mut response = get_checked(client, url).await?;

    let total_size = response.content_length().unwrap_or(0);
    let pb = progress_bar(total_size);

    // Content-Length は信用しない（事前確保しない）
    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        bytes.extend_from_slice(&chunk);
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();

    Ok(bytes)
}

fn progress_bar(total_size: u64) -> ProgressBar {
    if total_size > 0 {
        let pb = ProgressBar::new(total_size);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    } else {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} Downloading...")
        {
            pb.set_style(style);
        }
        pb
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
