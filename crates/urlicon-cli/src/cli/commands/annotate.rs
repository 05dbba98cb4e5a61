//! `urlicon annotate [path]` – rewrite external links in HTML.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use urlicon_core::annotate::{Annotated, Annotator, Mode};
use urlicon_core::config::UrlIconConfig;

async fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => tokio::fs::read_to_string(p)
            .await
            .with_context(|| format!("read {}", p.display())),
        _ => {
            let mut input = String::new();
            tokio::io::stdin()
                .read_to_string(&mut input)
                .await
                .context("read stdin")?;
            Ok(input)
        }
    }
}

pub async fn run_annotate(
    cfg: &UrlIconConfig,
    path: Option<&Path>,
    mode: Option<Mode>,
) -> Result<()> {
    let input = read_input(path).await?;
    let mut cfg = cfg.clone();
    if let Some(mode) = mode {
        cfg.mode = mode;
    }

    // Fetches are blocking curl transfers.
    let annotated = tokio::task::spawn_blocking(move || -> Result<Annotated> {
        let annotator = Annotator::from_config(&cfg)?;
        Ok(annotator.annotate(&input))
    })
    .await
    .context("annotate task join")??;

    let mut stdout = tokio::io::stdout();
    stdout.write_all(annotated.markup.as_bytes()).await?;
    stdout.flush().await?;

    // The document is already out; a cache failure only changes the exit status.
    let failed = annotated.cache_errors.len();
    match annotated.cache_errors.into_iter().next() {
        Some(first) => Err(anyhow::Error::new(first)
            .context(format!("{failed} favicon cache failure(s), fallback icon used"))),
        None => Ok(()),
    }
}
