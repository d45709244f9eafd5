//! Browser-backed tests of the record fetcher against a local HTML server
//!
//! These launch a real Chromium and are ignored by default:
//! `cargo test --test chromium_fetcher_test -- --ignored`

use anyhow::Result;
use fpo_contact_scrape::config::SweepConfig;
use fpo_contact_scrape::{
    AddressExtractor, ChromiumFetcher, ExpandOutcome, NoOpProgress, RecordFetcher,
    RegexAddressExtractor,
};
use std::path::Path;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const DETAIL_PREFIX: &str = "/main/organisationDetails/";

const PLAIN_RECORD: &str = r#"<!doctype html>
<html><body>
  <h1>Sahyadri Farmers Producer Company</h1>
  <p>Email: office@sahyadri.in</p>
</body></html>"#;

const ICON_BUTTON_RECORD: &str = r#"<!doctype html>
<html><body>
  <h1>Godavari FPO</h1>
  <div id="more" style="display:none">Email: ceo@godavari-fpo.in</div>
  <button onclick="document.getElementById('more').style.display='block'">
    <i class="fa fa-plus"></i> View More
  </button>
</body></html>"#;

const SCRIPT_LABEL_RECORD: &str = r##"<!doctype html>
<html>
<head><script>var expandLabel = "View More";</script></head>
<body>
  <h1>Krishna Valley FPO</h1>
  <div id="more" style="display:none">Email: contact@krishnavalley.org</div>
  <a href="#" onclick="document.getElementById('more').style.display='block'; return false;">view more</a>
</body></html>"##;

fn record_page(id: u64) -> Option<&'static str> {
    match id {
        1 => Some(PLAIN_RECORD),
        2 => Some(ICON_BUTTON_RECORD),
        3 => Some(SCRIPT_LABEL_RECORD),
        _ => None,
    }
}

/// Serve the record pages over HTTP on an ephemeral port
async fn serve_records() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let request = String::from_utf8_lossy(&request);
                let path = request.split_whitespace().nth(1).unwrap_or("/");
                let page = path
                    .strip_prefix(DETAIL_PREFIX)
                    .and_then(|id| id.parse().ok())
                    .and_then(record_page);

                let response = match page {
                    Some(body) => format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\n\
                         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    ),
                    None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                        .to_string(),
                };
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    Ok(format!("http://{addr}"))
}

fn test_config(base_url: &str, output: &Path, profile: &Path) -> Result<SweepConfig> {
    Ok(SweepConfig::builder()
        .id_range(1..4)
        .output_path(output)
        .base_url(base_url)
        .expand_timeout_ms(1500)
        .expand_settle_ms(200)
        .page_load_timeout_secs(20)
        .navigation_timeout_secs(20)
        .chrome_data_dir(Some(profile.to_path_buf()))
        .build()?)
}

async fn fetch_record(id: u64) -> Result<(ExpandOutcome, Vec<String>)> {
    let temp_dir = TempDir::new()?;
    let base_url = serve_records().await?;
    let config = test_config(
        &base_url,
        &temp_dir.path().join("out.csv"),
        &temp_dir.path().join("profile"),
    )?;

    let mut fetcher = ChromiumFetcher::launch(&config).await?;
    let fetched = fetcher.fetch(id).await;
    fetcher.shutdown().await;

    let page = fetched?;
    let emails = RegexAddressExtractor::new().extract(&page.content);
    Ok((page.expand, emails))
}

#[tokio::test]
#[ignore] // Requires browser installation
async fn test_page_without_expand_control_still_returns_content() -> Result<()> {
    let (expand, emails) = fetch_record(1).await?;

    assert_eq!(expand, ExpandOutcome::NotFound);
    assert_eq!(emails, vec!["office@sahyadri.in".to_string()]);
    Ok(())
}

#[tokio::test]
#[ignore] // Requires browser installation
async fn test_icon_button_expand_reveals_hidden_address() -> Result<()> {
    let (expand, emails) = fetch_record(2).await?;

    assert_eq!(expand, ExpandOutcome::Interacted);
    assert_eq!(emails, vec!["ceo@godavari-fpo.in".to_string()]);
    Ok(())
}

#[tokio::test]
#[ignore] // Requires browser installation
async fn test_label_inside_script_is_not_the_control() -> Result<()> {
    let (expand, emails) = fetch_record(3).await?;

    assert_eq!(expand, ExpandOutcome::Interacted);
    assert_eq!(emails, vec!["contact@krishnavalley.org".to_string()]);
    Ok(())
}

#[tokio::test]
#[ignore] // Requires browser installation
async fn test_full_sweep_writes_csv() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let base_url = serve_records().await?;
    let output = temp_dir.path().join("extracted_emails.csv");
    let config = test_config(&base_url, &output, &temp_dir.path().join("profile"))?;

    let summary = fpo_contact_scrape::sweep(config, &NoOpProgress).await?;

    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.expanded, 2);
    assert!(summary.failed_ids.is_empty());
    assert_eq!(
        std::fs::read_to_string(&output)?,
        "org_id,email\n\
         1,office@sahyadri.in\n\
         2,ceo@godavari-fpo.in\n\
         3,contact@krishnavalley.org\n"
    );
    Ok(())
}
