use crate::error::{CliError, Result};
use futures_util::StreamExt;
use pdbmine::dataset::report::custom_report_query;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};

/// Upper bound on the buffer reserved up front from a declared `Content-Length`.
const MAX_PREALLOCATION: u64 = 16 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadProgress {
    Started { total_size: Option<u64> },
    Downloading { downloaded: u64 },
    Finished,
}

/// Client for the PDB custom report web service.
#[derive(Debug, Clone)]
pub struct ReportService {
    url: String,
    client: reqwest::Client,
}

impl ReportService {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, reqwest::Client::new())
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Requests `columns` for every PDB entry and returns the CSV report text.
    pub async fn fetch_report(
        &self,
        columns: &[String],
        mut progress_callback: impl FnMut(DownloadProgress),
    ) -> Result<String> {
        let query = custom_report_query(columns);
        info!("Requesting custom report from {}", self.url);
        debug!("Report query: {}", query);

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(query)
            .send()
            .await?
            .error_for_status()?;

        let total_size = response.content_length();
        progress_callback(DownloadProgress::Started { total_size });

        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::with_capacity(initial_capacity(total_size));

        while let Some(item) = stream.next().await {
            let chunk = item?;
            buffer.extend_from_slice(&chunk);
            downloaded += chunk.len() as u64;
            progress_callback(DownloadProgress::Downloading { downloaded });
        }
        progress_callback(DownloadProgress::Finished);
        info!("Downloaded {} bytes of report data.", downloaded);

        String::from_utf8(buffer).map_err(|e| {
            CliError::Other(anyhow::anyhow!("Report service returned invalid UTF-8: {}", e))
        })
    }
}

fn initial_capacity(total_size: Option<u64>) -> usize {
    total_size.unwrap_or(0).min(MAX_PREALLOCATION) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    const REPORT: &str = "structureId,chainId,Ki\n1ATP,E,0.5\n";

    /// Serves one HTTP response and hands back the raw request it received.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/report", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = stream.read(&mut chunk).unwrap();
                request.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let length = text
                        .lines()
                        .find_map(|l| {
                            l.to_ascii_lowercase()
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if request.len() >= header_end + 4 + length || n == 0 {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!(
                "{}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            tx.send(String::from_utf8_lossy(&request).to_string()).unwrap();
        });

        (url, rx)
    }

    fn service(url: String) -> ReportService {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        ReportService::with_client(url, client)
    }

    #[tokio::test]
    async fn posts_column_query_and_returns_csv() {
        let (url, request_rx) = serve_once("HTTP/1.1 200 OK", REPORT);
        let mut events = Vec::new();

        let text = service(url)
            .fetch_report(&["Ki".to_string(), "ecNo".to_string()], |p| events.push(p))
            .await
            .unwrap();

        assert_eq!(text, REPORT);
        let request = request_rx.recv().unwrap();
        assert!(request.starts_with("POST /report"));
        assert!(request.contains(
            "pdbids=*&service=wsfile&format=csv&primaryOnly=1&customReportColumns=Ki,ecNo"
        ));
        assert_eq!(
            events.first(),
            Some(&DownloadProgress::Started {
                total_size: Some(REPORT.len() as u64)
            })
        );
        assert_eq!(events.last(), Some(&DownloadProgress::Finished));
    }

    #[test]
    fn declared_length_only_bounds_the_initial_buffer() {
        assert_eq!(initial_capacity(None), 0);
        assert_eq!(initial_capacity(Some(1024)), 1024);
        assert_eq!(
            initial_capacity(Some(u64::MAX)),
            MAX_PREALLOCATION as usize
        );
    }

    #[tokio::test]
    async fn error_status_is_a_network_error() {
        let (url, _request_rx) = serve_once("HTTP/1.1 500 Internal Server Error", "");
        let result = service(url)
            .fetch_report(&["Ki".to_string()], |_| {})
            .await;
        assert!(matches!(result, Err(CliError::Network(_))));
    }
}
