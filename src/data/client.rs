//! HTTP integration for the product sales backend.
//!
//! - `GET  /products/sales`  → JSON array of `SaleRecord`
//! - `POST /products/import` → multipart form, field `file`

use std::path::Path;

use reqwest::blocking::{multipart, Client};

use crate::config::DashboardConfig;
use crate::data::sample::fallback_sales;
use crate::domain::{SaleRecord, SalesSource};
use crate::error::{AppError, ImportError};
use crate::io::preview::ensure_csv_extension;

const SALES_PATH: &str = "/products/sales";
const IMPORT_PATH: &str = "/products/import";
const UPLOAD_FIELD: &str = "file";

pub struct SalesClient {
    client: Client,
    sales_url: String,
    import_url: String,
}

impl SalesClient {
    pub fn new(config: &DashboardConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            sales_url: config.endpoint(SALES_PATH),
            import_url: config.endpoint(IMPORT_PATH),
        })
    }

    /// Fetch the raw sales records. Any non-2xx status is an error.
    pub fn fetch_sales(&self) -> Result<Vec<SaleRecord>, AppError> {
        let resp = self
            .client
            .get(&self.sales_url)
            .send()
            .map_err(|e| AppError::new(4, format!("Sales request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Sales request failed with status {}.", resp.status()),
            ));
        }

        resp.json::<Vec<SaleRecord>>()
            .map_err(|e| AppError::new(4, format!("Failed to parse sales response: {e}")))
    }

    /// Fetch sales, substituting the built-in sample on any failure.
    ///
    /// The failure is logged but never surfaced to the caller as an error.
    pub fn fetch_sales_or_fallback(&self) -> (Vec<SaleRecord>, SalesSource) {
        match self.fetch_sales() {
            Ok(records) => {
                tracing::info!(url = %self.sales_url, rows = records.len(), "fetched sales");
                (records, SalesSource::Live)
            }
            Err(err) => {
                tracing::warn!(url = %self.sales_url, error = %err, "sales fetch failed, using sample data");
                (fallback_sales(), SalesSource::Fallback)
            }
        }
    }

    /// Submit a CSV file to the import endpoint.
    pub fn upload_csv(&self, path: &Path) -> Result<(), ImportError> {
        let file_name = ensure_csv_extension(path)?;

        let form = multipart::Form::new()
            .file(UPLOAD_FIELD, path)
            .map_err(|source| ImportError::Read { file_name: file_name.clone(), source })?;

        let resp = self.client.post(&self.import_url).multipart(form).send()?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(url = %self.import_url, %status, file = %file_name, "import rejected");
            return Err(ImportError::Rejected { status: status.as_u16() });
        }

        tracing::info!(url = %self.import_url, file = %file_name, "import accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    use super::*;

    fn client_for(api_base: String) -> SalesClient {
        let config = DashboardConfig { api_base, log_file: None };
        SalesClient::new(&config).unwrap()
    }

    // Nothing listens on the discard port, so requests fail fast.
    fn unreachable_client() -> SalesClient {
        client_for("http://127.0.0.1:9".to_string())
    }

    /// Answer exactly one request with `status` and `body`; the thread returns
    /// the raw request it received.
    fn serve_once(status: &'static str, body: String) -> (SalesClient, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            request
        });
        (client_for(format!("http://{addr}")), handle)
    }

    fn read_request(stream: &mut std::net::TcpStream) -> String {
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&raw).to_string();
            let Some(header_end) = text.find("\r\n\r\n") else {
                continue;
            };
            let headers = text[..header_end].to_ascii_lowercase();
            let body_len = raw.len() - (header_end + 4);
            let content_length = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok());
            let done = match content_length {
                Some(len) => body_len >= len,
                None if headers.contains("transfer-encoding: chunked") => text.ends_with("0\r\n\r\n"),
                None => true,
            };
            if done {
                break;
            }
        }
        String::from_utf8_lossy(&raw).into_owned()
    }

    #[test]
    fn fetch_failure_falls_back_to_sample() {
        let client = unreachable_client();
        let (records, source) = client.fetch_sales_or_fallback();
        assert_eq!(source, SalesSource::Fallback);
        assert_eq!(records, fallback_sales());
    }

    #[test]
    fn upload_rejects_non_csv_before_network() {
        let client = unreachable_client();
        let err = client.upload_csv(Path::new("data.txt")).unwrap_err();
        assert!(matches!(err, ImportError::WrongExtension { .. }));
    }

    #[test]
    fn upload_transport_error_keeps_message() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, "id,name\n1,A\n").unwrap();

        let err = unreachable_client().upload_csv(&path).unwrap_err();
        assert!(matches!(err, ImportError::Transport(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn upload_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = unreachable_client().upload_csv(&dir.path().join("gone.csv")).unwrap_err();
        assert!(matches!(err, ImportError::Read { .. }));
    }

    #[test]
    fn fetch_decodes_live_records() {
        let rows: Vec<String> = (1..=10)
            .map(|i| format!(r#"{{"id":"{i}","name":"P{}","sold_count":{i},"avg_price":{i}.5}}"#, i % 4))
            .collect();
        let (client, server) = serve_once("200 OK", format!("[{}]", rows.join(",")));

        let (records, source) = client.fetch_sales_or_fallback();
        let request = server.join().unwrap();

        assert!(request.starts_with("GET /products/sales "));
        assert_eq!(source, SalesSource::Live);
        assert_eq!(records.len(), 10);
        assert_eq!(records[2], SaleRecord::new("3", "P3", 3, 3.5));
    }

    #[test]
    fn server_error_falls_back_to_sample() {
        let (client, server) = serve_once("500 Internal Server Error", "{}".to_string());
        let (records, source) = client.fetch_sales_or_fallback();
        server.join().unwrap();
        assert_eq!(source, SalesSource::Fallback);
        assert_eq!(records, fallback_sales());
    }

    #[test]
    fn upload_sends_file_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, "id,name\n1,A\n").unwrap();

        let (client, server) = serve_once("200 OK", "{}".to_string());
        client.upload_csv(&path).unwrap();
        let request = server.join().unwrap();

        assert!(request.starts_with("POST /products/import "));
        assert!(request.to_ascii_lowercase().contains("content-type: multipart/form-data"));
        assert!(request.contains(r#"name="file""#));
        assert!(request.contains(r#"filename="sales.csv""#));
        assert!(request.contains("1,A"));
    }

    #[test]
    fn non_success_upload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, "id,name\n1,A\n").unwrap();

        let (client, server) = serve_once("422 Unprocessable Entity", "{}".to_string());
        let err = client.upload_csv(&path).unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, ImportError::Rejected { status: 422 }));
        assert_eq!(err.to_string(), "Upload failed");
    }
}
