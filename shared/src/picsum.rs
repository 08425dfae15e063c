use async_trait::async_trait;
use log::{debug, trace};
use reqwest::{Client, StatusCode};

use crate::error::{Error, Result};

pub const DEFAULT_IMAGE_ENDPOINT: &str = "https://picsum.photos";

#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Resolves the final URL of a random image sized `width`x`height`.
    async fn fetch_image(&self, width: u32, height: u32) -> Result<String>;
}

pub(crate) fn log_status_error(prefix: &str, status: StatusCode) {
    if status.is_client_error() {
        debug!("{} [{} CLIENT ERROR]", prefix, status);
    } else if status.is_server_error() {
        debug!("{} [{} SERVER ERROR]", prefix, status);
    } else {
        debug!("{} [{} UNKNOWN ERROR]", prefix, status);
    }
}

/// Size-parameterized random image endpoint. The endpoint answers with a
/// redirect to a concrete image, so the URL we hand out is the one the
/// client ended up at.
#[derive(Clone, Debug)]
pub struct Picsum {
    endpoint: String,
    client: Client,
}

impl Picsum {
    pub fn new(endpoint: String) -> Self {
        Self::with_client(endpoint, Client::new())
    }

    pub fn with_client(endpoint: String, client: Client) -> Self {
        let endpoint = endpoint.trim_end_matches('/').to_string();
        Self { endpoint, client }
    }

    pub fn image_url(&self, width: u32, height: u32) -> String {
        format!("{}/{}/{}", self.endpoint, width, height)
    }
}

#[async_trait]
impl ImageSource for Picsum {
    async fn fetch_image(&self, width: u32, height: u32) -> Result<String> {
        debug!("fetch_image({}, {})", width, height);

        let url = self.image_url(width, height);
        trace!("URL: {}", url);

        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(Error::SendRequestFailed)?;

        let status = res.status();

        if status.is_success() {
            let resolved = res.url().to_string();
            trace!("Resolved: {}", resolved);
            Ok(resolved)
        } else {
            log_status_error("fetch_image", status);
            Err(Error::Http {
                status: status.as_u16(),
            })
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    pub(crate) fn response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
        let mut res = format!("HTTP/1.1 {}\r\n", status);
        for (name, value) in headers {
            res.push_str(&format!("{}: {}\r\n", name, value));
        }
        res.push_str(&format!(
            "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        ));
        res
    }

    /// Serves canned responses by path (query string ignored) on a local
    /// port. Unknown paths get a 404. Returns the base url.
    pub(crate) async fn serve(routes: Vec<(&'static str, String)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes = Arc::new(routes);

        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let routes = routes.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 8192];
                    let mut read = 0;
                    while read < buf.len() {
                        let n = stream.read(&mut buf[read..]).await.unwrap_or(0);
                        if n == 0 {
                            break;
                        }
                        read += n;
                        if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }

                    let req = String::from_utf8_lossy(&buf[..read]).to_string();
                    let target = req.split_whitespace().nth(1).unwrap_or("/");
                    let path = target.split('?').next().unwrap_or(target);

                    let res = routes
                        .iter()
                        .find(|(route, _)| *route == path)
                        .map(|(_, res)| res.clone())
                        .unwrap_or_else(|| response("404 Not Found", &[], ""));

                    let _ = stream.write_all(res.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        format!("http://{}", addr)
    }

    #[test]
    fn image_url_is_size_parameterized() {
        let picsum = Picsum::new(DEFAULT_IMAGE_ENDPOINT.to_string());
        assert_eq!(
            picsum.image_url(1400, 500),
            "https://picsum.photos/1400/500"
        );
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let picsum = Picsum::new("http://localhost:8080/".to_string());
        assert_eq!(picsum.image_url(500, 500), "http://localhost:8080/500/500");
    }

    #[tokio::test]
    async fn fetch_image_returns_redirected_url() {
        let base = serve(vec![
            (
                "/1400/500",
                response(
                    "302 Found",
                    &[("Location", "/id/42/1400/500.jpg")],
                    "",
                ),
            ),
            (
                "/id/42/1400/500.jpg",
                response("200 OK", &[("Content-Type", "image/jpeg")], "jpeg"),
            ),
        ])
        .await;

        let picsum = Picsum::new(base.clone());
        let url = picsum.fetch_image(1400, 500).await.unwrap();

        assert_eq!(url, format!("{}/id/42/1400/500.jpg", base));
        assert_ne!(url, picsum.image_url(1400, 500));
    }

    #[tokio::test]
    async fn redirect_to_missing_image_is_http_error() {
        let base = serve(vec![(
            "/500/500",
            response("302 Found", &[("Location", "/id/404/500/500.jpg")], ""),
        )])
        .await;

        let picsum = Picsum::new(base);
        let res = picsum.fetch_image(500, 500).await;

        assert!(matches!(res, Err(Error::Http { status: 404 })));
    }

    #[tokio::test]
    async fn server_error_is_http_error() {
        let base = serve(vec![(
            "/800/200",
            response("503 Service Unavailable", &[], ""),
        )])
        .await;

        let res = Picsum::new(base).fetch_image(800, 200).await;
        assert!(matches!(res, Err(Error::Http { status: 503 })));
    }
}
