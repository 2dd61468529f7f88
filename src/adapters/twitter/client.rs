//! Implements SocialReader and SocialPublisher over the Twitter HTTP API.
//!
//! Reads use API v2; media upload still goes through the v1.1 upload endpoint.
//! Every request is signed with the account's OAuth 1.0a user credentials.

use crate::adapters::twitter::mapper::{
    self, CreatePostRequest, CreatePostResponse, MediaIds, MediaUploadResponse, TimelineResponse,
    UsersResponse,
};
use crate::adapters::twitter::oauth::OAuth1Signer;
use crate::domain::{Account, DomainError, Post, PublishResult, RenderedImage};
use crate::ports::{SocialPublisher, SocialReader};
use crate::shared::config::TwitterCredentials;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const API_BASE: &str = "https://api.twitter.com/2";
const MEDIA_UPLOAD_URL: &str = "https://upload.twitter.com/1.1/media/upload.json";
/// Smallest page the timeline endpoint accepts; only the first item is used.
const TIMELINE_PAGE_SIZE: &str = "5";

/// Twitter adapter. One authenticated client shared by reads and writes for the whole run.
pub struct TwitterClient {
    client: reqwest::Client,
    signer: OAuth1Signer,
    api_base: String,
    upload_url: String,
}

impl TwitterClient {
    pub fn new(creds: TwitterCredentials) -> Self {
        Self::with_base_urls(creds, API_BASE, MEDIA_UPLOAD_URL)
    }

    /// Same client against other endpoints. `api_base` has no trailing slash.
    pub fn with_base_urls(
        creds: TwitterCredentials,
        api_base: impl Into<String>,
        upload_url: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            signer: OAuth1Signer::new(creds),
            api_base: api_base.into(),
            upload_url: upload_url.into(),
        }
    }

    async fn get_signed<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, DomainError> {
        let auth = self.signer.authorization_header("GET", url, query);
        let res = self
            .client
            .get(url)
            .query(query)
            .header(AUTHORIZATION, auth)
            .send()
            .await
            .map_err(|e| DomainError::Social(format!("GET {} failed: {}", url, e)))?;
        read_json(res, url).await
    }
}

/// Maps non-2xx to `DomainError::Social` (status + truncated body), otherwise decodes JSON.
async fn read_json<T: DeserializeOwned>(res: reqwest::Response, what: &str) -> Result<T, DomainError> {
    if !res.status().is_success() {
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        warn!(status = %status, body = %text, endpoint = what, "Twitter API returned error");
        return Err(DomainError::Social(format!(
            "{} returned {}: {}",
            what,
            status,
            text.chars().take(200).collect::<String>()
        )));
    }
    res.json()
        .await
        .map_err(|e| DomainError::Social(format!("Failed to parse {} response: {}", what, e)))
}

#[async_trait]
impl SocialReader for TwitterClient {
    async fn resolve_accounts(&self, usernames: &[String]) -> Result<Vec<Account>, DomainError> {
        if usernames.is_empty() {
            return Ok(Vec::new());
        }
        let joined = usernames.join(",");
        let url = format!("{}/users/by", self.api_base);
        let resp: UsersResponse = self.get_signed(&url, &[("usernames", joined.as_str())]).await?;

        for problem in &resp.errors {
            warn!(
                username = problem.value.as_deref().unwrap_or("?"),
                detail = problem.detail.as_deref().unwrap_or(""),
                "username did not resolve, dropping"
            );
        }
        Ok(mapper::accounts_in_request_order(usernames, resp.data))
    }

    async fn latest_post(&self, account: &Account) -> Result<Option<Post>, DomainError> {
        let url = format!("{}/users/{}/tweets", self.api_base, account.id);
        let resp: TimelineResponse = self
            .get_signed(
                &url,
                &[
                    ("exclude", "retweets"),
                    ("max_results", TIMELINE_PAGE_SIZE),
                    ("tweet.fields", "created_at"),
                ],
            )
            .await?;
        let post = mapper::first_post(resp, &account.id);
        if let Some(p) = &post {
            debug!(username = %account.username, post_id = %p.id, created_at = ?p.created_at, "latest post");
        }
        Ok(post)
    }
}

#[async_trait]
impl SocialPublisher for TwitterClient {
    async fn upload_png(&self, image: &RenderedImage) -> Result<String, DomainError> {
        let file_name = image
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "theme.png".to_string());
        let part = Part::bytes(image.bytes.clone())
            .file_name(file_name)
            .mime_str("image/png")
            .map_err(|e| DomainError::Social(format!("media part: {}", e)))?;
        let form = Form::new().part("media", part);

        // Multipart fields are not part of the OAuth signature.
        let auth = self.signer.authorization_header("POST", &self.upload_url, &[]);
        let res = self
            .client
            .post(&self.upload_url)
            .header(AUTHORIZATION, auth)
            .multipart(form)
            .send()
            .await
            .map_err(|e| DomainError::Social(format!("media upload failed: {}", e)))?;
        let uploaded: MediaUploadResponse = read_json(res, "media upload").await?;
        debug!(media_id = %uploaded.media_id_string, "media uploaded");
        Ok(uploaded.media_id_string)
    }

    async fn create_quote_post(
        &self,
        text: &str,
        media_ids: &[String],
        quoted_post_id: &str,
    ) -> Result<PublishResult, DomainError> {
        let url = format!("{}/tweets", self.api_base);
        let body = CreatePostRequest {
            text,
            media: (!media_ids.is_empty()).then_some(MediaIds { media_ids }),
            quote_tweet_id: quoted_post_id,
        };
        let auth = self.signer.authorization_header("POST", &url, &[]);
        let res = self
            .client
            .post(&url)
            .header(AUTHORIZATION, auth)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::Social(format!("create post failed: {}", e)))?;
        let created: CreatePostResponse = read_json(res, "create post").await?;
        Ok(PublishResult {
            post_id: created.data.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn creds() -> TwitterCredentials {
        TwitterCredentials {
            consumer_key: "ck".into(),
            consumer_secret: "cs".into(),
            access_token: "at".into(),
            access_token_secret: "ats".into(),
        }
    }

    /// Accepts one connection, answers with `status` and a JSON `body`, and yields the raw request.
    async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if request_complete(&buf) {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&buf).into_owned()
        });
        (format!("http://{}", addr), handle)
    }

    fn request_complete(buf: &[u8]) -> bool {
        let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
        let body = &buf[head_end + 4..];
        if head.contains("transfer-encoding: chunked") {
            return body.ends_with(b"0\r\n\r\n");
        }
        let len = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        body.len() >= len
    }

    #[tokio::test]
    async fn test_resolve_accounts_request_and_order() {
        let (base, server) = serve_once(
            200,
            r#"{"data":[{"id":"2","username":"EveryPalette"},{"id":"1","username":"everycolorbot"}]}"#,
        )
        .await;
        let client = TwitterClient::with_base_urls(creds(), format!("{}/2", base), "unused");

        let accounts = client
            .resolve_accounts(&["everycolorbot".to_string(), "EveryPalette".to_string()])
            .await
            .unwrap();
        let raw = server.await.unwrap();

        assert!(raw.starts_with("GET /2/users/by?usernames=everycolorbot%2CEveryPalette HTTP/1.1"));
        assert!(raw.to_lowercase().contains("authorization: oauth "));
        let ids: Vec<&str> = accounts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_latest_post_excludes_reshares() {
        let (base, server) = serve_once(200, r##"{"data":[{"id":"100","text":"#aabbcc"}]}"##).await;
        let client = TwitterClient::with_base_urls(creds(), format!("{}/2", base), "unused");
        let account = Account {
            id: "42".into(),
            username: "everycolorbot".into(),
        };

        let post = client.latest_post(&account).await.unwrap().unwrap();
        let raw = server.await.unwrap();

        let request_line = raw.lines().next().unwrap_or_default();
        assert!(request_line.starts_with("GET /2/users/42/tweets?"));
        assert!(request_line.contains("exclude=retweets"));
        assert!(request_line.contains("tweet.fields=created_at"));
        assert_eq!(post.id, "100");
        assert_eq!(post.author_id, "42");
    }

    #[tokio::test]
    async fn test_create_quote_post_body() {
        let (base, server) = serve_once(201, r#"{"data":{"id":"555","text":"x"}}"#).await;
        let client = TwitterClient::with_base_urls(creds(), format!("{}/2", base), "unused");

        let result = client
            .create_quote_post("hello", &["m1".to_string()], "42")
            .await
            .unwrap();
        let raw = server.await.unwrap();

        assert!(raw.starts_with("POST /2/tweets HTTP/1.1"));
        assert!(raw.contains(r#""quote_tweet_id":"42""#));
        assert!(raw.contains(r#""media":{"media_ids":["m1"]}"#));
        assert_eq!(result.post_id, "555");
    }

    #[tokio::test]
    async fn test_upload_png_sends_media_part() {
        let (base, server) = serve_once(200, r#"{"media_id_string":"777"}"#).await;
        let client = TwitterClient::with_base_urls(
            creds(),
            "unused",
            format!("{}/1.1/media/upload.json", base),
        );
        let image = RenderedImage {
            path: PathBuf::from("shots/100.png"),
            bytes: vec![0x89, b'P', b'N', b'G'],
            url: "https://theme.test/".into(),
        };

        let media_id = client.upload_png(&image).await.unwrap();
        let raw = server.await.unwrap();

        assert!(raw.starts_with("POST /1.1/media/upload.json HTTP/1.1"));
        assert!(raw.contains(r#"name="media""#));
        assert!(raw.contains(r#"filename="100.png""#));
        assert!(raw.contains("image/png"));
        assert_eq!(media_id, "777");
    }

    #[tokio::test]
    async fn test_error_status_maps_to_social() {
        let (base, server) = serve_once(403, r#"{"title":"Forbidden"}"#).await;
        let client = TwitterClient::with_base_urls(creds(), format!("{}/2", base), "unused");

        let err = client
            .resolve_accounts(&["everycolorbot".to_string()])
            .await
            .unwrap_err();
        server.await.unwrap();

        match err {
            DomainError::Social(msg) => {
                assert!(msg.contains("403"), "{}", msg);
                assert!(msg.contains("Forbidden"), "{}", msg);
            }
            other => panic!("expected Social, got {:?}", other),
        }
    }
}
