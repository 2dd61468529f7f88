//! Twitter API v2 / v1.1 response shapes and their mapping to domain entities.

use crate::domain::{Account, Post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `GET /2/users/by`. Unknown usernames come back in `errors`, not as a failed request.
#[derive(Debug, Deserialize)]
pub struct UsersResponse {
    #[serde(default)]
    pub data: Vec<UserDto>,
    #[serde(default)]
    pub errors: Vec<ApiProblem>,
}

#[derive(Debug, Deserialize)]
pub struct UserDto {
    pub id: String,
    pub username: String,
}

/// Partial error entry (`value` is the offending username for lookups).
#[derive(Debug, Deserialize)]
pub struct ApiProblem {
    pub value: Option<String>,
    pub detail: Option<String>,
}

/// `GET /2/users/:id/tweets`. `data` is absent when the timeline is empty.
#[derive(Debug, Deserialize)]
pub struct TimelineResponse {
    #[serde(default)]
    pub data: Vec<TweetDto>,
}

#[derive(Debug, Deserialize)]
pub struct TweetDto {
    pub id: String,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// `POST 1.1/media/upload.json`.
#[derive(Debug, Deserialize)]
pub struct MediaUploadResponse {
    pub media_id_string: String,
}

/// `POST /2/tweets` body.
#[derive(Debug, Serialize)]
pub struct CreatePostRequest<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaIds<'a>>,
    pub quote_tweet_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct MediaIds<'a> {
    pub media_ids: &'a [String],
}

#[derive(Debug, Deserialize)]
pub struct CreatePostResponse {
    pub data: CreatedPost,
}

#[derive(Debug, Deserialize)]
pub struct CreatedPost {
    pub id: String,
}

/// Resolved accounts in the order the usernames were requested (case-insensitive match).
pub fn accounts_in_request_order(usernames: &[String], users: Vec<UserDto>) -> Vec<Account> {
    let mut remaining = users;
    let mut out = Vec::with_capacity(remaining.len());
    for name in usernames {
        if let Some(pos) = remaining
            .iter()
            .position(|u| u.username.eq_ignore_ascii_case(name))
        {
            let user = remaining.swap_remove(pos);
            out.push(Account {
                id: user.id,
                username: user.username,
            });
        }
    }
    out
}

/// First (newest) item of a timeline page.
pub fn first_post(timeline: TimelineResponse, author_id: &str) -> Option<Post> {
    timeline.data.into_iter().next().map(|t| Post {
        id: t.id,
        author_id: author_id.to_string(),
        text: t.text,
        created_at: t.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_with_partial_errors() {
        let json = r#"{
            "data": [
                {"id": "2", "name": "Every Palette", "username": "EveryPalette"},
                {"id": "1", "name": "everycolorbot", "username": "everycolorbot"}
            ],
            "errors": [{"value": "ghost", "detail": "Could not find user with usernames: [ghost].", "title": "Not Found Error"}]
        }"#;
        let resp: UsersResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.errors[0].value.as_deref(), Some("ghost"));

        let names = vec![
            "everycolorbot".to_string(),
            "ghost".to_string(),
            "everypalette".to_string(),
        ];
        let accounts = accounts_in_request_order(&names, resp.data);
        let ids: Vec<&str> = accounts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(accounts[1].username, "EveryPalette");
    }

    #[test]
    fn test_users_all_missing() {
        let json = r#"{"errors": [{"value": "ghost", "detail": "not found"}]}"#;
        let resp: UsersResponse = serde_json::from_str(json).unwrap();
        assert!(accounts_in_request_order(&["ghost".to_string()], resp.data).is_empty());
    }

    #[test]
    fn test_first_post_takes_newest() {
        let json = r#"{
            "data": [
                {"id": "20", "text": "0xAABBCC", "created_at": "2024-03-01T12:00:00.000Z"},
                {"id": "19", "text": "0x112233"}
            ],
            "meta": {"result_count": 2, "newest_id": "20", "oldest_id": "19"}
        }"#;
        let resp: TimelineResponse = serde_json::from_str(json).unwrap();
        let post = first_post(resp, "7").unwrap();
        assert_eq!(post.id, "20");
        assert_eq!(post.author_id, "7");
        assert_eq!(post.text, "0xAABBCC");
        assert!(post.created_at.is_some());
    }

    #[test]
    fn test_empty_timeline_has_no_post() {
        let json = r#"{"meta": {"result_count": 0}}"#;
        let resp: TimelineResponse = serde_json::from_str(json).unwrap();
        assert!(first_post(resp, "7").is_none());
    }

    #[test]
    fn test_create_post_body() {
        let ids = vec!["99".to_string()];
        let body = CreatePostRequest {
            text: "hi",
            media: Some(MediaIds { media_ids: &ids }),
            quote_tweet_id: "20",
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"text": "hi", "media": {"media_ids": ["99"]}, "quote_tweet_id": "20"})
        );
    }
}
