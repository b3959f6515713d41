//! Private-API Instagram client.
//!
//! Talks to the mobile endpoints under `i.instagram.com/api/v1` with the
//! app User-Agent and `X-IG-App-ID` header. Construction and authentication
//! are an explicit two-step: `InstagramClient::new()` builds the HTTP
//! client, `login()` consumes it and returns an `InstagramSession` on
//! success — there is no lazily-created nullable client to probe.

use crate::core::config;
use crate::core::error::{AppError, AppResult};
use crate::instagram::feed::FeedItem;
use reqwest::header::{self, HeaderMap};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use url::Url;

/// Base of the private mobile API.
const API_BASE: &str = "https://i.instagram.com/api/v1";

/// Instagram internal app ID (public, embedded in the web app).
const IG_APP_ID: &str = "936619743392459";

/// Mobile app User-Agent the private API expects.
const MOBILE_USER_AGENT: &str = "Instagram 275.0.0.27.98 Android";

#[derive(Serialize)]
struct LoginForm<'a> {
    username: &'a str,
    password: &'a str,
}

/// Unauthenticated client. Call [`InstagramClient::login`] to obtain a
/// session scoped to one fetch run.
pub struct InstagramClient {
    http: reqwest::Client,
}

/// Authenticated session holding the login cookies.
pub struct InstagramSession {
    http: reqwest::Client,
    cookie_header: String,
}

/// One page of a user's timeline feed, reverse-chronological as delivered.
#[derive(Debug, Default)]
pub struct UserFeed {
    pub items: Vec<FeedItem>,
    /// Pagination cursor for the next page, when the feed has more
    pub next_max_id: Option<String>,
}

/// Pagination cursor from a feed response body. String cursors pass
/// through, numeric ones are stringified; `null` or absent means the feed
/// has no further pages.
fn parse_next_max_id(body: &Value) -> Option<String> {
    match body.get("next_max_id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Collapse `Set-Cookie` response headers into a single `Cookie` header
/// value (name=value pairs only, attributes stripped).
fn collect_cookie_header(headers: &HeaderMap) -> String {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|cookie| cookie.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

impl InstagramClient {
    pub fn new() -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(MOBILE_USER_AGENT)
            .timeout(config::network::timeout())
            .connect_timeout(config::network::connect_timeout())
            .build()?;
        Ok(Self { http })
    }

    /// Authenticate and return a session owning the login cookies.
    ///
    /// Consumes the client: a session either exists and is usable, or login
    /// failed and the caller holds an error — never a half-initialized
    /// client.
    pub async fn login(self, login: &str, password: &SecretString) -> AppResult<InstagramSession> {
        let endpoint = format!("{}/accounts/login/", API_BASE);
        let response = self
            .http
            .post(&endpoint)
            .header("X-IG-App-ID", IG_APP_ID)
            .form(&LoginForm {
                username: login,
                password: password.expose_secret(),
            })
            .send()
            .await?;

        let status = response.status();
        let cookie_header = collect_cookie_header(response.headers());
        let body: Value = response.json().await?;

        let api_status = body.get("status").and_then(|v| v.as_str()).unwrap_or("");
        if !status.is_success() || api_status != "ok" {
            let message = body
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or("login rejected");
            return Err(AppError::Instagram(format!(
                "login failed (HTTP {}): {}",
                status.as_u16(),
                message
            )));
        }

        if cookie_header.is_empty() {
            return Err(AppError::Instagram(
                "login response carried no session cookies".to_string(),
            ));
        }

        log::info!("InstagramClient: logged in as {}", login);
        Ok(InstagramSession {
            http: self.http,
            cookie_header,
        })
    }
}

impl InstagramSession {
    async fn get_json(&self, url: Url) -> AppResult<Value> {
        let path = url.path().to_string();
        let response = self
            .http
            .get(url)
            .header("X-IG-App-ID", IG_APP_ID)
            .header("X-Requested-With", "XMLHttpRequest")
            .header(header::COOKIE, &self.cookie_header)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Instagram(format!(
                "{} returned HTTP {}",
                path,
                status.as_u16()
            )));
        }

        Ok(response.json().await?)
    }

    /// Resolve an account handle to its numeric user id.
    pub async fn user_id_for_name(&self, handle: &str) -> AppResult<String> {
        let url = Url::parse_with_params(
            &format!("{}/users/web_profile_info/", API_BASE),
            &[("username", handle)],
        )?;
        let body = self.get_json(url).await?;

        body.pointer("/data/user/id")
            .and_then(|v| v.as_str())
            .map(String::from)
            .ok_or_else(|| AppError::Instagram(format!("no user id in profile response for @{}", handle)))
    }

    /// Fetch one page of the user's timeline feed.
    ///
    /// `max_id` is the pagination cursor from a previous page; `None` for
    /// the most recent page. Items come back reverse-chronological.
    pub async fn user_feed(&self, user_id: &str, max_id: Option<&str>) -> AppResult<UserFeed> {
        let mut url = Url::parse(&format!(
            "{}/feed/user/{}/",
            API_BASE,
            urlencoding::encode(user_id)
        ))?;
        if let Some(cursor) = max_id {
            url.query_pairs_mut().append_pair("max_id", cursor);
        }

        let body = self.get_json(url).await?;

        let items: Vec<FeedItem> = body
            .get("items")
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().filter_map(FeedItem::from_json).collect())
            .unwrap_or_default();

        let next_max_id = parse_next_max_id(&body);

        log::info!(
            "InstagramSession: feed returned {} item(s) for user_id={}",
            items.len(),
            user_id
        );

        Ok(UserFeed { items, next_max_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn cookie_header_strips_attributes_and_joins() {
        let mut headers = HeaderMap::new();
        headers.append(
            header::SET_COOKIE,
            HeaderValue::from_static("sessionid=abc123; Path=/; HttpOnly; Secure"),
        );
        headers.append(
            header::SET_COOKIE,
            HeaderValue::from_static("csrftoken=xyz; Domain=.instagram.com"),
        );

        assert_eq!(collect_cookie_header(&headers), "sessionid=abc123; csrftoken=xyz");
    }

    #[test]
    fn cookie_header_empty_when_no_cookies() {
        assert_eq!(collect_cookie_header(&HeaderMap::new()), "");
    }

    #[test]
    fn next_max_id_null_means_no_more_pages() {
        assert_eq!(parse_next_max_id(&serde_json::json!({ "next_max_id": null })), None);
        assert_eq!(parse_next_max_id(&serde_json::json!({})), None);
    }

    #[test]
    fn next_max_id_accepts_string_and_numeric_cursors() {
        assert_eq!(
            parse_next_max_id(&serde_json::json!({ "next_max_id": "3141_42" })),
            Some("3141_42".to_string())
        );
        assert_eq!(
            parse_next_max_id(&serde_json::json!({ "next_max_id": 31415 })),
            Some("31415".to_string())
        );
    }
}
