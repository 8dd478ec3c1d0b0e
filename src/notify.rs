use std::sync::OnceLock;

use regex::Regex;
use reqwest::Client;
use serde::Serialize;
use serde_json::json;

/// Fixed prefix prepended to every forwarded result.
pub const NOTIFY_PREFIX: &str = "🔎 검색 결과 알림";

static WEBHOOK_PATTERN: OnceLock<Regex> = OnceLock::new();

fn webhook_pattern() -> &'static Regex {
    WEBHOOK_PATTERN.get_or_init(|| {
        Regex::new(r"^https://hooks\.slack\.com/services/T[A-Za-z0-9]+/B[A-Za-z0-9]+/[A-Za-z0-9]+$")
            .expect("webhook pattern is a valid regex")
    })
}

/// Outcome reported synchronously to the caller; never raised as an error.
#[derive(Debug, Clone, Serialize)]
pub struct NotifyOutcome {
    pub success: bool,
    pub message: String,
}

impl NotifyOutcome {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Check the webhook URL shape without touching the network.
///
/// Valid URLs follow the issued incoming-webhook path: the services path with
/// a tenant (`T…`) and bot (`B…`) identifier pair followed by the token.
pub fn validate_webhook_url(url: &str) -> bool {
    webhook_pattern().is_match(url)
}

/// Send a result string to the webhook.
///
/// A malformed URL is rejected before any network call. The full result is
/// sent in one request with no truncation and no retry.
pub async fn send_to_webhook(client: &Client, result: &str, webhook_url: &str) -> NotifyOutcome {
    if !validate_webhook_url(webhook_url) {
        return NotifyOutcome::failure(
            "❌ Slack Webhook URL이 올바르지 않습니다. Slack에서 발급받은 Webhook URL을 사용하세요.",
        );
    }

    post_notification(client, result, webhook_url).await
}

/// POST the payload and apply the strict success contract: HTTP 200 with a
/// body of exactly `ok`. Anything else is failure carrying the raw status
/// and body for diagnosis.
pub async fn post_notification(client: &Client, result: &str, url: &str) -> NotifyOutcome {
    let payload = json!({
        "text": format!("{}\n\n{}", NOTIFY_PREFIX, result)
    });

    let response = match client.post(url).json(&payload).send().await {
        Ok(response) => response,
        Err(e) => {
            return NotifyOutcome::failure(format!("❌ Slack 전송 중 예외 발생: {}", e));
        }
    };

    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if status.as_u16() == 200 && body.trim() == "ok" {
        NotifyOutcome {
            success: true,
            message: "✅ Slack으로 전송 완료".to_string(),
        }
    } else {
        NotifyOutcome::failure(format!(
            "❌ Slack 전송 실패: {} / 응답: {}",
            status.as_u16(),
            body
        ))
    }
}
