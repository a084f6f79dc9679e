use std::fmt;

use bg_core::{Error, RenderedPost, Result};
use reqwest::Client;
use serde_json::json;
use tracing::{info, warn};
use url::Url;

/// Best-effort draft announcements to a Slack incoming webhook.
pub struct SlackNotifier {
    client: Client,
    webhook_url: String,
}

impl SlackNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Result<Self> {
        let webhook_url = webhook_url.into();
        Url::parse(&webhook_url)
            .map_err(|e| Error::Publish(format!("Invalid webhook URL: {}", e)))?;
        Ok(Self {
            client: Client::new(),
            webhook_url,
        })
    }

    /// Announce a saved draft. Failures are absorbed: one retry with a
    /// shorter plain-text message, then give up with a warning. Nothing
    /// here can fail the run.
    pub async fn notify(&self, post: &RenderedPost, filename: &str) {
        let summary = format!(
            "*{}*\n{}\n📖 {} min read · `{}`",
            post.title, post.description, post.read_time_minutes, filename
        );
        let payload = json!({
            "text": "Here is your blog draft:",
            "blocks": [
                {
                    "type": "section",
                    "text": {"type": "mrkdwn", "text": summary}
                }
            ]
        });

        if let Err(e) = self.post(&payload).await {
            warn!("⚠️ Slack notification failed: {}, retrying with short message", e);
            let short = json!({ "text": format!("New blog draft: {}", post.title) });
            if let Err(e) = self.post(&short).await {
                warn!("⚠️ Slack notification retry failed: {}, giving up", e);
                return;
            }
        }
        info!("📣 Draft announced on Slack");
    }

    async fn post(&self, payload: &serde_json::Value) -> Result<()> {
        self.client
            .post(&self.webhook_url)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

impl fmt::Debug for SlackNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackNotifier")
            .field("client", &"<reqwest::Client>")
            .field("webhook_url", &"<redacted>")
            .finish()
    }
}
