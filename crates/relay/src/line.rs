use eyre::Error;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const PUSH_URL: &str = "https://api.line.me/v2/bot/message/push";

/// Outbound LINE push client. Every request carries a fresh retry key so the
/// platform can dedupe redelivered messages.
#[derive(Clone)]
pub struct LinePush {
    client: reqwest::Client,
    channel_token: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PushRequest {
    pub to: String,
    pub messages: Vec<TextMessage>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TextMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    pub text: String,
}

impl TextMessage {
    pub fn new(text: String) -> Self {
        TextMessage {
            message_type: "text".to_owned(),
            text,
        }
    }
}

impl LinePush {
    pub fn new(channel_token: String) -> Self {
        LinePush {
            client: reqwest::Client::new(),
            channel_token,
        }
    }

    pub async fn push_text(&self, to: &str, text: String) -> Result<(), Error> {
        let request = PushRequest {
            to: to.to_owned(),
            messages: vec![TextMessage::new(text)],
        };
        let retry_key = Uuid::new_v4().to_string();
        let response = self
            .client
            .post(PUSH_URL)
            .bearer_auth(&self.channel_token)
            .header("X-Line-Retry-Key", retry_key)
            .json(&request)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(eyre::eyre!("LINE push failed:{} {}", status, body));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_request_wire_shape() {
        let request = PushRequest {
            to: "U1234".to_owned(),
            messages: vec![TextMessage::new("hello".to_owned())],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["to"], "U1234");
        assert_eq!(value["messages"][0]["type"], "text");
        assert_eq!(value["messages"][0]["text"], "hello");
    }
}
