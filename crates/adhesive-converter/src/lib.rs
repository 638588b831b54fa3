//! Conversion service adapter.
//!
//! Implements `StickerConverter` by calling a remote service that does the
//! actual download / re-encode / upload work:
//!
//! - `POST {endpoint}/convert/signal` with `{"short_name": ..}`
//! - `POST {endpoint}/convert/telegram` with `{"pack_id": .., "pack_key": ..}`
//!
//! Signal sticker credentials travel as HTTP basic auth.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use adhesive_core::{
    config::Config,
    conversion::StickerConverter,
    domain::{SignalPack, TelegramPack},
    errors::Error,
    Result,
};

const ERROR_BODY_PREVIEW: usize = 200;

#[derive(Serialize)]
struct ToSignalBody<'a> {
    short_name: &'a str,
}

#[derive(Serialize)]
struct ToTelegramBody<'a> {
    pack_id: &'a str,
    pack_key: &'a str,
}

#[derive(Clone, Debug)]
pub struct HttpStickerConverter {
    endpoint: String,
    username: String,
    password: String,
    http: reqwest::Client,
}

impl HttpStickerConverter {
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.converter_timeout)
            .build()
            .map_err(|e| Error::External(format!("converter http client error: {e}")))?;
        Ok(Self {
            endpoint: cfg.converter_endpoint.trim_end_matches('/').to_string(),
            username: cfg.signal_username.clone(),
            password: cfg.signal_password.clone(),
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, target: &str) -> String {
        format!("{}/convert/{target}", self.endpoint)
    }

    async fn post<B: Serialize + Sync>(&self, target: &str, body: &B) -> Result<String> {
        let url = self.url(target);
        debug!(%url, "calling conversion service");

        let resp = self
            .http
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(body)
            .send()
            .await
            .map_err(|e| Error::External(format!("converter request error: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| Error::External(format!("converter response error: {e}")))?;

        if !status.is_success() {
            return Err(Error::External(format!(
                "conversion failed: {status} {}",
                text.chars().take(ERROR_BODY_PREVIEW).collect::<String>()
            )));
        }

        reply_text(&text)
    }
}

/// Pulls the user-facing text out of a success body: the `message` field of a
/// JSON object, a JSON string, or otherwise the raw body.
fn reply_text(body: &str) -> Result<String> {
    let text = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(obj)) => obj
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or_default()
            .to_string(),
        Ok(serde_json::Value::String(s)) => s,
        _ => body.to_string(),
    };

    if text.trim().is_empty() {
        return Err(Error::External(
            "conversion service returned an empty reply".to_string(),
        ));
    }
    Ok(text)
}

#[async_trait]
impl StickerConverter for HttpStickerConverter {
    async fn convert_to_signal(&self, pack: &TelegramPack) -> Result<String> {
        self.post(
            "signal",
            &ToSignalBody {
                short_name: &pack.short_name,
            },
        )
        .await
    }

    async fn convert_to_telegram(&self, pack: &SignalPack) -> Result<String> {
        self.post(
            "telegram",
            &ToTelegramBody {
                pack_id: &pack.pack_id,
                pack_key: &pack.pack_key,
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn cfg(endpoint: &str) -> Config {
        Config {
            config_path: "config.toml".into(),
            telegram_bot_token: "1:a".to_string(),
            signal_username: "u".to_string(),
            signal_password: "p".to_string(),
            converter_endpoint: endpoint.to_string(),
            converter_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn urls_ignore_trailing_slash() {
        let c = HttpStickerConverter::new(&cfg("http://converter:8080/")).unwrap();
        assert_eq!(c.endpoint(), "http://converter:8080");
        assert_eq!(c.url("signal"), "http://converter:8080/convert/signal");
        assert_eq!(c.url("telegram"), "http://converter:8080/convert/telegram");
    }

    #[test]
    fn request_bodies_have_expected_shape() {
        let to_signal = serde_json::to_value(ToSignalBody {
            short_name: "animals",
        })
        .unwrap();
        assert_eq!(to_signal, serde_json::json!({ "short_name": "animals" }));

        let to_tg = serde_json::to_value(ToTelegramBody {
            pack_id: "abc",
            pack_key: "def",
        })
        .unwrap();
        assert_eq!(
            to_tg,
            serde_json::json!({ "pack_id": "abc", "pack_key": "def" })
        );
    }

    #[test]
    fn json_message_is_extracted() {
        let body = r#"{"message":"Done: https://signal.art/addstickers/#pack_id=1&pack_key=2"}"#;
        assert_eq!(
            reply_text(body).unwrap(),
            "Done: https://signal.art/addstickers/#pack_id=1&pack_key=2"
        );
    }

    #[test]
    fn json_string_body_is_used() {
        assert_eq!(
            reply_text(r#""https://t.me/addstickers/animals_signal""#).unwrap(),
            "https://t.me/addstickers/animals_signal"
        );
    }

    #[test]
    fn plain_text_body_is_used_verbatim() {
        assert_eq!(
            reply_text("Converted! https://t.me/addstickers/x").unwrap(),
            "Converted! https://t.me/addstickers/x"
        );
    }

    #[test]
    fn json_scalar_body_is_used_verbatim() {
        assert_eq!(reply_text("42").unwrap(), "42");
        assert_eq!(reply_text("true").unwrap(), "true");
        assert_eq!(reply_text("[1, 2]").unwrap(), "[1, 2]");
    }

    #[test]
    fn empty_replies_are_errors() {
        for body in ["", "   ", r#"{"message":""}"#, r#"{"other":1}"#] {
            assert!(
                matches!(reply_text(body), Err(Error::External(_))),
                "{body:?}"
            );
        }
    }
}
