//! Sticker pack link parsing.
//!
//! Turns the raw text of a chat message into a [`ConversionRequest`]. Pure: no
//! I/O, no state.
//!
//! | Link | Pack info | Direction |
//! |---|---|---|
//! | `http(s)://t.me/...` | last path segment | to Signal |
//! | `http(s)://signal.art/...#pack_id=..&pack_key=..` | fragment | to Telegram |
//! | `tg://...` | `set` query param, else last path segment | to Signal |
//! | `sgnl://...?pack_id=..&pack_key=..` | query, else fragment | to Telegram |

use std::collections::HashMap;

use url::{form_urlencoded, Url};

use crate::domain::ConversionRequest;

pub const TELEGRAM_HOST: &str = "t.me";
pub const SIGNAL_HOST: &str = "signal.art";

const PACK_ID: &str = "pack_id";
const PACK_KEY: &str = "pack_key";
const TG_SET: &str = "set";

/// Why a link was rejected.
///
/// Every variant surfaces to the user as the same invalid-link reply; the
/// distinction only exists for logs.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("not a valid URL: {0}")]
    Malformed(#[from] url::ParseError),

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("unsupported host: {0}")]
    UnsupportedHost(String),

    #[error("missing or empty `{0}`")]
    MissingKey(&'static str),

    #[error("empty sticker set name")]
    EmptyShortName,
}

pub fn parse(text: &str) -> Result<ConversionRequest, ParseError> {
    let url = Url::parse(text)?;

    match url.scheme() {
        "http" | "https" => match url.host_str() {
            Some(TELEGRAM_HOST) => telegram_from_path(raw_path(text)),
            Some(SIGNAL_HOST) => signal_from(url.fragment(), None),
            other => Err(ParseError::UnsupportedHost(
                other.unwrap_or_default().to_string(),
            )),
        },
        "tg" => {
            // tg://addstickers?set=<name> is Telegram's own deep link.
            if let Some(set) = form_pairs(url.query()).remove(TG_SET) {
                if !set.is_empty() {
                    return Ok(ConversionRequest::to_signal(set));
                }
            }
            telegram_from_path(raw_path(text))
        }
        "sgnl" => signal_from(url.query(), url.fragment()),
        other => Err(ParseError::UnsupportedScheme(other.to_string())),
    }
}

/// The path component exactly as typed: no percent-encoding, no backslash or
/// dot-segment normalization. `Url` is only trusted for scheme and host.
fn raw_path(text: &str) -> &str {
    let rest = text.trim_matches(|c: char| c <= ' ');
    let rest = rest.split_once(':').map_or(rest, |(_, r)| r);
    let rest = match rest.strip_prefix("//") {
        Some(after) => after
            .find(|c| matches!(c, '/' | '?' | '#'))
            .map_or("", |i| &after[i..]),
        None => rest,
    };
    rest.find(|c| matches!(c, '?' | '#'))
        .map_or(rest, |i| &rest[..i])
}

/// Short name is whatever follows the final `/` of the raw path; a path with
/// no `/` is taken whole.
fn telegram_from_path(path: &str) -> Result<ConversionRequest, ParseError> {
    let short_name = path.rsplit('/').next().unwrap_or(path);
    if short_name.is_empty() {
        return Err(ParseError::EmptyShortName);
    }
    Ok(ConversionRequest::to_signal(short_name))
}

fn signal_from(
    primary: Option<&str>,
    fallback: Option<&str>,
) -> Result<ConversionRequest, ParseError> {
    match signal_keys(primary) {
        Ok(req) => Ok(req),
        Err(err) => match fallback {
            Some(other) => signal_keys(Some(other)).map_err(|_| err),
            None => Err(err),
        },
    }
}

fn signal_keys(component: Option<&str>) -> Result<ConversionRequest, ParseError> {
    let mut pairs = form_pairs(component);
    let pack_id = take_non_empty(&mut pairs, PACK_ID)?;
    let pack_key = take_non_empty(&mut pairs, PACK_KEY)?;
    Ok(ConversionRequest::to_telegram(pack_id, pack_key))
}

/// Decodes `application/x-www-form-urlencoded` pairs. Blank values are
/// dropped; among the rest, later duplicates win.
fn form_pairs(component: Option<&str>) -> HashMap<String, String> {
    form_urlencoded::parse(component.unwrap_or_default().as_bytes())
        .into_owned()
        .filter(|(_, v)| !v.is_empty())
        .collect()
}

fn take_non_empty(
    pairs: &mut HashMap<String, String>,
    key: &'static str,
) -> Result<String, ParseError> {
    match pairs.remove(key) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ParseError::MissingKey(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, PackReference, SignalPack, TelegramPack};

    fn telegram(name: &str) -> PackReference {
        PackReference::Telegram(TelegramPack {
            short_name: name.to_string(),
        })
    }

    fn signal(id: &str, key: &str) -> PackReference {
        PackReference::Signal(SignalPack {
            pack_id: id.to_string(),
            pack_key: key.to_string(),
        })
    }

    #[test]
    fn parses_t_me_links() {
        for link in [
            "https://t.me/addstickers/animals",
            "http://t.me/addstickers/animals",
            "https://t.me/addstickers/animals?utm=x",
        ] {
            let req = parse(link).unwrap();
            assert_eq!(req.pack(), &telegram("animals"), "{link}");
            assert_eq!(req.direction(), Direction::ToSignal);
        }
    }

    #[test]
    fn t_me_short_name_keeps_url_safe_characters() {
        let req = parse("https://t.me/addstickers/Cats_by_bot-2.0~x").unwrap();
        assert_eq!(req.pack(), &telegram("Cats_by_bot-2.0~x"));
    }

    #[test]
    fn t_me_short_name_is_not_percent_decoded() {
        let req = parse("https://t.me/addstickers/a%20b").unwrap();
        assert_eq!(req.pack(), &telegram("a%20b"));
    }

    #[test]
    fn t_me_short_name_is_taken_from_raw_text() {
        for (link, name) in [
            ("https://t.me/addstickers/a b", "a b"),
            ("https://t.me/addstickers/ünï", "ünï"),
            ("https://t.me/addstickers\\animals", "addstickers\\animals"),
            ("https://t.me/addstickers/animals/..", ".."),
            ("https://t.me/addstickers/animals#frag", "animals"),
            ("  https://t.me/addstickers/animals\n", "animals"),
        ] {
            assert_eq!(parse(link).unwrap().pack(), &telegram(name), "{link:?}");
        }
    }

    #[test]
    fn raw_path_handles_authority_and_opaque_forms() {
        assert_eq!(raw_path("https://t.me/addstickers/x?y#z"), "/addstickers/x");
        assert_eq!(raw_path("tg://addstickers?set=x"), "");
        assert_eq!(raw_path("tg:animals"), "animals");
        assert_eq!(raw_path("sgnl:///?pack_id=1"), "/");
    }

    #[test]
    fn t_me_trailing_slash_is_rejected() {
        assert_eq!(
            parse("https://t.me/addstickers/"),
            Err(ParseError::EmptyShortName)
        );
    }

    #[test]
    fn parses_signal_art_links() {
        let req = parse("https://signal.art/addstickers/#pack_id=X&pack_key=Y").unwrap();
        assert_eq!(req.pack(), &signal("X", "Y"));
        assert_eq!(req.direction(), Direction::ToTelegram);
    }

    #[test]
    fn signal_key_order_does_not_matter() {
        let a = parse("https://signal.art/addstickers/#pack_id=X&pack_key=Y").unwrap();
        let b = parse("https://signal.art/addstickers/#pack_key=Y&pack_id=X").unwrap();
        assert_eq!(a, b);

        let c = parse("sgnl://addstickers/?pack_key=def&pack_id=abc").unwrap();
        assert_eq!(c.pack(), &signal("abc", "def"));
    }

    #[test]
    fn signal_values_are_form_decoded() {
        let req = parse("https://signal.art/addstickers/#pack_id=a%2Bb&pack_key=c+d").unwrap();
        assert_eq!(req.pack(), &signal("a+b", "c d"));
    }

    #[test]
    fn signal_art_missing_key_is_rejected() {
        assert_eq!(
            parse("https://signal.art/addstickers/#pack_id=X"),
            Err(ParseError::MissingKey(PACK_KEY))
        );
        assert_eq!(
            parse("https://signal.art/addstickers/#pack_key=Y"),
            Err(ParseError::MissingKey(PACK_ID))
        );
        assert_eq!(
            parse("https://signal.art/addstickers/#pack_id=&pack_key=Y"),
            Err(ParseError::MissingKey(PACK_ID))
        );
    }

    #[test]
    fn blank_duplicate_does_not_erase_earlier_value() {
        let req =
            parse("https://signal.art/addstickers/#pack_id=X&pack_id=&pack_key=Y").unwrap();
        assert_eq!(req.pack(), &signal("X", "Y"));
    }

    #[test]
    fn signal_art_ignores_query_string() {
        assert_eq!(
            parse("https://signal.art/addstickers/?pack_id=X&pack_key=Y"),
            Err(ParseError::MissingKey(PACK_ID))
        );
    }

    #[test]
    fn parses_sgnl_links() {
        for link in [
            "sgnl://addstickers/?pack_id=abc&pack_key=def",
            "sgnl:///?pack_id=abc&pack_key=def",
            "sgnl://addstickers/#pack_id=abc&pack_key=def",
        ] {
            let req = parse(link).unwrap();
            assert_eq!(req.pack(), &signal("abc", "def"), "{link}");
            assert_eq!(req.direction(), Direction::ToTelegram);
        }
    }

    #[test]
    fn sgnl_missing_key_reports_query_error() {
        assert_eq!(
            parse("sgnl://addstickers/?pack_id=abc#pack_id=abc"),
            Err(ParseError::MissingKey(PACK_KEY))
        );
    }

    #[test]
    fn parses_tg_links() {
        let req = parse("tg://addstickers/animals").unwrap();
        assert_eq!(req.pack(), &telegram("animals"));
        assert_eq!(req.direction(), Direction::ToSignal);

        let req = parse("tg://addstickers?set=animals").unwrap();
        assert_eq!(req.pack(), &telegram("animals"));
    }

    #[test]
    fn tg_without_any_name_is_rejected() {
        assert_eq!(parse("tg://addstickers"), Err(ParseError::EmptyShortName));
        assert_eq!(
            parse("tg://addstickers?set="),
            Err(ParseError::EmptyShortName)
        );
    }

    #[test]
    fn bare_path_without_slash_is_taken_whole() {
        let req = parse("tg:animals").unwrap();
        assert_eq!(req.pack(), &telegram("animals"));
    }

    #[test]
    fn unknown_https_host_is_rejected() {
        assert_eq!(
            parse("https://example.com/foo"),
            Err(ParseError::UnsupportedHost("example.com".to_string()))
        );
        assert!(matches!(
            parse("https://www.t.me/addstickers/animals"),
            Err(ParseError::UnsupportedHost(_))
        ));
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        assert_eq!(
            parse("ftp://t.me/addstickers/animals"),
            Err(ParseError::UnsupportedScheme("ftp".to_string()))
        );
    }

    #[test]
    fn non_url_is_rejected() {
        assert!(matches!(parse("hello there"), Err(ParseError::Malformed(_))));
        assert!(matches!(parse(""), Err(ParseError::Malformed(_))));
    }
}
