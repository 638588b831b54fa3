//! Maps incoming message text to what the bot should do about it.

use regex::Regex;

use crate::{
    domain::ConversionRequest,
    errors::Error,
    link::{self, ParseError},
    Result,
};

pub const HELP_PATTERN: &str = r"^/start";
pub const LINK_PATTERN: &str = r"^(https?|sgnl|tg)://";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    ShowHelp,
    Convert(ConversionRequest),
    /// Looked like a link but could not be turned into a pack reference.
    InvalidLink(ParseError),
    /// Ordinary chatter. The bot stays silent.
    Unrecognized,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteKind {
    Help,
    Link,
}

#[derive(Clone, Debug)]
struct Route {
    pattern: Regex,
    kind: RouteKind,
}

/// Ordered `(pattern, kind)` table. The first matching route wins.
#[derive(Clone, Debug)]
pub struct CommandRouter {
    routes: Vec<Route>,
}

impl CommandRouter {
    /// Help first, then links.
    pub fn new() -> Result<Self> {
        Self::from_routes(&[(HELP_PATTERN, RouteKind::Help), (LINK_PATTERN, RouteKind::Link)])
    }

    pub(crate) fn from_routes(routes: &[(&str, RouteKind)]) -> Result<Self> {
        let routes = routes
            .iter()
            .map(|(pattern, kind)| {
                Regex::new(pattern)
                    .map(|pattern| Route {
                        pattern,
                        kind: *kind,
                    })
                    .map_err(|e| Error::Config(format!("invalid route pattern {pattern:?}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { routes })
    }

    pub fn route(&self, text: &str) -> Intent {
        let Some(kind) = self
            .routes
            .iter()
            .find(|r| r.pattern.is_match(text))
            .map(|r| r.kind)
        else {
            return Intent::Unrecognized;
        };

        match kind {
            RouteKind::Help => Intent::ShowHelp,
            RouteKind::Link => match link::parse(text) {
                Ok(req) => Intent::Convert(req),
                Err(e) => Intent::InvalidLink(e),
            },
        }
    }
}
