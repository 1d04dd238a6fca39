use std::collections::BTreeMap;

use lovegrid_engine::{Location, Rng};
use serde::{Deserialize, Serialize};

/// Collection used for a flat message list, and the fallback when a route
/// names no known collection.
pub const DEFAULT_COLLECTION: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Message {
    pub id: u32,
    #[serde(alias = "message")]
    pub text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogJson {
    Flat(Vec<Message>),
    Named(BTreeMap<String, Vec<Message>>),
}

/// Every message collection the host shipped.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    collections: BTreeMap<String, Vec<Message>>,
}

impl MessageCatalog {
    /// Accepts either a flat array of messages or an object of named arrays.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let collections = match serde_json::from_str(json)? {
            CatalogJson::Flat(messages) => {
                let mut map = BTreeMap::new();
                map.insert(DEFAULT_COLLECTION.to_string(), messages);
                map
            }
            CatalogJson::Named(map) => map,
        };
        Ok(Self { collections })
    }

    /// Messages for a route section: the named collection if it exists,
    /// otherwise the default one, otherwise the first.
    pub fn select(&self, section: Option<&str>) -> &[Message] {
        section
            .and_then(|name| self.collections.get(name))
            .or_else(|| self.collections.get(DEFAULT_COLLECTION))
            .or_else(|| self.collections.values().next())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }
}

/// What the page location says about which message to show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    /// Mount path without the deep-link suffix or trailing slash; empty at
    /// the site root.
    pub base: String,
    /// Last segment of `base`, used to pick a collection (`spicy`).
    pub section: Option<String>,
    /// Raw message id from `?v=` or a `/v/<id>` suffix.
    pub deep_link: Option<String>,
}

fn query_param<'a>(search: &'a str, key: &str) -> Option<&'a str> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

/// Split a location into mount path, collection and deep link. The query
/// form wins when both forms are present.
pub fn parse_route(location: &Location) -> Route {
    let mut segments: Vec<&str> = location.path.split('/').filter(|s| !s.is_empty()).collect();

    let mut deep_link = None;
    if segments.len() >= 2 && segments[segments.len() - 2] == "v" {
        deep_link = segments.pop().map(str::to_string);
        segments.pop();
    }
    if let Some(id) = query_param(&location.search, "v").filter(|v| !v.is_empty()) {
        deep_link = Some(id.to_string());
    }

    let base = if segments.is_empty() {
        String::new()
    } else {
        format!("/{}", segments.join("/"))
    };
    Route {
        base,
        section: segments.last().map(|s| s.to_string()),
        deep_link,
    }
}

/// Shareable link that reopens message `id` under the same mount path.
pub fn share_url(origin: &str, base: &str, id: u32) -> String {
    format!(
        "{}{}/?v={}",
        origin.trim_end_matches('/'),
        base.trim_end_matches('/'),
        id
    )
}

/// The active collection and which message is showing.
#[derive(Debug, Clone, Default)]
pub struct MessageDeck {
    messages: Vec<Message>,
    current: Option<usize>,
}

impl MessageDeck {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            current: None,
        }
    }

    /// Choose the first message: the deep-linked one when it resolves,
    /// otherwise uniformly at random.
    pub fn start(&mut self, deep_link: Option<&str>, rng: &mut Rng) -> Option<&Message> {
        if self.messages.is_empty() {
            self.current = None;
            return None;
        }
        let linked = deep_link.and_then(|raw| {
            let found = raw
                .trim()
                .parse::<u32>()
                .ok()
                .and_then(|id| self.messages.iter().position(|m| m.id == id));
            if found.is_none() {
                log::debug!("deep link {:?} not found, picking at random", raw);
            }
            found
        });
        let index = linked.unwrap_or_else(|| rng.next_int(self.messages.len() as u32) as usize);
        self.current = Some(index);
        self.current()
    }

    /// Move to a different message, uniform among the others. With a single
    /// message it stays put.
    pub fn request_next(&mut self, rng: &mut Rng) -> Option<&Message> {
        let current = self.current?;
        let next = rng.next_int_excluding(self.messages.len() as u32, current as u32);
        self.current = Some(next as usize);
        self.current()
    }

    pub fn current(&self) -> Option<&Message> {
        self.current.and_then(|i| self.messages.get(i))
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(path: &str, search: &str) -> Location {
        Location {
            origin: "https://example.com".to_string(),
            path: path.to_string(),
            search: search.to_string(),
        }
    }

    fn hi_bye() -> MessageDeck {
        let catalog = MessageCatalog::from_json(r#"[{"id":1,"text":"hi"},{"id":2,"text":"bye"}]"#).unwrap();
        MessageDeck::new(catalog.select(None).to_vec())
    }

    #[test]
    fn flat_array_becomes_default_collection() {
        let catalog = MessageCatalog::from_json(r#"[{"id":1,"text":"hi"}]"#).unwrap();
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec![DEFAULT_COLLECTION]);
        assert_eq!(catalog.select(Some("spicy"))[0].text, "hi");
    }

    #[test]
    fn named_collections_and_message_alias() {
        let json = r#"{
            "main": [{"id": 1, "message": "roses"}],
            "spicy": [{"id": 7, "message": "overfit to you"}]
        }"#;
        let catalog = MessageCatalog::from_json(json).unwrap();
        assert_eq!(catalog.select(None)[0].text, "roses");
        assert_eq!(catalog.select(Some("spicy"))[0].id, 7);
        assert_eq!(catalog.select(Some("machinelearn.ing"))[0].id, 1);
    }

    #[test]
    fn malformed_catalog_is_an_error() {
        assert!(MessageCatalog::from_json(r#"[{"id":"one"}]"#).is_err());
        assert!(MessageCatalog::from_json("not json").is_err());
    }

    #[test]
    fn deep_link_then_next() {
        let mut deck = hi_bye();
        let mut rng = Rng::new(5);
        assert_eq!(deck.start(Some("2"), &mut rng).map(|m| m.text.as_str()), Some("bye"));
        assert_eq!(deck.request_next(&mut rng).map(|m| m.text.as_str()), Some("hi"));
    }

    #[test]
    fn unknown_deep_link_falls_back_to_random() {
        let mut rng = Rng::new(5);
        for link in ["99", "abc", ""] {
            let mut deck = hi_bye();
            assert!(deck.start(Some(link), &mut rng).is_some());
        }
    }

    #[test]
    fn next_never_repeats_current() {
        let messages = (0..5).map(|i| Message { id: i, text: format!("m{}", i) }).collect();
        let mut deck = MessageDeck::new(messages);
        let mut rng = Rng::new(11);
        deck.start(None, &mut rng);
        for _ in 0..200 {
            let before = deck.current().map(|m| m.id);
            let after = deck.request_next(&mut rng).map(|m| m.id);
            assert_ne!(before, after);
        }
    }

    #[test]
    fn single_message_stays_put() {
        let mut deck = MessageDeck::new(vec![Message { id: 3, text: "only".to_string() }]);
        let mut rng = Rng::new(1);
        deck.start(None, &mut rng);
        assert_eq!(deck.request_next(&mut rng).map(|m| m.id), Some(3));
    }

    #[test]
    fn empty_deck_has_no_current() {
        let mut deck = MessageDeck::new(Vec::new());
        let mut rng = Rng::new(1);
        assert!(deck.start(Some("1"), &mut rng).is_none());
        assert!(deck.request_next(&mut rng).is_none());
    }

    #[test]
    fn route_query_form() {
        let route = parse_route(&location("/", "?v=12"));
        assert_eq!(route.base, "");
        assert_eq!(route.section, None);
        assert_eq!(route.deep_link.as_deref(), Some("12"));
    }

    #[test]
    fn route_path_form_under_mount() {
        let route = parse_route(&location("/machinelearn.ing/spicy/v/4", ""));
        assert_eq!(route.base, "/machinelearn.ing/spicy");
        assert_eq!(route.section.as_deref(), Some("spicy"));
        assert_eq!(route.deep_link.as_deref(), Some("4"));
    }

    #[test]
    fn query_wins_over_path() {
        let route = parse_route(&location("/v/4", "?utm=x&v=9"));
        assert_eq!(route.deep_link.as_deref(), Some("9"));
        assert_eq!(route.base, "");
    }

    #[test]
    fn share_url_has_no_double_slashes() {
        assert_eq!(share_url("https://example.com", "", 2), "https://example.com/?v=2");
        assert_eq!(share_url("https://example.com/", "/spicy/", 7), "https://example.com/spicy/?v=7");
    }
}
