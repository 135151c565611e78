use serde::{Deserialize, Serialize};

use crate::{Board, Direction};

use super::{BoxError, HintError, HintProvider};

/// Connection settings for one remote model. Nothing is read from globals after construction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub name: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl RemoteConfig {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompletionContent {
    Text(String),
    /// Any non-text block, tagged with its type.
    Other(String),
}

/// Transport to a text model, supplied by the embedding application.
pub trait Completion {
    fn complete(&self, config: &RemoteConfig, prompt: &str) -> Result<CompletionContent, BoxError>;
}

impl<F> Completion for F
where
    F: Fn(&RemoteConfig, &str) -> Result<CompletionContent, BoxError>,
{
    fn complete(&self, config: &RemoteConfig, prompt: &str) -> Result<CompletionContent, BoxError> {
        self(config, prompt)
    }
}

pub struct RemoteProvider<C> {
    config: RemoteConfig,
    transport: C,
}

impl<C: Completion> RemoteProvider<C> {
    pub const fn new(config: RemoteConfig, transport: C) -> Self {
        Self { config, transport }
    }

    pub const fn config(&self) -> &RemoteConfig {
        &self.config
    }
}

impl<C: Completion> HintProvider for RemoteProvider<C> {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn is_available(&self) -> bool {
        self.config.has_api_key()
    }

    fn get_hint(&self, board: &Board) -> Result<Direction, HintError> {
        let provider = || self.config.name.clone();

        if !self.is_available() {
            return Err(HintError::Unavailable {
                provider: provider(),
            });
        }

        let prompt = build_prompt(board)?;

        let content = self
            .transport
            .complete(&self.config, &prompt)
            .map_err(|source| HintError::Request {
                provider: provider(),
                source,
            })?;

        match content {
            CompletionContent::Text(text) => {
                text.parse().map_err(|source| HintError::InvalidResponse {
                    provider: provider(),
                    source,
                })
            }
            CompletionContent::Other(kind) => Err(HintError::UnsupportedContent {
                provider: provider(),
                kind,
            }),
        }
    }
}

/// Prompt asking for a single move word, with the board as JSON (`null` for empty).
pub fn build_prompt(board: &Board) -> Result<String, serde_json::Error> {
    let board_json = serde_json::to_string_pretty(board)?;

    Ok(format!(
        "You are an expert player of the sliding-tile game 2048. Suggest the best next move.

Current {size}x{size} board (null = empty cell):
{board_json}

Rules:
- Tiles slide as far as possible in the chosen direction
- Two equal tiles that collide merge into one tile of double value
- After every move a 2 (90%) or a 4 (10%) appears on a random empty cell
- The game ends when no move changes the board

Good strategy keeps the largest tile in a corner, keeps rows and columns ordered,
and avoids filling the board.

Respond with ONLY ONE WORD: left, right, up, or down",
        size = board.size(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> RemoteConfig {
        RemoteConfig {
            name: "Test".to_owned(),
            api_key: api_key.map(str::to_owned),
            base_url: "https://example.invalid".to_owned(),
            model: "test-model".to_owned(),
        }
    }

    fn reply(
        text: &'static str,
    ) -> impl Fn(&RemoteConfig, &str) -> Result<CompletionContent, BoxError> {
        move |_: &RemoteConfig, _: &str| -> Result<CompletionContent, BoxError> {
            Ok(CompletionContent::Text(text.to_owned()))
        }
    }

    #[test]
    fn availability_follows_api_key() {
        assert!(RemoteProvider::new(config(Some("key")), reply("up")).is_available());
        assert!(!RemoteProvider::new(config(Some("  ")), reply("up")).is_available());
        assert!(!RemoteProvider::new(config(None), reply("up")).is_available());
    }

    #[test]
    fn trims_and_lowercases_reply() {
        let provider = RemoteProvider::new(config(Some("key")), reply("  Down\n"));

        assert_eq!(provider.get_hint(&Board::empty(4)).unwrap(), Direction::Down);
    }

    #[test]
    fn rejects_chatty_reply() {
        let provider = RemoteProvider::new(config(Some("key")), reply("I would go left"));

        assert!(matches!(
            provider.get_hint(&Board::empty(4)),
            Err(HintError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn rejects_non_text_content() {
        let provider = RemoteProvider::new(
            config(Some("key")),
            |_: &RemoteConfig, _: &str| -> Result<CompletionContent, BoxError> {
                Ok(CompletionContent::Other("image".to_owned()))
            },
        );

        assert!(matches!(
            provider.get_hint(&Board::empty(4)),
            Err(HintError::UnsupportedContent { kind, .. }) if kind == "image"
        ));
    }

    #[test]
    fn unavailable_provider_does_not_call_transport() {
        let provider = RemoteProvider::new(
            config(None),
            |_: &RemoteConfig, _: &str| -> Result<CompletionContent, BoxError> {
                panic!("transport called without an api key")
            },
        );

        assert!(matches!(
            provider.get_hint(&Board::empty(4)),
            Err(HintError::Unavailable { .. })
        ));
    }

    #[test]
    fn prompt_embeds_board_json() {
        let board = Board::from_rows([[2, 0], [0, 4]]);
        let prompt = build_prompt(&board).unwrap();

        assert!(prompt.contains("2x2 board"));
        assert!(prompt.contains("null"));
        assert!(prompt.ends_with("left, right, up, or down"));
    }
}
