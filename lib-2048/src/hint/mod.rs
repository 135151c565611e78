//! Move suggestions from an ordered list of interchangeable providers.

use std::{
    sync::{mpsc, Arc},
    thread,
    time::Duration,
};

use tracing::{debug, warn};

use crate::{Board, Direction, ParseDirectionError};

pub mod local;
pub mod remote;

pub use local::LocalProvider;
pub use remote::{build_prompt, Completion, CompletionContent, RemoteConfig, RemoteProvider};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(thiserror::Error, Debug)]
pub enum HintError {
    #[error("{provider} is not configured")]
    Unavailable { provider: String },
    #[error("{provider} request failed: {source}")]
    Request {
        provider: String,
        #[source]
        source: BoxError,
    },
    #[error("{provider} returned {kind} content instead of text")]
    UnsupportedContent { provider: String, kind: String },
    #[error("{provider} returned an invalid direction: {source}")]
    InvalidResponse {
        provider: String,
        #[source]
        source: ParseDirectionError,
    },
    #[error("failed to render board for prompt: {0}")]
    Prompt(#[from] serde_json::Error),
    #[error("all hint providers failed")]
    AllProvidersFailed(Vec<HintError>),
    #[error("no hint within {0:?}")]
    TimedOut(Duration),
}

pub trait HintProvider {
    fn name(&self) -> &str;

    fn is_available(&self) -> bool;

    fn get_hint(&self, board: &Board) -> Result<Direction, HintError>;
}

/// Tries available providers in order and returns the first suggestion.
#[derive(Default)]
pub struct ProviderChain {
    providers: Vec<Box<dyn HintProvider + Send + Sync>>,
}

impl ProviderChain {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_provider(mut self, provider: impl HintProvider + Send + Sync + 'static) -> Self {
        self.push(provider);
        self
    }

    pub fn push(&mut self, provider: impl HintProvider + Send + Sync + 'static) {
        self.providers.push(Box::new(provider));
    }

    pub fn provider_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.providers.iter().map(|provider| provider.name())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn get_hint(&self, board: &Board) -> Result<Direction, HintError> {
        let mut failures = Vec::new();

        for provider in &self.providers {
            if !provider.is_available() {
                debug!(provider = provider.name(), "skipping unavailable hint provider");
                continue;
            }

            match provider.get_hint(board) {
                Ok(direction) => {
                    debug!(provider = provider.name(), %direction, "hint");
                    return Ok(direction);
                }
                Err(err) => {
                    warn!(provider = provider.name(), %err, "hint provider failed");
                    failures.push(err);
                }
            }
        }

        Err(HintError::AllProvidersFailed(failures))
    }
}

/// Runs the chain on a worker thread and stops waiting after `timeout`.
///
/// A timed-out worker is detached and runs to completion in the background.
pub fn hint_with_timeout(
    chain: Arc<ProviderChain>,
    board: Board,
    timeout: Duration,
) -> Result<Direction, HintError> {
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        // The receiver is gone if the caller already timed out.
        let _ = sender.send(chain.get_hint(&board));
    });

    receiver
        .recv_timeout(timeout)
        .unwrap_or(Err(HintError::TimedOut(timeout)))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        name: &'static str,
        available: bool,
        answer: Option<Direction>,
    }

    impl HintProvider for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn get_hint(&self, _board: &Board) -> Result<Direction, HintError> {
            self.answer.ok_or_else(|| HintError::Request {
                provider: self.name.to_owned(),
                source: "boom".into(),
            })
        }
    }

    fn fixed(name: &'static str, available: bool, answer: Option<Direction>) -> Fixed {
        Fixed {
            name,
            available,
            answer,
        }
    }

    #[test]
    fn first_success_wins() {
        let chain = ProviderChain::new()
            .with_provider(fixed("a", true, Some(Direction::Up)))
            .with_provider(fixed("b", true, Some(Direction::Down)));

        assert_eq!(chain.get_hint(&Board::empty(4)).unwrap(), Direction::Up);
    }

    #[test]
    fn unavailable_and_failing_providers_are_skipped() {
        let chain = ProviderChain::new()
            .with_provider(fixed("off", false, Some(Direction::Up)))
            .with_provider(fixed("broken", true, None))
            .with_provider(fixed("ok", true, Some(Direction::Right)));

        assert_eq!(chain.get_hint(&Board::empty(4)).unwrap(), Direction::Right);
        assert_eq!(chain.provider_names().collect::<Vec<_>>(), ["off", "broken", "ok"]);
    }

    #[test]
    fn aggregate_failure_lists_each_attempt() {
        let chain = ProviderChain::new()
            .with_provider(fixed("off", false, None))
            .with_provider(fixed("x", true, None))
            .with_provider(fixed("y", true, None));

        match chain.get_hint(&Board::empty(4)) {
            Err(HintError::AllProvidersFailed(failures)) => assert_eq!(failures.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_chain_fails() {
        assert!(matches!(
            ProviderChain::new().get_hint(&Board::empty(4)),
            Err(HintError::AllProvidersFailed(failures)) if failures.is_empty()
        ));
    }
}
