use std::{sync::Arc, thread, time::Duration};

use lib_2048::{
    ai::get_local_ai_hint,
    hint::{
        hint_with_timeout, BoxError, CompletionContent, HintError, HintProvider, LocalProvider,
        ProviderChain, RemoteConfig, RemoteProvider,
    },
    Board, Direction,
};

fn remote(name: &str, api_key: Option<&str>) -> RemoteConfig {
    RemoteConfig {
        name: name.to_owned(),
        api_key: api_key.map(str::to_owned),
        base_url: "https://example.invalid/v1".to_owned(),
        model: "model".to_owned(),
    }
}

fn failing(_: &RemoteConfig, _: &str) -> Result<CompletionContent, BoxError> {
    Err("connection refused".into())
}

fn answers_up(_: &RemoteConfig, _: &str) -> Result<CompletionContent, BoxError> {
    Ok(CompletionContent::Text("up".to_owned()))
}

fn board() -> Board {
    Board::from_rows([[2, 2, 4, 0], [0, 4, 0, 0], [0, 0, 8, 0], [0, 0, 0, 2]])
}

#[test]
fn remote_answer_takes_priority() {
    let chain = ProviderChain::new()
        .with_provider(RemoteProvider::new(remote("Claude", Some("key")), answers_up))
        .with_provider(LocalProvider::default());

    assert_eq!(chain.get_hint(&board()).unwrap(), Direction::Up);
}

#[test]
fn falls_back_to_local_search() {
    let chain = ProviderChain::new()
        .with_provider(RemoteProvider::new(remote("Claude", Some("key")), failing))
        .with_provider(RemoteProvider::new(remote("Grok", None), answers_up))
        .with_provider(LocalProvider::default());

    assert_eq!(chain.len(), 3);
    assert_eq!(chain.get_hint(&board()).unwrap(), get_local_ai_hint(&board()));
}

#[test]
fn all_remote_failures_are_aggregated() {
    let chain = ProviderChain::new()
        .with_provider(RemoteProvider::new(remote("Claude", Some("key")), failing))
        .with_provider(RemoteProvider::new(remote("Grok", Some("key")), failing));

    let Err(HintError::AllProvidersFailed(failures)) = chain.get_hint(&board()) else {
        panic!("expected aggregate failure");
    };

    assert_eq!(failures.len(), 2);
    assert!(failures
        .iter()
        .all(|failure| matches!(failure, HintError::Request { .. })));
}

struct Slow;

impl HintProvider for Slow {
    fn name(&self) -> &str {
        "Slow"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn get_hint(&self, _board: &Board) -> Result<Direction, HintError> {
        thread::sleep(Duration::from_millis(500));
        Ok(Direction::Down)
    }
}

#[test]
fn timeout_gives_up_on_slow_chain() {
    let chain = Arc::new(ProviderChain::new().with_provider(Slow));

    let result = hint_with_timeout(chain, board(), Duration::from_millis(20));

    assert!(matches!(result, Err(HintError::TimedOut(_))));
}

#[test]
fn timeout_returns_local_hint_in_time() {
    let chain = Arc::new(ProviderChain::new().with_provider(LocalProvider::default()));

    let result = hint_with_timeout(chain, board(), Duration::from_secs(10));

    assert_eq!(result.unwrap(), get_local_ai_hint(&board()));
}
