//! Debounce laws, run against tokio's paused clock

use async_trait::async_trait;
use clause_editor::{
    DebounceScope, Debounced, DebouncedReparser, EditorConfig, ReparseCoordinator, ReparseResult,
    TemplateRegistry,
};
use clause_model::{CiceroMarkdown, Fragment, FragmentToText, ModelResult, Node};
use clause_template::{DraftOptions, TemplateDefinition, TemplateResult};
use futures::future::join_all;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{advance, sleep, Instant};

const SRC: &str = "https://example.com/archives/echo@1.0.0.cta";

struct Echo;

#[async_trait]
impl TemplateDefinition for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn parse(&self, text: &str) -> TemplateResult<Value> {
        Ok(json!({ "text": text }))
    }

    async fn regenerate_computed_values(&self, _options: DraftOptions) -> TemplateResult<Vec<Node>> {
        sleep(Duration::from_millis(50)).await;
        Ok(vec![Node::text("regenerated")])
    }
}

/// Records every text the coordinator serializes, one entry per reparse
#[derive(Default)]
struct Recorder {
    texts: Mutex<Vec<(String, Instant)>>,
}

impl Recorder {
    fn texts(&self) -> Vec<String> {
        self.texts
            .lock()
            .unwrap()
            .iter()
            .map(|(text, _)| text.clone())
            .collect()
    }

    fn times(&self) -> Vec<Instant> {
        self.texts.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }
}

impl FragmentToText for Recorder {
    fn to_text(&self, children: &[Node]) -> ModelResult<String> {
        let text = CiceroMarkdown::new().to_text(children)?;
        self.texts.lock().unwrap().push((text.clone(), Instant::now()));
        Ok(text)
    }
}

fn setup(scope: DebounceScope) -> (DebouncedReparser, Arc<Recorder>) {
    let registry = TemplateRegistry::new();
    registry.add_template(Arc::new(Echo));

    let recorder = Arc::new(Recorder::default());
    let coordinator = ReparseCoordinator::new(Arc::new(registry), recorder.clone());
    let period = EditorConfig::default().debounce_period();

    (
        DebouncedReparser::new(Arc::new(coordinator), period, scope).unwrap(),
        recorder,
    )
}

fn edit(id: &str, text: &str) -> Fragment {
    Fragment::clause(id, SRC, vec![Node::paragraph(vec![Node::text(text)])])
}

#[tokio::test(start_paused = true)]
async fn test_burst_collapses_to_last_notification() {
    let (reparser, recorder) = setup(DebounceScope::Shared);
    let start = Instant::now();

    let mut pending = Vec::new();
    for text in ["O", "On", "One", "One day"] {
        pending.push(reparser.notify(edit("c1", text)));
        sleep(Duration::from_millis(499)).await;
    }

    let outcomes = join_all(pending.into_iter().map(|p| p.outcome())).await;

    assert_eq!(recorder.texts(), vec!["One day".to_string()]);
    assert_eq!(
        outcomes[..3],
        [Debounced::Superseded, Debounced::Superseded, Debounced::Superseded]
    );
    assert_eq!(outcomes[3], Debounced::Completed(ReparseResult::unchanged()));

    // Fired one quiet period after the last notification
    assert_eq!(
        recorder.times()[0] - start,
        Duration::from_millis(3 * 499 + 500)
    );
}

#[tokio::test(start_paused = true)]
async fn test_separated_notifications_both_run() {
    let (reparser, recorder) = setup(DebounceScope::Shared);

    let first = reparser.notify(edit("c1", "first"));
    sleep(Duration::from_millis(600)).await;
    let second = reparser.notify(edit("c1", "second"));

    assert!(matches!(first.outcome().await, Debounced::Completed(_)));
    assert!(matches!(second.outcome().await, Debounced::Completed(_)));
    assert_eq!(recorder.texts(), vec!["first", "second"]);
}

#[tokio::test(start_paused = true)]
async fn test_shared_scope_starves_other_fragments() {
    let (reparser, recorder) = setup(DebounceScope::Shared);

    let a = reparser.notify(edit("a", "alpha"));
    advance(Duration::from_millis(100)).await;
    let b = reparser.notify(edit("b", "beta"));

    assert_eq!(a.outcome().await, Debounced::Superseded);
    assert!(matches!(b.outcome().await, Debounced::Completed(_)));
    assert_eq!(recorder.texts(), vec!["beta"]);
}

#[tokio::test(start_paused = true)]
async fn test_per_fragment_scope_keeps_both_fragments() {
    let (reparser, recorder) = setup(DebounceScope::PerFragment);

    let a = reparser.notify(edit("a", "alpha"));
    advance(Duration::from_millis(100)).await;
    let b = reparser.notify(edit("b", "beta"));
    let a2 = reparser.notify(edit("a", "alpha two"));
    assert_eq!(reparser.pending(), 2);

    assert_eq!(a.outcome().await, Debounced::Superseded);
    assert!(matches!(b.outcome().await, Debounced::Completed(_)));
    assert!(matches!(a2.outcome().await, Debounced::Completed(_)));

    let mut texts = recorder.texts();
    texts.sort();
    assert_eq!(texts, vec!["alpha two", "beta"]);
}

#[tokio::test(start_paused = true)]
async fn test_in_flight_reparse_is_not_cancelled_by_new_notification() {
    let (reparser, recorder) = setup(DebounceScope::Shared);
    let fragment = Fragment::clause(
        "c1",
        SRC,
        vec![Node::formula("formula-1", "1 + 1", "2")],
    );

    let first = reparser.notify(fragment.clone());
    // Past the quiet period, inside the 50ms regeneration
    sleep(Duration::from_millis(520)).await;
    let second = reparser.notify(fragment);

    let result = match first.outcome().await {
        Debounced::Completed(result) => result,
        other => panic!("first reparse should complete, got {:?}", other),
    };
    assert_eq!(
        result.node.map(|n| n.children),
        Some(vec![Node::text("regenerated")])
    );
    assert!(matches!(second.outcome().await, Debounced::Completed(_)));
    assert_eq!(recorder.texts().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_resolves_waiters() {
    let (reparser, recorder) = setup(DebounceScope::PerFragment);

    let a = reparser.notify(edit("a", "alpha"));
    let b = reparser.notify(edit("b", "beta"));
    reparser.shutdown();

    assert_eq!(a.outcome().await, Debounced::Superseded);
    assert_eq!(b.outcome().await, Debounced::Superseded);

    sleep(Duration::from_secs(1)).await;
    assert!(recorder.texts().is_empty());
}
