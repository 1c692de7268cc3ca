use crate::clients::{OptionsDataSource, StrategyAnalyzer};
use crate::error::ErrorKind;
use crate::types::{Strategy, Ticker};
use crate::ui::{escape_html, recommendations, StockInput};
use crate::Result;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

// Keeps the browser on the page: submit is intercepted and the results
// region is swapped with the fragment returned by POST /analyze.
const PAGE_SCRIPT: &str = r#"<script>
  const form = document.getElementById('stock-input');
  const field = form.querySelector('input[name="symbol"]');
  field.addEventListener('input', () => { field.value = field.value.toUpperCase(); });
  form.addEventListener('submit', async (event) => {
    event.preventDefault();
    const body = new URLSearchParams(new FormData(form));
    const results = document.getElementById('results');
    try {
      const res = await fetch('/analyze', { method: 'POST', body });
      results.innerHTML = await res.text();
    } catch (err) {
      results.innerHTML = '<div class="error" role="alert"><strong>Could not reach the server</strong></div>';
    }
  });
</script>"#;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewError {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Default)]
struct ViewState {
    ticker: Option<Ticker>,
    strategies: Vec<Strategy>,
    error: Option<ViewError>,
}

/// Owns the page's view state and runs the fetch-then-analyze pipeline.
pub struct PageController {
    options: Arc<dyn OptionsDataSource>,
    analyzer: Arc<dyn StrategyAnalyzer>,
    state: RwLock<ViewState>,
    latest_request: AtomicU64,
}

impl PageController {
    pub fn new(options: Arc<dyn OptionsDataSource>, analyzer: Arc<dyn StrategyAnalyzer>) -> Self {
        Self {
            options,
            analyzer,
            state: RwLock::new(ViewState::default()),
            latest_request: AtomicU64::new(0),
        }
    }

    pub fn model_name(&self) -> &str {
        self.analyzer.model_name()
    }

    /// Fetches options data for `ticker`, asks the analyzer for strategies and
    /// stores them. Results of a request that has since been superseded are
    /// returned to the caller but never written to the view.
    pub async fn handle_analyze(&self, ticker: Ticker) -> Result<Vec<Strategy>> {
        let generation = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(symbol = %ticker, generation, "Analyzing options");

        let outcome = self.run_pipeline(&ticker).await;

        let mut state = self.state.write().await;
        if self.latest_request.load(Ordering::SeqCst) != generation {
            tracing::debug!(symbol = %ticker, generation, "Discarding stale analysis result");
            return outcome;
        }

        state.ticker = Some(ticker);
        match &outcome {
            Ok(strategies) => {
                state.strategies = strategies.clone();
                state.error = None;
            }
            Err(e) => {
                tracing::warn!("Analysis failed: {}", e);
                state.strategies.clear();
                state.error = Some(ViewError {
                    kind: e.kind(),
                    message: e.to_string(),
                });
            }
        }

        outcome
    }

    async fn run_pipeline(&self, ticker: &Ticker) -> Result<Vec<Strategy>> {
        let options_data = self.options.fetch_options(ticker).await?;
        self.analyzer.analyze_options(&options_data).await
    }

    pub async fn strategies(&self) -> Vec<Strategy> {
        self.state.read().await.strategies.clone()
    }

    pub async fn error(&self) -> Option<ViewError> {
        self.state.read().await.error.clone()
    }

    /// Error banner (if any) followed by the recommendations list.
    pub async fn render_results(&self) -> String {
        let state = self.state.read().await;
        render_results(&state)
    }

    pub async fn render(&self) -> String {
        let state = self.state.read().await;

        let mut input = StockInput::new();
        if let Some(ticker) = &state.ticker {
            input.on_change(ticker.as_str());
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Options Strategist</title>
</head>
<body>
<main class="page">
{}
<section id="results">{}</section>
</main>
{}
</body>
</html>
"#,
            input.render(),
            render_results(&state),
            PAGE_SCRIPT
        )
    }
}

fn render_results(state: &ViewState) -> String {
    let mut out = String::new();
    if let Some(error) = &state.error {
        out.push_str(&format!(
            r#"<div class="error" role="alert"><strong>{}</strong><p>{}</p></div>"#,
            escape_html(error.kind.title()),
            escape_html(&error.message)
        ));
    }
    out.push_str(&recommendations::render(&state.strategies));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OptionsData;
    use crate::ui::SubmitEvent;
    use crate::AppError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;

    struct RecordingSource {
        calls: Mutex<Vec<Ticker>>,
    }

    #[async_trait]
    impl OptionsDataSource for RecordingSource {
        async fn fetch_options(&self, ticker: &Ticker) -> Result<OptionsData> {
            self.calls.lock().unwrap().push(ticker.clone());
            Ok(OptionsData(json!({ "symbol": ticker.as_str(), "chain": [1, 2, 3] })))
        }
    }

    struct CannedAnalyzer {
        reply: Vec<Strategy>,
        seen: Mutex<Vec<OptionsData>>,
    }

    #[async_trait]
    impl StrategyAnalyzer for CannedAnalyzer {
        async fn analyze_options(&self, options_data: &OptionsData) -> Result<Vec<Strategy>> {
            self.seen.lock().unwrap().push(options_data.clone());
            Ok(self.reply.clone())
        }

        fn model_name(&self) -> &str {
            "canned"
        }
    }

    /// Answers with one strategy named after the symbol. "SLOW" waits for the
    /// gate and "BAD" fails with a shape error.
    struct ScriptedAnalyzer {
        gate: Notify,
    }

    impl ScriptedAnalyzer {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                gate: Notify::new(),
            })
        }
    }

    #[async_trait]
    impl StrategyAnalyzer for ScriptedAnalyzer {
        async fn analyze_options(&self, options_data: &OptionsData) -> Result<Vec<Strategy>> {
            let symbol = options_data.0["symbol"].as_str().unwrap_or_default().to_string();
            match symbol.as_str() {
                "SLOW" => self.gate.notified().await,
                "BAD" => {
                    return Err(AppError::unparseable(
                        "OpenAI API",
                        "expected a list of strategies",
                    ))
                }
                _ => {}
            }
            Ok(vec![strategy(&symbol, 50.0)])
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn strategy(name: &str, probability: f64) -> Strategy {
        Strategy {
            name: name.to_string(),
            description: format!("{name} description"),
            probability,
        }
    }

    fn source() -> Arc<RecordingSource> {
        Arc::new(RecordingSource {
            calls: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn initial_page_has_input_and_no_list() {
        let controller = PageController::new(source(), ScriptedAnalyzer::new());
        let html = controller.render().await;

        assert!(html.contains(r#"<form id="stock-input""#));
        assert!(!html.contains("recommendations"));
        assert!(controller.strategies().await.is_empty());
    }

    #[tokio::test]
    async fn submit_flows_through_both_clients_to_the_display() {
        let source = source();
        let reply = vec![strategy("Iron Condor", 72.0), strategy("Covered Call", 61.0)];
        let analyzer = Arc::new(CannedAnalyzer {
            reply: reply.clone(),
            seen: Mutex::new(Vec::new()),
        });
        let controller = PageController::new(source.clone(), analyzer.clone());

        let mut input = StockInput::new();
        input.on_change("aapl");
        let mut event = SubmitEvent::new();
        let result = input
            .submit(&mut event, |ticker| controller.handle_analyze(ticker))
            .await
            .unwrap();

        assert!(event.default_prevented());
        assert_eq!(*source.calls.lock().unwrap(), vec![Ticker::new("AAPL")]);
        assert_eq!(
            *analyzer.seen.lock().unwrap(),
            vec![OptionsData(json!({ "symbol": "AAPL", "chain": [1, 2, 3] }))]
        );
        assert_eq!(result, reply);
        assert_eq!(controller.strategies().await, reply);

        let html = controller.render().await;
        let condor = html.find("Iron Condor").unwrap();
        let call = html.find("Covered Call").unwrap();
        assert!(condor < call);
        assert!(html.contains("Probability: 72%"));
        assert!(html.contains(r#"value="AAPL""#));
    }

    #[tokio::test]
    async fn failure_is_recorded_and_replaces_previous_list() {
        let controller = PageController::new(source(), ScriptedAnalyzer::new());

        controller.handle_analyze(Ticker::new("aapl")).await.unwrap();
        assert_eq!(controller.strategies().await.len(), 1);
        assert!(controller.error().await.is_none());

        let err = controller.handle_analyze(Ticker::new("bad")).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnparseableResponse);
        let view_error = controller.error().await.unwrap();
        assert_eq!(view_error.kind, ErrorKind::UnparseableResponse);
        assert!(controller.strategies().await.is_empty());

        let html = controller.render_results().await;
        assert!(html.contains(r#"role="alert""#));
        assert!(html.contains("Could not understand the provider&#39;s reply"));
        assert!(!html.contains("recommendations"));

        controller.handle_analyze(Ticker::new("msft")).await.unwrap();
        assert!(controller.error().await.is_none());
    }

    #[tokio::test]
    async fn stale_response_does_not_overwrite_newer_result() {
        let analyzer = ScriptedAnalyzer::new();
        let controller = Arc::new(PageController::new(source(), analyzer.clone()));

        let slow = tokio::spawn({
            let controller = controller.clone();
            async move { controller.handle_analyze(Ticker::new("slow")).await }
        });

        // Let the slow request register its generation before the fast one.
        while controller.latest_request.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        controller.handle_analyze(Ticker::new("fast")).await.unwrap();
        analyzer.gate.notify_one();
        let slow_result = slow.await.unwrap().unwrap();

        assert_eq!(slow_result[0].name, "SLOW");
        assert_eq!(controller.strategies().await, vec![strategy("FAST", 50.0)]);
    }
}
