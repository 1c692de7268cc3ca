use axum::{extract::State, response::Html, Form};
use std::sync::Arc;

use crate::api::AppState;
use crate::types::AnalyzeForm;
use crate::ui::{StockInput, SubmitEvent};

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.page.render().await)
}

/// Form submission from the page script. Always answers with the results
/// fragment; failures show up as the error banner inside it.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AnalyzeForm>,
) -> Html<String> {
    let mut input = StockInput::new();
    input.on_change(&form.symbol);

    let mut event = SubmitEvent::new();
    if let Err(e) = input
        .submit(&mut event, |ticker| state.page.handle_analyze(ticker))
        .await
    {
        tracing::debug!("Rendering error banner: {}", e);
    }

    Html(state.page.render_results().await)
}
