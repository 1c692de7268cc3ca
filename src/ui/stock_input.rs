use crate::types::Ticker;
use crate::ui::escape_html;

/// Browser submit event as seen by the input control.
#[derive(Debug, Default)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Ticker text field plus "Analyze" button.
#[derive(Debug, Default)]
pub struct StockInput {
    symbol: Ticker,
}

impl StockInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_change(&mut self, raw: &str) {
        self.symbol = Ticker::new(raw);
    }

    pub fn value(&self) -> &Ticker {
        &self.symbol
    }

    /// Hands the current value to `on_analyze`. The field is kept as is and
    /// empty values are passed through.
    pub fn submit<F, R>(&self, event: &mut SubmitEvent, on_analyze: F) -> R
    where
        F: FnOnce(Ticker) -> R,
    {
        event.prevent_default();
        on_analyze(self.symbol.clone())
    }

    pub fn render(&self) -> String {
        format!(
            r#"<form id="stock-input" class="stock-input" action="/analyze" method="post">
  <input type="text" name="symbol" value="{}" placeholder="Enter Stock Symbol" autocomplete="off">
  <button type="submit">Analyze</button>
</form>"#,
            escape_html(self.symbol.as_str())
        )
    }
}
