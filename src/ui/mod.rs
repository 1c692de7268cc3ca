//! Server-rendered page components.

pub mod page;
pub mod recommendations;
pub mod stock_input;

pub use page::{PageController, ViewError};
pub use stock_input::{StockInput, SubmitEvent};

pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
