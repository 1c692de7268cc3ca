use crate::types::Strategy;
use crate::ui::escape_html;

/// Renders one block per strategy in input order; nothing at all when empty.
pub fn render(strategies: &[Strategy]) -> String {
    if strategies.is_empty() {
        return String::new();
    }

    let blocks: Vec<String> = strategies
        .iter()
        .map(|s| {
            format!(
                r#"  <div class="strategy">
    <h2>{}</h2>
    <p>{}</p>
    <p class="probability">Probability: {}%</p>
  </div>"#,
                escape_html(&s.name),
                escape_html(&s.description),
                format_percent(s.probability)
            )
        })
        .collect();

    format!(
        "<div class=\"recommendations\">\n{}\n</div>",
        blocks.join("\n")
    )
}

fn format_percent(probability: f64) -> i64 {
    probability.round() as i64
}
