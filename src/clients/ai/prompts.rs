use crate::types::OptionsData;

pub fn build_strategy_prompt(options_data: &OptionsData) -> String {
    format!(
        r#"Based on the following options data: {}, determine the highest probability options strategies.

Reply with JSON only, as an array of strategies in this format:
[
  {{
    "name": "Strategy name",
    "description": "How the strategy is structured and why it fits this data",
    "probability": 0-100
  }}
]

"probability" is the estimated chance of profit as a percentage."#,
        options_data.to_compact_json()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_embeds_compact_payload() {
        let data = OptionsData(json!({"symbol": "AAPL", "puts": [{"strike": 180}]}));
        let prompt = build_strategy_prompt(&data);

        assert!(prompt.starts_with(
            r#"Based on the following options data: {"puts":[{"strike":180}],"symbol":"AAPL"}, determine"#
        ));
        assert!(prompt.contains("\"probability\""));
    }
}
