pub mod openai;
pub mod prompts;
pub mod schema;

pub use openai::OpenAiClient;

use crate::types::{OptionsData, Strategy};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait StrategyAnalyzer: Send + Sync {
    async fn analyze_options(&self, options_data: &OptionsData) -> Result<Vec<Strategy>>;
    fn model_name(&self) -> &str;
}
