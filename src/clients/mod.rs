pub mod ai;
pub mod options_data;

pub use ai::{OpenAiClient, StrategyAnalyzer};
pub use options_data::OptionsDataClient;

use crate::types::{OptionsData, Ticker};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait OptionsDataSource: Send + Sync {
    async fn fetch_options(&self, ticker: &Ticker) -> Result<OptionsData>;
}
