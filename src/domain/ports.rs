use crate::domain::model::{Envelope, Strategy};
use crate::utils::error::Result;
use async_trait::async_trait;

/// GraphQL 傳輸層:一次呼叫送出一個 POST,值一律走 variables 傳遞
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, query: &str, variables: serde_json::Value) -> Result<Envelope>;
}

pub trait ConfigProvider: Send + Sync {
    fn organization(&self) -> &str;
    fn repo_prefix(&self) -> &str;
    fn strategy(&self) -> Strategy;
    fn template_number(&self) -> Option<u32>;
}
