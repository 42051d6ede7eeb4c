use crate::utils::error::{ProvisionError, Result};
use serde::{Deserialize, Serialize};

/// 名單記錄:每行一筆 (看板標題, 平台帳號),載入後不再變動
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRecord {
    pub title: String,
    pub username: String,
}

/// 批次開始時解析一次的模板看板,所有記錄共用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDescriptor {
    pub id: String,
    pub title: String,
}

/// 取得看板的策略,整個批次固定用同一種
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// 建立空白看板並同時連結 repository
    Create,
    /// 從模板複製,之後需要另外連結 repository
    Copy,
    /// 在組織的開放看板中找標題完全相符者
    Find,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub provisioned: Vec<String>,
    pub failed: Vec<RecordFailure>,
}

#[derive(Debug)]
pub struct RecordFailure {
    pub label: String,
    pub reason: String,
}

/// GraphQL 回應的頂層信封
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub data: Option<serde_json::Value>,
    pub errors: Option<Vec<GraphQlErrorItem>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlErrorItem {
    pub message: String,
}

impl Envelope {
    /// 沿著 `a.b.c` 路徑取出 data 底下的欄位。
    /// 信封帶有 errors、或路徑上任何欄位缺少/為 null,都回傳錯誤而不是 panic。
    pub fn extract(&self, path: &str) -> Result<&serde_json::Value> {
        if let Some(first) = self.errors.as_ref().and_then(|errors| errors.first()) {
            return Err(ProvisionError::GraphQlError {
                message: first.message.clone(),
            });
        }

        let mut current = self.data.as_ref().ok_or_else(|| ProvisionError::MissingField {
            path: "data".to_string(),
        })?;

        let mut walked = String::from("data");
        for segment in path.split('.') {
            walked.push('.');
            walked.push_str(segment);
            current = match current.get(segment) {
                Some(value) if !value.is_null() => value,
                _ => return Err(ProvisionError::MissingField { path: walked }),
            };
        }
        Ok(current)
    }

    pub fn extract_str(&self, path: &str) -> Result<String> {
        let value = self.extract(path)?;
        value
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| ProvisionError::MissingField {
                path: format!("data.{}", path),
            })
    }

    pub fn extract_u64(&self, path: &str) -> Result<u64> {
        let value = self.extract(path)?;
        value.as_u64().ok_or_else(|| ProvisionError::MissingField {
            path: format!("data.{}", path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(value: serde_json::Value) -> Envelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_extract_nested_field() {
        let envelope = envelope(serde_json::json!({
            "data": { "organization": { "id": "O_kgDOA1" } }
        }));

        assert_eq!(envelope.extract_str("organization.id").unwrap(), "O_kgDOA1");
    }

    #[test]
    fn test_extract_missing_field_is_error_with_path() {
        let envelope = envelope(serde_json::json!({
            "data": { "organization": {} }
        }));

        let err = envelope.extract_str("organization.id").unwrap_err();
        match err {
            ProvisionError::MissingField { path } => {
                assert_eq!(path, "data.organization.id");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_extract_null_field_is_error() {
        let envelope = envelope(serde_json::json!({
            "data": { "user": null }
        }));

        assert!(envelope.extract("user.id").is_err());
    }

    #[test]
    fn test_errors_array_takes_priority() {
        let envelope = envelope(serde_json::json!({
            "data": null,
            "errors": [{ "message": "Could not resolve to an Organization" }]
        }));

        let err = envelope.extract("organization.id").unwrap_err();
        match err {
            ProvisionError::GraphQlError { message } => {
                assert!(message.contains("Could not resolve"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_extract_u64() {
        let envelope = envelope(serde_json::json!({
            "data": { "collaborators": { "totalCount": 3 } }
        }));

        assert_eq!(envelope.extract_u64("collaborators.totalCount").unwrap(), 3);
    }
}
