use crate::core::client::BoardsClient;
use crate::domain::model::{
    BatchSummary, RecordFailure, RosterRecord, Strategy, TemplateDescriptor,
};
use crate::domain::ports::{ConfigProvider, Transport};
use crate::utils::error::{ProvisionError, Result};

/// 批次供裝:共用識別碼解析一次,之後逐筆跑固定管線。
/// 記錄之間循序處理,單筆失敗只記錄、不中斷批次。
pub struct Provisioner<T: Transport, C: ConfigProvider> {
    client: BoardsClient<T>,
    config: C,
}

impl<T: Transport, C: ConfigProvider> Provisioner<T, C> {
    pub fn new(transport: T, config: C) -> Self {
        Self {
            client: BoardsClient::new(transport),
            config,
        }
    }

    pub async fn run(&self, roster: &[RosterRecord]) -> Result<BatchSummary> {
        let org = self.config.organization();

        // 共用前置條件:這裡失敗就中止整個批次
        let org_id = self.client.organization_id(org).await?;
        tracing::info!("🔍 Resolved organization {} -> {}", org, org_id);

        let template = match self.config.strategy() {
            Strategy::Copy => {
                let number = self.config.template_number().ok_or_else(|| {
                    ProvisionError::MissingConfigError {
                        field: "template_number".to_string(),
                    }
                })?;
                let template = self.client.template_project(org, number).await?;
                tracing::info!("📋 Template project #{}: {}", number, template.title);
                Some(template)
            }
            _ => None,
        };

        let mut summary = BatchSummary::default();
        for record in roster {
            tracing::info!("🚀 Provisioning board for {}", record.title);
            match self
                .provision_record(record, &org_id, template.as_ref())
                .await
            {
                Ok(project_id) => {
                    tracing::info!("✅ {}: project {} ready", record.title, project_id);
                    summary.provisioned.push(record.title.clone());
                }
                Err(e) => {
                    // 單筆失敗:記下標籤與原因,繼續下一筆
                    tracing::error!("❌ {}: {}", record.title, e);
                    summary.failed.push(RecordFailure {
                        label: record.title.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(summary)
    }

    /// 單筆管線:解析帳號 → 解析 repository → 取得看板 → (連結) → 加協作者
    async fn provision_record(
        &self,
        record: &RosterRecord,
        org_id: &str,
        template: Option<&TemplateDescriptor>,
    ) -> Result<String> {
        let org = self.config.organization();

        let user_id = self.client.user_id(&record.username).await?;

        let repo_name = format!("{}-{}", self.config.repo_prefix(), record.username);
        let repo_id = self.client.repository_id(org, &repo_name).await?;

        let project_id = match self.config.strategy() {
            Strategy::Create => {
                self.client
                    .create_project(org_id, &repo_id, &record.title)
                    .await?
            }
            Strategy::Copy => {
                let template = template.ok_or_else(|| ProvisionError::MissingConfigError {
                    field: "template_number".to_string(),
                })?;
                let project_id = self
                    .client
                    .copy_project(&template.id, org_id, &record.title)
                    .await?;
                // 複製出來的看板沒有 repository,必須另外連結。
                // 平台剛建完看板時偶爾還沒就緒,這步可能暫時失敗;重跑批次即可補上。
                self.client.link_project(&project_id, &repo_id).await?;
                project_id
            }
            Strategy::Find => {
                let project_id = self.client.find_project(org, &record.title).await?;
                // 重新連結在平台端是冪等的
                self.client.link_project(&project_id, &repo_id).await?;
                project_id
            }
        };

        let total = self
            .client
            .add_admin_collaborator(&project_id, &user_id)
            .await?;
        tracing::debug!("{}: project now has {} collaborators", record.title, total);

        Ok(project_id)
    }
}
