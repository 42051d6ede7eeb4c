use crate::domain::model::TemplateDescriptor;
use crate::domain::ports::Transport;
use crate::utils::error::{ProvisionError, Result};
use serde_json::json;

const ORGANIZATION_QUERY: &str =
    "query($login: String!) { organization(login: $login) { id } }";

const USER_QUERY: &str = "query($login: String!) { user(login: $login) { id } }";

const REPOSITORY_QUERY: &str =
    "query($owner: String!, $name: String!) { repository(owner: $owner, name: $name) { id } }";

const TEMPLATE_PROJECT_QUERY: &str = "query($login: String!, $number: Int!) { \
organization(login: $login) { projectV2(number: $number) { id title } } }";

const FIND_PROJECTS_QUERY: &str = "query($login: String!, $query: String!) { \
organization(login: $login) { projectsV2(first: 100, query: $query) { nodes { id title } } } }";

const CREATE_PROJECT_MUTATION: &str = "mutation($ownerId: ID!, $repositoryId: ID!, $title: String!) { \
createProjectV2(input: {ownerId: $ownerId, repositoryId: $repositoryId, title: $title}) { \
projectV2 { id } } }";

const COPY_PROJECT_MUTATION: &str = "mutation($projectId: ID!, $ownerId: ID!, $title: String!) { \
copyProjectV2(input: {projectId: $projectId, ownerId: $ownerId, title: $title, includeDraftIssues: true}) { \
projectV2 { id } } }";

const LINK_PROJECT_MUTATION: &str = "mutation($projectId: ID!, $repositoryId: ID!) { \
linkProjectV2ToRepository(input: {projectId: $projectId, repositoryId: $repositoryId}) { \
repository { id } } }";

const ADD_COLLABORATOR_MUTATION: &str = "mutation($projectId: ID!, $userId: ID!) { \
updateProjectV2Collaborators(input: {projectId: $projectId, collaborators: [{userId: $userId, role: ADMIN}]}) { \
collaborators(first: 100) { totalCount } } }";

/// 平台 GraphQL 呼叫的薄包裝:四個解析查詢、三種取得看板的操作、兩個寫入
pub struct BoardsClient<T: Transport> {
    transport: T,
}

impl<T: Transport> BoardsClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub async fn organization_id(&self, login: &str) -> Result<String> {
        let envelope = self
            .transport
            .execute(ORGANIZATION_QUERY, json!({ "login": login }))
            .await?;
        envelope.extract_str("organization.id")
    }

    pub async fn user_id(&self, login: &str) -> Result<String> {
        let envelope = self
            .transport
            .execute(USER_QUERY, json!({ "login": login }))
            .await?;
        envelope.extract_str("user.id")
    }

    pub async fn repository_id(&self, owner: &str, name: &str) -> Result<String> {
        let envelope = self
            .transport
            .execute(REPOSITORY_QUERY, json!({ "owner": owner, "name": name }))
            .await?;
        envelope.extract_str("repository.id")
    }

    pub async fn template_project(&self, login: &str, number: u32) -> Result<TemplateDescriptor> {
        let envelope = self
            .transport
            .execute(
                TEMPLATE_PROJECT_QUERY,
                json!({ "login": login, "number": number }),
            )
            .await?;

        Ok(TemplateDescriptor {
            id: envelope.extract_str("organization.projectV2.id")?,
            title: envelope.extract_str("organization.projectV2.title")?,
        })
    }

    /// 建立空白看板,建立當下就連結 repository,不需要額外的 link 步驟
    pub async fn create_project(
        &self,
        owner_id: &str,
        repository_id: &str,
        title: &str,
    ) -> Result<String> {
        let envelope = self
            .transport
            .execute(
                CREATE_PROJECT_MUTATION,
                json!({ "ownerId": owner_id, "repositoryId": repository_id, "title": title }),
            )
            .await?;
        envelope.extract_str("createProjectV2.projectV2.id")
    }

    /// 從模板複製看板;複製不會連結 repository,呼叫端必須另外 link
    pub async fn copy_project(
        &self,
        template_id: &str,
        owner_id: &str,
        title: &str,
    ) -> Result<String> {
        let envelope = self
            .transport
            .execute(
                COPY_PROJECT_MUTATION,
                json!({ "projectId": template_id, "ownerId": owner_id, "title": title }),
            )
            .await?;
        envelope.extract_str("copyProjectV2.projectV2.id")
    }

    /// 用標題在組織的開放看板中搜尋。平台的 query 參數只是過濾提示,
    /// 不保證精確,所以取回第一頁(最多 100 筆)後還要逐筆比對完全相符。
    pub async fn find_project(&self, login: &str, title: &str) -> Result<String> {
        let envelope = self
            .transport
            .execute(
                FIND_PROJECTS_QUERY,
                json!({ "login": login, "query": format!("is:open {}", title) }),
            )
            .await?;

        let nodes = envelope.extract("organization.projectsV2.nodes")?;
        let nodes = nodes
            .as_array()
            .ok_or_else(|| ProvisionError::MissingField {
                path: "data.organization.projectsV2.nodes".to_string(),
            })?;

        for node in nodes {
            if node.get("title").and_then(|t| t.as_str()) == Some(title) {
                if let Some(id) = node.get("id").and_then(|v| v.as_str()) {
                    return Ok(id.to_string());
                }
            }
        }

        // 只看第一頁:標題落在 100 筆之外就找不到
        Err(ProvisionError::NotFound {
            what: "project",
            name: title.to_string(),
        })
    }

    pub async fn link_project(&self, project_id: &str, repository_id: &str) -> Result<String> {
        let envelope = self
            .transport
            .execute(
                LINK_PROJECT_MUTATION,
                json!({ "projectId": project_id, "repositoryId": repository_id }),
            )
            .await?;
        envelope.extract_str("linkProjectV2ToRepository.repository.id")
    }

    /// 回傳值是看板目前的協作者總數,只作為確認訊號
    pub async fn add_admin_collaborator(&self, project_id: &str, user_id: &str) -> Result<u64> {
        let envelope = self
            .transport
            .execute(
                ADD_COLLABORATOR_MUTATION,
                json!({ "projectId": project_id, "userId": user_id }),
            )
            .await?;
        envelope.extract_u64("updateProjectV2Collaborators.collaborators.totalCount")
    }
}
