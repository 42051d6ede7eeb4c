use crate::domain::model::Strategy;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ProvisionError, Result};
use crate::utils::validation::{self, Validate};
use clap::Parser;

pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/graphql";

/// CLI 旗標優先,沒給的值往環境變數找;必要值缺少時啟動直接失敗
#[derive(Debug, Clone, Parser)]
#[command(name = "roster-boards")]
#[command(about = "Bulk-provision per-student project boards from a roster file")]
pub struct CliConfig {
    /// Roster file: one "label<delimiter>username" per line
    #[arg(long, default_value = "roster.txt")]
    pub roster: String,

    /// GraphQL endpoint (env: BOARDS_ENDPOINT)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Organization login (env: BOARDS_ORG)
    #[arg(long)]
    pub org: Option<String>,

    /// Repository name prefix (env: BOARDS_REPO_PREFIX)
    #[arg(long)]
    pub repo_prefix: Option<String>,

    /// Template project number, required for the copy strategy
    /// (env: BOARDS_TEMPLATE_NUMBER)
    #[arg(long)]
    pub template_number: Option<u32>,

    #[arg(long, value_enum, default_value_t = Strategy::Create)]
    pub strategy: Strategy,

    #[arg(long, default_value = ",")]
    pub delimiter: char,

    #[arg(long, default_value = "30")]
    pub timeout_seconds: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// 合併完環境變數、通過驗證的執行設定
#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    pub roster: String,
    pub endpoint: String,
    pub token: String,
    pub org: String,
    pub repo_prefix: String,
    pub template_number: Option<u32>,
    pub strategy: Strategy,
    pub delimiter: u8,
    pub timeout_seconds: u64,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

impl CliConfig {
    pub fn resolve(self) -> Result<ProvisionConfig> {
        let endpoint = self
            .endpoint
            .or_else(|| env_var("BOARDS_ENDPOINT"))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let org = self.org.or_else(|| env_var("BOARDS_ORG"));
        let org = validation::validate_required_field("org", &org)?.clone();

        let repo_prefix = self.repo_prefix.or_else(|| env_var("BOARDS_REPO_PREFIX"));
        let repo_prefix = validation::validate_required_field("repo_prefix", &repo_prefix)?.clone();

        let template_number = match self.template_number {
            Some(number) => Some(number),
            None => match env_var("BOARDS_TEMPLATE_NUMBER") {
                Some(raw) => {
                    Some(
                        raw.parse()
                            .map_err(|_| ProvisionError::InvalidConfigValueError {
                                field: "template_number".to_string(),
                                value: raw.clone(),
                                reason: "Not a valid project number".to_string(),
                            })?,
                    )
                }
                None => None,
            },
        };

        // 憑證只從環境拿,不走旗標
        let token = env_var("GITHUB_TOKEN").ok_or_else(|| ProvisionError::MissingConfigError {
            field: "GITHUB_TOKEN".to_string(),
        })?;

        if !self.delimiter.is_ascii() {
            return Err(ProvisionError::InvalidConfigValueError {
                field: "delimiter".to_string(),
                value: self.delimiter.to_string(),
                reason: "Delimiter must be a single-byte character".to_string(),
            });
        }

        let config = ProvisionConfig {
            roster: self.roster,
            endpoint,
            token,
            org,
            repo_prefix,
            template_number,
            strategy: self.strategy,
            delimiter: self.delimiter as u8,
            timeout_seconds: self.timeout_seconds,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Validate for ProvisionConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("endpoint", &self.endpoint)?;
        validation::validate_non_empty_string("org", &self.org)?;
        validation::validate_non_empty_string("repo_prefix", &self.repo_prefix)?;
        validation::validate_non_empty_string("GITHUB_TOKEN", &self.token)?;
        validation::validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;

        if self.strategy == Strategy::Copy && self.template_number.is_none() {
            return Err(ProvisionError::MissingConfigError {
                field: "template_number".to_string(),
            });
        }

        Ok(())
    }
}

impl ConfigProvider for ProvisionConfig {
    fn organization(&self) -> &str {
        &self.org
    }

    fn repo_prefix(&self) -> &str {
        &self.repo_prefix
    }

    fn strategy(&self) -> Strategy {
        self.strategy
    }

    fn template_number(&self) -> Option<u32> {
        self.template_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ProvisionConfig {
        ProvisionConfig {
            roster: "roster.txt".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: "ghp_test".to_string(),
            org: "my-org".to_string(),
            repo_prefix: "spring-2026".to_string(),
            template_number: None,
            strategy: Strategy::Create,
            delimiter: b',',
            timeout_seconds: 30,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_copy_strategy_requires_template_number() {
        let mut config = valid_config();
        config.strategy = Strategy::Copy;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ProvisionError::MissingConfigError { .. }));

        config.template_number = Some(7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        let mut config = valid_config();
        config.endpoint = "not-a-url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_org_rejected() {
        let mut config = valid_config();
        config.org = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_flags_parse() {
        let cli = CliConfig::parse_from([
            "roster-boards",
            "--roster",
            "students.txt",
            "--org",
            "my-org",
            "--repo-prefix",
            "spring-2026",
            "--strategy",
            "copy",
            "--template-number",
            "7",
        ]);

        assert_eq!(cli.roster, "students.txt");
        assert_eq!(cli.strategy, Strategy::Copy);
        assert_eq!(cli.template_number, Some(7));
        assert_eq!(cli.delimiter, ',');
    }
}
