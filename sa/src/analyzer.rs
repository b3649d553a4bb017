//! CV analysis pipeline
//!
//! Both commands follow the same path: load a prompt document, fill its
//! placeholders, send it with the CV attached as a PDF, then recover and
//! decode the JSON the model wrote.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use prompttext::StructuredResult;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AssessError;
use crate::esco::EscoCatalog;
use crate::llm::{CompletionRequest, LlmClient, LlmError};
use crate::prompts::PromptLoader;
use crate::response_log::{CallInfo, ResponseLogger};
use crate::roles::{self, RoleConfig};

/// Value for `%{cv_text}`; the CV itself travels as a document block
pub const CV_ATTACHMENT_NOTE: &str = "[CV content will be provided as PDF attachment]";

/// Reply budget for role identification unless configured otherwise
pub const ROLE_IDENTIFICATION_MAX_TOKENS: u32 = 2000;

/// A decoded role assessment
#[derive(Debug, Clone)]
pub struct Assessment {
    pub role: String,
    pub config: &'static RoleConfig,
    pub result: StructuredResult,
}

/// Runs assessments and role identification against one LLM client
pub struct Analyzer {
    llm: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    esco: EscoCatalog,
    logger: ResponseLogger,
    temperature: f32,
    identification_max_tokens: u32,
}

impl Analyzer {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: PromptLoader, esco: EscoCatalog, logger: ResponseLogger) -> Self {
        Self {
            llm,
            prompts,
            esco,
            logger,
            temperature: 0.0,
            identification_max_tokens: ROLE_IDENTIFICATION_MAX_TOKENS,
        }
    }

    /// Build an analyzer from configuration, resolving paths against `base`
    pub fn from_config(llm: Arc<dyn LlmClient>, config: &Config, base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self::new(
            llm,
            PromptLoader::new(base, &config.paths.prompts_dir),
            EscoCatalog::new(base.join(&config.paths.esco_dir)),
            ResponseLogger::new(&config.llm_log),
        )
        .with_temperature(config.llm.temperature)
        .with_identification_max_tokens(config.llm.max_tokens)
    }

    /// Temperature recorded in the response log
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Reply budget for `identify_roles`; assessments use their role's budget
    pub fn with_identification_max_tokens(mut self, max_tokens: u32) -> Self {
        self.identification_max_tokens = max_tokens;
        self
    }

    /// Assess the CV at `cv_path` against `role`
    pub async fn analyze(&self, role: &str, cv_path: &Path) -> Result<Assessment, AssessError> {
        debug!(%role, cv = %cv_path.display(), "Analyzer::analyze: called");
        let config = roles::lookup(role)?;
        let cv = read_cv(cv_path)?;

        let template = self.prompts.assessment(config.prompt_key)?;
        let esco_skills = self
            .esco
            .render_for(role)
            .map_err(|e| AssessError::Esco(format!("{e:#}")))?;
        let prompt = template.render(&HashMap::from([
            ("cv_text", CV_ATTACHMENT_NOTE),
            ("esco_skills", esco_skills.as_str()),
        ]))?;

        let text = self.complete(&prompt, cv_path, &cv, config.max_tokens).await?;
        let result = prompttext::decode(&text)?;
        info!(%role, keys = result.len(), "Assessment decoded");

        Ok(Assessment {
            role: role.to_string(),
            config,
            result,
        })
    }

    /// Ask which catalog roles the CV at `cv_path` fits
    pub async fn identify_roles(&self, cv_path: &Path) -> Result<StructuredResult, AssessError> {
        debug!(cv = %cv_path.display(), "Analyzer::identify_roles: called");
        let cv = read_cv(cv_path)?;

        let template = self.prompts.role_identification()?;
        let roles_list = roles_list();
        let prompt = template.render(&HashMap::from([
            ("roles_list", roles_list.as_str()),
            ("cv_text", CV_ATTACHMENT_NOTE),
        ]))?;

        let text = self
            .complete(&prompt, cv_path, &cv, self.identification_max_tokens)
            .await?;
        let result = prompttext::decode(&text)?;
        info!(keys = result.len(), "Role identification decoded");
        Ok(result)
    }

    /// One LLM call; returns the reply text
    async fn complete(&self, prompt: &str, cv_path: &Path, cv: &[u8], max_tokens: u32) -> Result<String, AssessError> {
        info!(model = %self.llm.model(), %max_tokens, "Sending CV for analysis");
        let response = self
            .llm
            .complete(CompletionRequest::with_pdf(prompt, cv, max_tokens))
            .await?;

        if response.is_truncated() {
            warn!(%max_tokens, "LLM reply hit the token limit; recovery will close open structures");
        }

        self.logger.log(
            &CallInfo {
                model: self.llm.model(),
                max_tokens,
                temperature: self.temperature,
                prompt,
                pdf_path: Some(cv_path),
            },
            &response,
        );

        match response.content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(LlmError::InvalidResponse("LLM reply contained no text".to_string()).into()),
        }
    }
}

/// `- role` line per catalog role
pub fn roles_list() -> String {
    roles::valid_roles()
        .iter()
        .map(|r| format!("- {}", r))
        .collect::<Vec<_>>()
        .join("\n")
}

fn read_cv(path: &Path) -> Result<Vec<u8>, AssessError> {
    if !path.is_file() {
        return Err(AssessError::CvNotFound(PathBuf::from(path)));
    }
    std::fs::read(path).map_err(|e| AssessError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmLogConfig;
    use crate::llm::client::mock::MockLlmClient;
    use crate::llm::ContentBlock;
    use prompttext::TemplateError;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        cv: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let cv = dir.path().join("candidate.pdf");
        fs::write(&cv, b"%PDF-1.4 fake cv").unwrap();
        Fixture { dir, cv }
    }

    fn analyzer(mock: Arc<MockLlmClient>, fx: &Fixture) -> Analyzer {
        Analyzer::new(
            mock,
            PromptLoader::embedded_only(),
            EscoCatalog::new(fx.dir.path().join("esco")),
            ResponseLogger::disabled(),
        )
    }

    fn sent_prompt(mock: &MockLlmClient) -> String {
        let requests = mock.requests();
        requests[0].prompt_text().unwrap().to_string()
    }

    #[test]
    fn test_roles_list() {
        assert_eq!(roles_list(), "- data-scientist\n- it-manager\n- software-architect");
    }

    #[tokio::test]
    async fn test_analyze_decodes_fenced_reply() {
        let fx = fixture();
        let mock = Arc::new(MockLlmClient::with_texts(&[
            "Here is the assessment:\n```json\n{\"overall_readiness\": {\"score\": 8, \"summary\": \"Strong\"}}\n```",
        ]));
        let assessment = analyzer(mock.clone(), &fx)
            .analyze("data-scientist", &fx.cv)
            .await
            .unwrap();

        assert_eq!(assessment.role, "data-scientist");
        assert_eq!(assessment.config.max_tokens, 3000);
        assert_eq!(assessment.result["overall_readiness"]["score"], 8);

        let requests = mock.requests();
        let request = &requests[0];
        assert_eq!(request.max_tokens, 3000);
        let blocks = &request.messages[0].content;
        assert!(matches!(blocks[1], ContentBlock::Document { .. }));

        let prompt = sent_prompt(&mock);
        assert!(prompt.contains(CV_ATTACHMENT_NOTE));
        assert!(!prompt.contains("%{"));
    }

    #[tokio::test]
    async fn test_analyze_includes_esco_skills() {
        let fx = fixture();
        let esco = fx.dir.path().join("esco");
        fs::create_dir_all(&esco).unwrap();
        fs::write(esco.join("it-manager-skills.csv"), "uri,label\nu1,manage ICT projects\n").unwrap();

        let mock = Arc::new(MockLlmClient::with_texts(&["{\"identified_skills\": []}"]));
        analyzer(mock.clone(), &fx).analyze("it-manager", &fx.cv).await.unwrap();

        let prompt = sent_prompt(&mock);
        assert!(prompt.contains("ESSENTIAL SKILLS:\n- manage ICT projects"));
        assert_eq!(mock.requests()[0].max_tokens, 4000);
    }

    #[tokio::test]
    async fn test_analyze_recovers_truncated_reply() {
        let fx = fixture();
        let mock = Arc::new(MockLlmClient::with_texts(&[
            "{\"overall_readiness\": {\"score\": 6}, \"missing_essential_skills\": [\"Kubernetes\", \"Helm\"]",
        ]));
        let assessment = analyzer(mock, &fx).analyze("software-architect", &fx.cv).await.unwrap();
        assert_eq!(assessment.result["missing_essential_skills"][1], "Helm");
    }

    #[tokio::test]
    async fn test_analyze_unknown_role_makes_no_call() {
        let fx = fixture();
        let mock = Arc::new(MockLlmClient::with_texts(&["{}"]));
        let err = analyzer(mock.clone(), &fx).analyze("chef", &fx.cv).await.unwrap_err();
        assert!(matches!(err, AssessError::Config(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_missing_cv() {
        let fx = fixture();
        let mock = Arc::new(MockLlmClient::with_texts(&["{}"]));
        let err = analyzer(mock.clone(), &fx)
            .analyze("data-scientist", &fx.dir.path().join("nope.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, AssessError::CvNotFound(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unparseable_reply_keeps_raw_text() {
        let fx = fixture();
        let mock = Arc::new(MockLlmClient::with_texts(&["I cannot assess this document."]));
        let err = analyzer(mock, &fx).analyze("data-scientist", &fx.cv).await.unwrap_err();
        assert_eq!(err.raw_response(), Some("I cannot assess this document."));
    }

    #[tokio::test]
    async fn test_empty_reply_is_invalid_response() {
        let fx = fixture();
        let mock = Arc::new(MockLlmClient::with_texts(&["   "]));
        let err = analyzer(mock, &fx).identify_roles(&fx.cv).await.unwrap_err();
        assert!(matches!(err, AssessError::Llm(LlmError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_llm_failure_propagates() {
        let fx = fixture();
        let mock = Arc::new(MockLlmClient::new(vec![]));
        let err = analyzer(mock, &fx).analyze("data-scientist", &fx.cv).await.unwrap_err();
        assert!(matches!(err, AssessError::Llm(_)));
    }

    #[tokio::test]
    async fn test_identify_roles() {
        let fx = fixture();
        let mock = Arc::new(MockLlmClient::with_texts(&[
            "```json\n{\"summary\": \"Analyst\", \"primary_role\": \"data-scientist\", \"identified_roles\": []}\n```",
        ]));
        let result = analyzer(mock.clone(), &fx).identify_roles(&fx.cv).await.unwrap();
        assert_eq!(result["primary_role"], "data-scientist");

        assert_eq!(mock.requests()[0].max_tokens, ROLE_IDENTIFICATION_MAX_TOKENS);
        let prompt = sent_prompt(&mock);
        assert!(prompt.contains("- data-scientist\n- it-manager\n- software-architect"));
    }

    #[tokio::test]
    async fn test_identify_roles_uses_configured_budget() {
        let fx = fixture();
        let mut config = Config::default();
        config.llm.max_tokens = 1200;

        let mock = Arc::new(MockLlmClient::with_texts(&["{\"summary\": \"ok\"}", "{\"summary\": \"ok\"}"]));
        let analyzer = Analyzer::from_config(mock.clone(), &config, fx.dir.path());
        analyzer.identify_roles(&fx.cv).await.unwrap();
        analyzer.analyze("it-manager", &fx.cv).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].max_tokens, 1200);
        assert_eq!(requests[1].max_tokens, 4000);
    }

    #[tokio::test]
    async fn test_template_without_placeholder_values_fails_before_call() {
        let fx = fixture();
        let prompts = fx.dir.path().join("prompts");
        fs::create_dir_all(&prompts).unwrap();
        fs::write(
            prompts.join("role-identification.md"),
            "## Prompt Template\nRoles: {roles_list}\nCandidate: {candidate_name}\n",
        )
        .unwrap();

        let mock = Arc::new(MockLlmClient::with_texts(&["{}"]));
        let analyzer = Analyzer::new(
            mock.clone(),
            PromptLoader::new(fx.dir.path(), "prompts"),
            EscoCatalog::new(fx.dir.path()),
            ResponseLogger::disabled(),
        );
        let err = analyzer.identify_roles(&fx.cv).await.unwrap_err();
        assert!(matches!(
            err,
            AssessError::Template(TemplateError::MissingPlaceholder(ref name)) if name == "candidate_name"
        ));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_response_is_logged_when_enabled() {
        let fx = fixture();
        let log_dir = fx.dir.path().join("logs");
        let mock = Arc::new(MockLlmClient::with_texts(&["{\"summary\": \"ok\"}"]));
        let analyzer = Analyzer::new(
            mock,
            PromptLoader::embedded_only(),
            EscoCatalog::new(fx.dir.path()),
            ResponseLogger::new(&LlmLogConfig {
                enabled: true,
                dir: log_dir.clone(),
            }),
        )
        .with_temperature(0.1);
        analyzer.identify_roles(&fx.cv).await.unwrap();

        let entries: Vec<_> = fs::read_dir(&log_dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let body = fs::read_to_string(entries[0].as_ref().unwrap().path()).unwrap();
        assert!(body.contains("\"model\": \"mock-model\""));
        assert!(body.contains("candidate.pdf"));
    }
}
