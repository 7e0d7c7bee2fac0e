use crate::core::{Case, CaseStore, QuestionnaireLink, QuestionnaireLinkStore};
use crate::domain::model::normalize_postcode;
use crate::utils::error::{CaseApiError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Questionnaire link as stored on disk, referencing its case by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    pub qid: String,
    #[serde(default)]
    pub uac: String,
    #[serde(default)]
    pub case_id: Option<Uuid>,
    #[serde(default)]
    pub ccs_case: bool,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Cases and questionnaire links loaded from a JSON fixture file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub cases: Vec<Case>,
    #[serde(default)]
    pub questionnaire_links: Vec<LinkRecord>,
}

impl Dataset {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Joins links to their cases and builds both stores.
    pub fn into_stores(self) -> Result<(InMemoryCaseStore, InMemoryQuestionnaireLinkStore)> {
        let by_id: HashMap<Uuid, &Case> = self.cases.iter().map(|c| (c.case_id, c)).collect();

        let links = self
            .questionnaire_links
            .iter()
            .map(|record| -> Result<QuestionnaireLink> {
                let case = match record.case_id {
                    Some(case_id) => Some(
                        by_id
                            .get(&case_id)
                            .map(|c| (*c).clone())
                            .ok_or_else(|| CaseApiError::ConfigError {
                                message: format!(
                                    "Questionnaire link '{}' references unknown case '{}'",
                                    record.qid, case_id
                                ),
                            })?,
                    ),
                    None => None,
                };

                Ok(QuestionnaireLink {
                    qid: record.qid.clone(),
                    uac: record.uac.clone(),
                    case,
                    ccs_case: record.ccs_case,
                    active: record.active,
                })
            })
            .collect::<Result<Vec<QuestionnaireLink>>>()?;

        tracing::debug!(
            "Loaded {} cases and {} questionnaire links",
            self.cases.len(),
            links.len()
        );

        Ok((
            InMemoryCaseStore::new(self.cases),
            InMemoryQuestionnaireLinkStore::new(links),
        ))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCaseStore {
    cases: Arc<Vec<Case>>,
}

impl InMemoryCaseStore {
    pub fn new(cases: Vec<Case>) -> Self {
        Self {
            cases: Arc::new(cases),
        }
    }
}

#[async_trait]
impl CaseStore for InMemoryCaseStore {
    async fn find_by_uprn(
        &self,
        uprn: &str,
        valid_address_only: bool,
    ) -> Result<Option<Vec<Case>>> {
        let cases: Vec<Case> = self
            .cases
            .iter()
            .filter(|c| c.uprn == uprn)
            .filter(|c| !valid_address_only || !c.address_invalid)
            .cloned()
            .collect();

        Ok(if cases.is_empty() { None } else { Some(cases) })
    }

    async fn find_by_case_id(&self, case_id: Uuid) -> Result<Option<Case>> {
        Ok(self.cases.iter().find(|c| c.case_id == case_id).cloned())
    }

    async fn find_by_case_ref(&self, case_ref: i64) -> Result<Option<Case>> {
        Ok(self.cases.iter().find(|c| c.case_ref == case_ref).cloned())
    }

    async fn find_ccs_by_postcode(&self, postcode: &str) -> Result<Vec<Case>> {
        let wanted = normalize_postcode(postcode);

        Ok(self
            .cases
            .iter()
            .filter(|c| c.ccs_case && normalize_postcode(&c.postcode) == wanted)
            .cloned()
            .collect())
    }

    async fn exists_by_case_id(&self, case_id: Uuid) -> Result<bool> {
        Ok(self.cases.iter().any(|c| c.case_id == case_id))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryQuestionnaireLinkStore {
    links: Arc<Vec<QuestionnaireLink>>,
}

impl InMemoryQuestionnaireLinkStore {
    pub fn new(links: Vec<QuestionnaireLink>) -> Self {
        Self {
            links: Arc::new(links),
        }
    }
}

#[async_trait]
impl QuestionnaireLinkStore for InMemoryQuestionnaireLinkStore {
    async fn find_by_qid(&self, qid: &str) -> Result<Option<QuestionnaireLink>> {
        Ok(self.links.iter().find(|l| l.qid == qid).cloned())
    }

    async fn find_ccs_link_by_case_id(
        &self,
        case_id: Uuid,
        survey: &str,
    ) -> Result<Option<QuestionnaireLink>> {
        Ok(self
            .links
            .iter()
            .find(|l| {
                l.ccs_case
                    && l.case
                        .as_ref()
                        .is_some_and(|c| c.case_id == case_id && c.survey == survey)
            })
            .cloned())
    }
}
