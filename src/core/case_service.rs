use crate::core::identifier::validate_case_id;
use crate::core::{Case, CaseStore, QuestionnaireLink, QuestionnaireLinkStore};
use crate::domain::model::CCS_SURVEY;
use crate::utils::error::{CaseApiError, Result};

/// Resolves cases and questionnaire links from the externally supplied identifiers.
pub struct CaseService<C: CaseStore, L: QuestionnaireLinkStore> {
    case_store: C,
    link_store: L,
}

impl<C: CaseStore, L: QuestionnaireLinkStore> CaseService<C, L> {
    pub fn new(case_store: C, link_store: L) -> Self {
        Self {
            case_store,
            link_store,
        }
    }

    /// Cases at a property. An empty result is reported as not found.
    pub async fn find_by_uprn(&self, uprn: &str, valid_address_only: bool) -> Result<Vec<Case>> {
        tracing::debug!("Entering find_by_uprn");

        match self
            .case_store
            .find_by_uprn(uprn, valid_address_only)
            .await?
        {
            Some(cases) if !cases.is_empty() => Ok(cases),
            _ => Err(CaseApiError::PropertyRefNotFound(uprn.to_string())),
        }
    }

    pub async fn find_by_case_id(&self, case_id: &str) -> Result<Case> {
        tracing::debug!("Entering find_by_case_id");

        let case_id = validate_case_id(case_id)?;

        self.case_store
            .find_by_case_id(case_id)
            .await?
            .ok_or(CaseApiError::CaseIdNotFound(case_id))
    }

    pub async fn find_by_reference(&self, case_ref: i64) -> Result<Case> {
        tracing::debug!("Entering find_by_reference");

        self.case_store
            .find_by_case_ref(case_ref)
            .await?
            .ok_or(CaseApiError::CaseReferenceNotFound(case_ref))
    }

    /// Case a questionnaire was issued for. A link that exists but has not
    /// been assigned a case is a distinct error from a missing link.
    pub async fn find_case_by_qid(&self, qid: &str) -> Result<Case> {
        tracing::debug!("Entering find_case_by_qid");

        let link = self
            .link_store
            .find_by_qid(qid)
            .await?
            .ok_or_else(|| CaseApiError::QidNotFound(qid.to_string()))?;

        link.case
            .ok_or_else(|| CaseApiError::LinkHasNoCase(qid.to_string()))
    }

    /// CCS cases at a postcode. No matches is a valid, empty result.
    pub async fn find_ccs_cases_by_postcode(&self, postcode: &str) -> Result<Vec<Case>> {
        tracing::debug!("Entering find_ccs_cases_by_postcode");

        self.case_store.find_ccs_by_postcode(postcode).await
    }

    pub async fn case_exists(&self, case_id: &str) -> Result<bool> {
        tracing::debug!("Entering case_exists");

        let case_id = validate_case_id(case_id)?;
        self.case_store.exists_by_case_id(case_id).await
    }

    /// CCS questionnaire link for a case. When missing, the error carries the
    /// case id rather than a qid.
    pub async fn find_ccs_link_by_case_id(&self, case_id: &str) -> Result<QuestionnaireLink> {
        tracing::debug!("Entering find_ccs_link_by_case_id");

        let case_id = validate_case_id(case_id)?;

        self.link_store
            .find_ccs_link_by_case_id(case_id, CCS_SURVEY)
            .await?
            .ok_or_else(|| CaseApiError::QidNotFound(case_id.to_string()))
    }
}
