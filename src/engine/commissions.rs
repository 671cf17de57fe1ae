use mongodb::bson::{doc, Bson, Document};

use crate::error::{Error, Result};
use crate::model::{
    api::commission::{CommissionSettings, CommissionSpec},
    common::CommissionStatus,
    db::{default_roles, Commission, CommissionWrite, Survey, Tenant},
    storage::{Filter, Id, Store},
};

use super::{link_code, optional, required};

/// Check that a survey exists and belongs to the same tenant.
async fn check_survey(store: &Store, tenant_id: Id, survey_id: Id) -> Result<()> {
    let survey: Survey = store.get(survey_id).await?;
    if survey.tenant_id != tenant_id {
        return Err(Error::invalid(format!(
            "Survey {survey_id} belongs to another tenant"
        )));
    }
    Ok(())
}

/// Create a draft commission with a fresh link code.
pub async fn create(store: &Store, tenant_id: Id, spec: CommissionSpec) -> Result<Commission> {
    store.get::<Tenant>(tenant_id).await?;
    let name = required(&spec.name, "Commission name")?;
    if let Some(survey_id) = spec.survey_id {
        check_survey(store, tenant_id, *survey_id).await?;
    }

    let code = link_code::unique::<Commission>(store, link_code::commission_code).await?;
    let commission = Commission {
        description: optional(spec.description),
        anonymity: spec.anonymity,
        survey_id: spec.survey_id.map(Id::from),
        ..Commission::new(tenant_id, name, spec.year, code)
    };

    let mut write = CommissionWrite::create(&commission)?;
    if spec.default_roles {
        write = write.insert(&default_roles(commission.id, 0))?;
    }
    write.commit(store).await?;
    info!(
        "Created commission {} ({}) for tenant {tenant_id}",
        commission.id, commission.link_code
    );
    Ok(commission)
}

pub async fn list(store: &Store, tenant_id: Id) -> Result<Vec<Commission>> {
    let mut commissions: Vec<Commission> = store
        .find(&Filter::new().eq("tenant_id", tenant_id))
        .await?;
    commissions.sort_by(|a, b| b.year.cmp(&a.year).then_with(|| a.name.cmp(&b.name)));
    Ok(commissions)
}

pub async fn by_link_code(store: &Store, code: &str) -> Result<Commission> {
    store
        .find_one(&Filter::new().eq("link_code", code.trim().to_uppercase()))
        .await?
        .ok_or_else(|| Error::not_found(format!("Commission with link code {code}")))
}

/// Change the settings of a commission that has not been finalized.
pub async fn update_settings(store: &Store, commission_id: Id, settings: CommissionSettings) -> Result<Commission> {
    let commission: Commission = store.get(commission_id).await?;

    let mut patch = Document::new();
    if let Some(name) = settings.name {
        patch.insert("name", required(&name, "Commission name")?);
    }
    if let Some(description) = settings.description {
        patch.insert("description", optional(description));
    }
    if let Some(year) = settings.year {
        patch.insert("year", year);
    }
    if let Some(anonymity) = settings.anonymity {
        patch.insert("anonymity", anonymity);
    }
    if let Some(survey_id) = settings.survey_id {
        let survey_id = survey_id.map(Id::from);
        if let Some(survey_id) = survey_id {
            check_survey(store, commission.tenant_id, survey_id).await?;
        }
        patch.insert("survey_id", survey_id.map_or(Bson::Null, Bson::from));
    }

    if patch.is_empty() {
        return Ok(commission);
    }
    CommissionWrite::new(commission_id, &CommissionStatus::EDITABLE)
        .update::<Commission>(Filter::by_id(commission_id), patch)
        .commit(store)
        .await?;
    store.get(commission_id).await
}

/// Start accepting ballots.
pub async fn open(store: &Store, commission_id: Id) -> Result<Commission> {
    CommissionWrite::new(commission_id, &[CommissionStatus::Draft])
        .update::<Commission>(
            Filter::by_id(commission_id),
            doc! {"status": CommissionStatus::Open},
        )
        .commit(store)
        .await?;
    info!("Commission {commission_id} opened for voting");
    store.get(commission_id).await
}
