use crate::error::{Error, Result};
use crate::model::{
    api::tenant::{TenantDescription, TenantSpec, TenantSummary},
    common::{CommissionStatus, SurveyStatus},
    db::{Commission, Member, Survey, Tenant},
    storage::{Filter, Id, Store},
};

use super::required;

pub async fn create(store: &Store, spec: TenantSpec) -> Result<Tenant> {
    let spec = TenantSpec {
        name: required(&spec.name, "Tenant name")?,
        slug: required(&spec.slug, "Tenant slug")?.to_lowercase(),
        ..spec
    };
    let taken = store
        .find_one::<Tenant>(&Filter::new().eq("slug", spec.slug.as_str()))
        .await?;
    if taken.is_some() {
        return Err(Error::precondition(format!(
            "Tenant slug {} is already in use",
            spec.slug
        )));
    }
    let tenant = store.insert(&Tenant::from(spec)).await?;
    info!("Created tenant {} ({})", tenant.id, tenant.slug);
    Ok(tenant)
}

/// Count a tenant's members, commissions and surveys.
pub async fn summary(store: &Store, tenant_id: Id) -> Result<TenantSummary> {
    let tenant: Tenant = store.get(tenant_id).await?;
    let scope = Filter::new().eq("tenant_id", tenant_id);
    let members: Vec<Member> = store.find(&scope).await?;
    let commissions: Vec<Commission> = store.find(&scope).await?;
    let surveys: Vec<Survey> = store.find(&scope).await?;

    let commissions_in = |status| commissions.iter().filter(|c| c.status == status).count();
    let surveys_in = |status| surveys.iter().filter(|s| s.status == status).count();
    Ok(TenantSummary {
        members: members.len(),
        eligible_members: members.iter().filter(|m| m.eligible).count(),
        draft_commissions: commissions_in(CommissionStatus::Draft),
        open_commissions: commissions_in(CommissionStatus::Open),
        finalized_commissions: commissions_in(CommissionStatus::Finalized),
        open_surveys: surveys_in(SurveyStatus::Open),
        closed_surveys: surveys_in(SurveyStatus::Closed),
        tenant: TenantDescription::from(tenant),
    })
}
