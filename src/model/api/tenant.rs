use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{api::id::ApiId, db::Tenant};

/// A new tenant, as specified by an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantSpec {
    pub name: String,
    pub slug: String,
    pub current_year: i32,
}

impl From<TenantSpec> for Tenant {
    fn from(spec: TenantSpec) -> Self {
        Tenant::new(spec.name, spec.slug, spec.current_year)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantDescription {
    pub id: ApiId,
    pub name: String,
    pub slug: String,
    pub current_year: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Tenant> for TenantDescription {
    fn from(tenant: Tenant) -> Self {
        Self {
            id: tenant.id.into(),
            name: tenant.name,
            slug: tenant.slug,
            current_year: tenant.current_year,
            created_at: tenant.created_at,
        }
    }
}

/// Headline numbers for a tenant's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantSummary {
    pub tenant: TenantDescription,
    pub members: usize,
    pub eligible_members: usize,
    pub draft_commissions: usize,
    pub open_commissions: usize,
    pub finalized_commissions: usize,
    pub open_surveys: usize,
    pub closed_surveys: usize,
}
