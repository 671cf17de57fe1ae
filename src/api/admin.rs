use rocket::{serde::json::Json, Route, State};

use crate::{
    config::Config,
    engine::{commissions, finalization, members, roles, surveys, tally, tenants},
    error::Result,
    model::{
        api::{
            commission::{
                CommissionDescription, CommissionSettings, CommissionSpec, FinalizationChallenge,
                FinalizationConfirm,
            },
            member::{MemberDescription, MemberSpec, MemberUpdate},
            results::{CommissionResults, SurveyResults},
            role::{MoveDirection, RoleDescription, RoleSpec, RoleUpdate},
            survey::{SurveyDescription, SurveySpec},
            tenant::{TenantDescription, TenantSpec, TenantSummary},
        },
        common::SurveyStatus,
        db::{Commission, Role, Survey},
        storage::{Id, Store},
    },
};

pub fn routes() -> Vec<Route> {
    routes![
        create_tenant,
        tenant_summary,
        create_member,
        list_members,
        update_member,
        delete_member,
        create_commission,
        list_commissions,
        get_commission,
        update_commission,
        open_commission,
        list_roles,
        add_role,
        add_default_roles,
        update_role,
        delete_role,
        move_role,
        start_finalization,
        confirm_finalization,
        commission_results,
        create_survey,
        list_surveys,
        get_survey,
        close_survey,
        reopen_survey,
        survey_results,
    ]
}

fn describe_roles(roles: Vec<Role>) -> Json<Vec<RoleDescription>> {
    Json(roles.into_iter().map(RoleDescription::from).collect())
}

fn describe_commission(commission: Commission, config: &Config) -> Json<CommissionDescription> {
    Json(CommissionDescription::from(commission).with_link(config))
}

async fn describe_survey(store: &Store, survey: Survey, config: &Config) -> Result<SurveyDescription> {
    Ok(surveys::describe(store, survey).await?.with_link(config))
}

#[post("/tenants", data = "<spec>", format = "json")]
async fn create_tenant(spec: Json<TenantSpec>, store: Store) -> Result<Json<TenantDescription>> {
    let tenant = tenants::create(&store, spec.into_inner()).await?;
    Ok(Json(tenant.into()))
}

#[get("/tenants/<tenant_id>/summary")]
async fn tenant_summary(tenant_id: Id, store: Store) -> Result<Json<TenantSummary>> {
    Ok(Json(tenants::summary(&store, tenant_id).await?))
}

#[post("/tenants/<tenant_id>/members", data = "<spec>", format = "json")]
async fn create_member(
    tenant_id: Id,
    spec: Json<MemberSpec>,
    store: Store,
) -> Result<Json<MemberDescription>> {
    let member = members::create(&store, tenant_id, spec.into_inner()).await?;
    Ok(Json(member.into()))
}

#[get("/tenants/<tenant_id>/members?<search>")]
async fn list_members(
    tenant_id: Id,
    search: Option<&str>,
    store: Store,
) -> Result<Json<Vec<MemberDescription>>> {
    let members = members::list(&store, tenant_id, search).await?;
    Ok(Json(members.into_iter().map(Into::into).collect()))
}

#[put("/members/<member_id>", data = "<update>", format = "json")]
async fn update_member(
    member_id: Id,
    update: Json<MemberUpdate>,
    store: Store,
) -> Result<Json<MemberDescription>> {
    let member = members::update(&store, member_id, update.into_inner()).await?;
    Ok(Json(member.into()))
}

#[delete("/members/<member_id>")]
async fn delete_member(member_id: Id, store: Store) -> Result<()> {
    members::delete(&store, member_id).await
}

#[post("/tenants/<tenant_id>/commissions", data = "<spec>", format = "json")]
async fn create_commission(
    tenant_id: Id,
    spec: Json<CommissionSpec>,
    store: Store,
    config: &State<Config>,
) -> Result<Json<CommissionDescription>> {
    let commission = commissions::create(&store, tenant_id, spec.into_inner()).await?;
    Ok(describe_commission(commission, config))
}

#[get("/tenants/<tenant_id>/commissions")]
async fn list_commissions(
    tenant_id: Id,
    store: Store,
    config: &State<Config>,
) -> Result<Json<Vec<CommissionDescription>>> {
    let commissions = commissions::list(&store, tenant_id).await?;
    Ok(Json(
        commissions
            .into_iter()
            .map(|c| CommissionDescription::from(c).with_link(config))
            .collect(),
    ))
}

#[get("/commissions/<commission_id>")]
async fn get_commission(
    commission_id: Id,
    store: Store,
    config: &State<Config>,
) -> Result<Json<CommissionDescription>> {
    let commission: Commission = store.get(commission_id).await?;
    Ok(describe_commission(commission, config))
}

#[put("/commissions/<commission_id>", data = "<settings>", format = "json")]
async fn update_commission(
    commission_id: Id,
    settings: Json<CommissionSettings>,
    store: Store,
    config: &State<Config>,
) -> Result<Json<CommissionDescription>> {
    let commission = commissions::update_settings(&store, commission_id, settings.into_inner()).await?;
    Ok(describe_commission(commission, config))
}

#[post("/commissions/<commission_id>/open")]
async fn open_commission(
    commission_id: Id,
    store: Store,
    config: &State<Config>,
) -> Result<Json<CommissionDescription>> {
    let commission = commissions::open(&store, commission_id).await?;
    Ok(describe_commission(commission, config))
}

#[get("/commissions/<commission_id>/roles?<all>")]
async fn list_roles(
    commission_id: Id,
    all: Option<bool>,
    store: Store,
) -> Result<Json<Vec<RoleDescription>>> {
    store.get::<Commission>(commission_id).await?;
    let roles = roles::list(&store, commission_id, all.unwrap_or(false)).await?;
    Ok(describe_roles(roles))
}

#[post("/commissions/<commission_id>/roles", data = "<spec>", format = "json")]
async fn add_role(
    commission_id: Id,
    spec: Json<RoleSpec>,
    store: Store,
) -> Result<Json<RoleDescription>> {
    let role = roles::add(&store, commission_id, spec.into_inner()).await?;
    Ok(Json(role.into()))
}

#[post("/commissions/<commission_id>/roles/defaults")]
async fn add_default_roles(commission_id: Id, store: Store) -> Result<Json<Vec<RoleDescription>>> {
    let roles = roles::apply_defaults(&store, commission_id).await?;
    Ok(describe_roles(roles))
}

#[put("/commissions/<commission_id>/roles/<role_id>", data = "<update>", format = "json")]
async fn update_role(
    commission_id: Id,
    role_id: Id,
    update: Json<RoleUpdate>,
    store: Store,
) -> Result<Json<RoleDescription>> {
    let role = roles::update(&store, commission_id, role_id, update.into_inner()).await?;
    Ok(Json(role.into()))
}

#[delete("/commissions/<commission_id>/roles/<role_id>")]
async fn delete_role(commission_id: Id, role_id: Id, store: Store) -> Result<Json<Vec<RoleDescription>>> {
    let roles = roles::deactivate(&store, commission_id, role_id).await?;
    Ok(describe_roles(roles))
}

#[post("/commissions/<commission_id>/roles/<role_id>/move/<direction>")]
async fn move_role(
    commission_id: Id,
    role_id: Id,
    direction: MoveDirection,
    store: Store,
) -> Result<Json<Vec<RoleDescription>>> {
    let roles = roles::move_role(&store, commission_id, role_id, direction).await?;
    Ok(describe_roles(roles))
}

#[post("/commissions/<commission_id>/finalization")]
async fn start_finalization(commission_id: Id, store: Store) -> Result<Json<FinalizationChallenge>> {
    Ok(Json(finalization::issue_key(&store, commission_id).await?))
}

#[post(
    "/commissions/<commission_id>/finalization/confirm",
    data = "<confirm>",
    format = "json"
)]
async fn confirm_finalization(
    commission_id: Id,
    confirm: Json<FinalizationConfirm>,
    store: Store,
    config: &State<Config>,
) -> Result<Json<CommissionDescription>> {
    let commission = finalization::confirm(&store, commission_id, &confirm).await?;
    Ok(describe_commission(commission, config))
}

#[get("/commissions/<commission_id>/results")]
async fn commission_results(commission_id: Id, store: Store) -> Result<Json<CommissionResults>> {
    let commission: Commission = store.get(commission_id).await?;
    Ok(Json(tally::commission_results(&store, &commission).await?))
}

#[post("/tenants/<tenant_id>/surveys", data = "<spec>", format = "json")]
async fn create_survey(
    tenant_id: Id,
    spec: Json<SurveySpec>,
    store: Store,
    config: &State<Config>,
) -> Result<Json<SurveyDescription>> {
    let survey = surveys::create(&store, tenant_id, spec.into_inner()).await?;
    Ok(Json(survey.with_link(config)))
}

#[get("/tenants/<tenant_id>/surveys")]
async fn list_surveys(
    tenant_id: Id,
    store: Store,
    config: &State<Config>,
) -> Result<Json<Vec<SurveyDescription>>> {
    let mut descriptions = Vec::new();
    for survey in surveys::list(&store, tenant_id).await? {
        descriptions.push(describe_survey(&store, survey, config).await?);
    }
    Ok(Json(descriptions))
}

#[get("/surveys/<survey_id>")]
async fn get_survey(survey_id: Id, store: Store, config: &State<Config>) -> Result<Json<SurveyDescription>> {
    let survey: Survey = store.get(survey_id).await?;
    Ok(Json(describe_survey(&store, survey, config).await?))
}

#[post("/surveys/<survey_id>/close")]
async fn close_survey(survey_id: Id, store: Store, config: &State<Config>) -> Result<Json<SurveyDescription>> {
    let survey = surveys::set_status(&store, survey_id, SurveyStatus::Closed).await?;
    Ok(Json(describe_survey(&store, survey, config).await?))
}

#[post("/surveys/<survey_id>/reopen")]
async fn reopen_survey(survey_id: Id, store: Store, config: &State<Config>) -> Result<Json<SurveyDescription>> {
    let survey = surveys::set_status(&store, survey_id, SurveyStatus::Open).await?;
    Ok(Json(describe_survey(&store, survey, config).await?))
}

#[get("/surveys/<survey_id>/results")]
async fn survey_results(survey_id: Id, store: Store) -> Result<Json<SurveyResults>> {
    Ok(Json(surveys::results(&store, survey_id).await?))
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::Client,
        serde::json::serde_json,
    };
    use serde::de::DeserializeOwned;

    use crate::model::{
        api::ballot::Submission,
        common::CommissionStatus,
        db::Member,
        storage::Filter,
    };

    use super::*;

    async fn post_json<T: DeserializeOwned + Send + 'static>(client: &Client, uri: String, body: serde_json::Value) -> T {
        let response = client
            .post(uri)
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        response.into_json().await.unwrap()
    }

    async fn get_json<T: DeserializeOwned + Send + 'static>(client: &Client, uri: String) -> T {
        let response = client.get(uri).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        response.into_json().await.unwrap()
    }

    async fn new_tenant(client: &Client) -> TenantDescription {
        post_json(
            client,
            uri!(create_tenant).to_string(),
            serde_json::json!(TenantSpec::example1()),
        )
        .await
    }

    async fn new_commission(client: &Client, tenant_id: Id) -> CommissionDescription {
        post_json(
            client,
            uri!(create_commission(tenant_id)).to_string(),
            serde_json::json!(CommissionSpec::example1()),
        )
        .await
    }

    async fn new_member(client: &Client, tenant_id: Id, name: &str) -> MemberDescription {
        post_json(
            client,
            uri!(create_member(tenant_id)).to_string(),
            serde_json::json!(MemberSpec::example(name)),
        )
        .await
    }

    async fn new_role(client: &Client, commission_id: Id, name: &str, max: u32) -> RoleDescription {
        post_json(
            client,
            uri!(add_role(commission_id)).to_string(),
            serde_json::json!(RoleSpec::example(name, max)),
        )
        .await
    }

    #[backend_test]
    async fn tenant_members_and_summary(client: Client) {
        let tenant = new_tenant(&client).await;
        new_member(&client, *tenant.id, "Maria Silva").await;
        new_member(&client, *tenant.id, "Ana Souza").await;
        let joao = new_member(&client, *tenant.id, "João Pereira").await;

        // Alphabetical, accent-insensitive prefix search on first names.
        let listed: Vec<MemberDescription> =
            get_json(&client, uri!(list_members(*tenant.id, Some("joa"))).to_string()).await;
        assert_eq!(listed, vec![joao.clone()]);
        let listed: Vec<MemberDescription> =
            get_json(&client, uri!(list_members(*tenant.id, _)).to_string()).await;
        let names: Vec<_> = listed.iter().map(|m| m.full_name.as_str()).collect();
        assert_eq!(names, ["Ana Souza", "João Pereira", "Maria Silva"]);

        // Mark one ineligible.
        let response = client
            .put(uri!(update_member(*joao.id)))
            .header(ContentType::JSON)
            .body(serde_json::json!({"eligible": false}).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());

        new_commission(&client, *tenant.id).await;
        let summary: TenantSummary = get_json(&client, uri!(tenant_summary(*tenant.id)).to_string()).await;
        assert_eq!(summary.members, 3);
        assert_eq!(summary.eligible_members, 2);
        assert_eq!(summary.draft_commissions, 1);
        assert_eq!(summary.open_surveys, 0);
    }

    #[backend_test]
    async fn duplicate_slug_conflicts(client: Client) {
        new_tenant(&client).await;
        let response = client
            .post(uri!(create_tenant))
            .header(ContentType::JSON)
            .body(serde_json::json!(TenantSpec::example1()).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::Conflict, response.status());
    }

    #[backend_test]
    async fn unknown_ids_are_not_found(client: Client) {
        let response = client.get(uri!(get_commission(Id::new()))).dispatch().await;
        assert_eq!(Status::NotFound, response.status());
        let body: serde_json::Value = response.into_json().await.unwrap();
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["saved"], "nothing");

        let response = client.get(uri!(tenant_summary(Id::new()))).dispatch().await;
        assert_eq!(Status::NotFound, response.status());
    }

    #[backend_test]
    async fn commission_lifecycle(client: Client) {
        let tenant = new_tenant(&client).await;
        let commission = new_commission(&client, *tenant.id).await;
        assert_eq!(commission.status, CommissionStatus::Draft);
        assert_eq!(commission.link_code.len(), 8);
        assert!(commission
            .voting_link
            .as_deref()
            .unwrap()
            .ends_with(&format!("/vote/commission/{}", commission.link_code)));

        // Settings can be changed, and the description cleared.
        let response = client
            .put(uri!(update_commission(*commission.id)))
            .header(ContentType::JSON)
            .body(serde_json::json!({"name": "Renamed", "description": null}).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        let updated: CommissionDescription = response.into_json().await.unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.description, None);
        assert_eq!(updated.year, commission.year);

        // Finalization is only possible once open.
        let response = client
            .post(uri!(start_finalization(*commission.id)))
            .dispatch()
            .await;
        assert_eq!(Status::Conflict, response.status());

        let opened: CommissionDescription = post_json(
            &client,
            uri!(open_commission(*commission.id)).to_string(),
            serde_json::json!({}),
        )
        .await;
        assert_eq!(opened.status, CommissionStatus::Open);

        // Opening twice is refused.
        let response = client.post(uri!(open_commission(*commission.id))).dispatch().await;
        assert_eq!(Status::Conflict, response.status());

        let listed: Vec<CommissionDescription> =
            get_json(&client, uri!(list_commissions(*tenant.id)).to_string()).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, CommissionStatus::Open);
    }

    #[backend_test]
    async fn role_registry(client: Client) {
        let tenant = new_tenant(&client).await;
        let commission = new_commission(&client, *tenant.id).await;
        let elders = new_role(&client, *commission.id, "Elders", 4).await;
        let deacons = new_role(&client, *commission.id, "Deacons", 2).await;
        let treasurer = new_role(&client, *commission.id, "Treasurer", 1).await;
        assert_eq!((elders.order, deacons.order, treasurer.order), (1, 2, 3));

        // A cap of zero is invalid.
        let response = client
            .post(uri!(add_role(*commission.id)))
            .header(ContentType::JSON)
            .body(serde_json::json!(RoleSpec::example("Nobody", 0)).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::BadRequest, response.status());

        let moved: Vec<RoleDescription> = post_json(
            &client,
            uri!(move_role(*commission.id, *treasurer.id, MoveDirection::Up)).to_string(),
            serde_json::json!({}),
        )
        .await;
        let names: Vec<_> = moved.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Elders", "Treasurer", "Deacons"]);

        // Moving the first role up changes nothing.
        let unmoved: Vec<RoleDescription> = post_json(
            &client,
            uri!(move_role(*commission.id, *elders.id, MoveDirection::Up)).to_string(),
            serde_json::json!({}),
        )
        .await;
        assert_eq!(unmoved, moved);

        let response = client
            .delete(uri!(delete_role(*commission.id, *treasurer.id)))
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        let remaining: Vec<RoleDescription> = response.into_json().await.unwrap();
        let orders: Vec<_> = remaining.iter().map(|r| (r.name.as_str(), r.order)).collect();
        assert_eq!(orders, [("Elders", 1), ("Deacons", 2)]);

        // The deactivated role is still listed on request.
        let all: Vec<RoleDescription> =
            get_json(&client, uri!(list_roles(*commission.id, Some(true))).to_string()).await;
        assert_eq!(all.len(), 3);
        assert!(all.iter().any(|r| r.id == treasurer.id && !r.active));

        let defaults: Vec<RoleDescription> = post_json(
            &client,
            uri!(add_default_roles(*commission.id)).to_string(),
            serde_json::json!({}),
        )
        .await;
        assert_eq!(defaults.len(), 2 + crate::model::db::DEFAULT_ROLES.len());
        assert_eq!(defaults[2].order, 3);
    }

    #[backend_test]
    async fn finalization_locks_the_commission(client: Client, store: Store) {
        let tenant = new_tenant(&client).await;
        let commission = new_commission(&client, *tenant.id).await;
        let role = new_role(&client, *commission.id, "Elders", 2).await;
        client.post(uri!(open_commission(*commission.id))).dispatch().await;

        let challenge: FinalizationChallenge = post_json(
            &client,
            uri!(start_finalization(*commission.id)).to_string(),
            serde_json::json!({}),
        )
        .await;
        assert_eq!(challenge.key.len(), 6);

        // The pending key is never exposed.
        let pending: CommissionDescription =
            get_json(&client, uri!(get_commission(*commission.id)).to_string()).await;
        assert_eq!(pending.finalization_key, None);

        // Without acknowledgment nothing changes.
        let response = client
            .post(uri!(confirm_finalization(*commission.id)))
            .header(ContentType::JSON)
            .body(serde_json::json!({"key": challenge.key}).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::BadRequest, response.status());
        let stored: Commission = store.get(*commission.id).await.unwrap();
        assert_eq!(stored.status, CommissionStatus::Open);

        let finalized: CommissionDescription = post_json(
            &client,
            uri!(confirm_finalization(*commission.id)).to_string(),
            serde_json::json!(FinalizationConfirm {
                key: challenge.key.clone(),
                acknowledged: true,
            }),
        )
        .await;
        assert_eq!(finalized.status, CommissionStatus::Finalized);
        assert_eq!(finalized.finalization_key.as_deref(), Some(challenge.key.as_str()));
        assert!(finalized.finalized_at.is_some());

        // Every further mutation is locked out.
        let response = client
            .post(uri!(add_role(*commission.id)))
            .header(ContentType::JSON)
            .body(serde_json::json!(RoleSpec::example("Late", 1)).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::Locked, response.status());
        let body: serde_json::Value = response.into_json().await.unwrap();
        assert_eq!(body["error"], "committee_finalized");

        let response = client
            .delete(uri!(delete_role(*commission.id, *role.id)))
            .dispatch()
            .await;
        assert_eq!(Status::Locked, response.status());
        let response = client
            .post(uri!(start_finalization(*commission.id)))
            .dispatch()
            .await;
        assert_eq!(Status::Locked, response.status());
        let response = client
            .put(uri!(update_commission(*commission.id)))
            .header(ContentType::JSON)
            .body(serde_json::json!({"name": "Changed"}).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::Locked, response.status());

        let roles: Vec<RoleDescription> =
            get_json(&client, uri!(list_roles(*commission.id, _)).to_string()).await;
        assert_eq!(roles.len(), 1);
    }

    #[backend_test]
    async fn results_report_ranked_counts(client: Client, store: Store) {
        let tenant = new_tenant(&client).await;
        let commission = new_commission(&client, *tenant.id).await;
        let elders = new_role(&client, *commission.id, "Elders", 2).await;
        new_role(&client, *commission.id, "Treasurer", 1).await;
        let m1 = new_member(&client, *tenant.id, "Bruno Lima").await;
        let m2 = new_member(&client, *tenant.id, "Ana Souza").await;
        client.post(uri!(open_commission(*commission.id))).dispatch().await;

        let opened: Commission = store.get(*commission.id).await.unwrap();
        for members in [vec![m1.id, m2.id], vec![m1.id]] {
            crate::engine::submission::submit(&store, &opened, Submission::example(elders.id, &members))
                .await
                .unwrap();
        }

        let results: CommissionResults =
            get_json(&client, uri!(commission_results(*commission.id)).to_string()).await;
        assert_eq!(results.submissions, 2);
        // Roles without ballots are left out.
        assert_eq!(results.roles.len(), 1);
        let tally = &results.roles[0];
        assert_eq!(tally.role_name, "Elders");
        assert_eq!(tally.ballots, 2);
        let counts: Vec<_> = tally
            .votes
            .iter()
            .map(|v| (v.member_id, v.count))
            .collect();
        assert_eq!(counts, [(m1.id, 2), (m2.id, 1)]);

        // Voted-for members cannot be deleted.
        let response = client.delete(uri!(delete_member(*m1.id))).dispatch().await;
        assert_eq!(Status::Conflict, response.status());
        let kept: Option<Member> = store.find_one(&Filter::by_id(*m1.id)).await.unwrap();
        assert!(kept.is_some());
    }

    #[backend_test]
    async fn unreferenced_member_is_deleted(client: Client, store: Store) {
        let tenant = new_tenant(&client).await;
        let member = new_member(&client, *tenant.id, "Carla Dias").await;
        let response = client.delete(uri!(delete_member(*member.id))).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        let gone: Option<Member> = store.find_one(&Filter::by_id(*member.id)).await.unwrap();
        assert!(gone.is_none());
    }

    #[backend_test]
    async fn survey_administration(client: Client) {
        let tenant = new_tenant(&client).await;
        let survey: SurveyDescription = post_json(
            &client,
            uri!(create_survey(*tenant.id)).to_string(),
            serde_json::json!(SurveySpec::example1()),
        )
        .await;
        assert!(survey.link_code.starts_with("SURV"));
        assert_eq!(survey.items.len(), 2);
        assert_eq!(survey.status, SurveyStatus::Open);

        let closed: SurveyDescription = post_json(
            &client,
            uri!(close_survey(*survey.id)).to_string(),
            serde_json::json!({}),
        )
        .await;
        assert_eq!(closed.status, SurveyStatus::Closed);
        let reopened: SurveyDescription = post_json(
            &client,
            uri!(reopen_survey(*survey.id)).to_string(),
            serde_json::json!({}),
        )
        .await;
        assert_eq!(reopened.status, SurveyStatus::Open);

        let listed: Vec<SurveyDescription> =
            get_json(&client, uri!(list_surveys(*tenant.id)).to_string()).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, survey.id);

        let results: SurveyResults = get_json(&client, uri!(survey_results(*survey.id)).to_string()).await;
        assert_eq!(results.suggestion_rows, 0);
        assert!(results.items.iter().all(|item| item.candidates.is_empty()));

        // A commission may only link a survey of its own tenant.
        let other = post_json::<TenantDescription>(
            &client,
            uri!(create_tenant).to_string(),
            serde_json::json!({"name": "Other", "slug": "other", "current_year": 2025}),
        )
        .await;
        let mut spec = CommissionSpec::example1();
        spec.survey_id = Some(survey.id);
        let response = client
            .post(uri!(create_commission(*other.id)))
            .header(ContentType::JSON)
            .body(serde_json::json!(spec).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::BadRequest, response.status());
    }
}
