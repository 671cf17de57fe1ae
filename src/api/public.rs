use rocket::{serde::json::Json, Route};

use crate::{
    engine::{commissions, sessions, submission, surveys},
    error::Result,
    model::{
        api::{
            ballot::{Submission, SubmissionReceipt},
            survey::{SuggestionReceipt, SurveySubmission},
            voting::{BallotPaper, RolePage, SurveyPaper},
        },
        storage::Store,
    },
};

pub fn routes() -> Vec<Route> {
    routes![ballot_paper, role_page, submit_ballot, survey_paper, submit_survey]
}

#[get("/vote/commission/<code>")]
async fn ballot_paper(code: &str, store: Store) -> Result<Json<BallotPaper>> {
    let commission = commissions::by_link_code(&store, code).await?;
    Ok(Json(sessions::ballot_paper(&store, &commission).await?))
}

#[get("/vote/commission/<code>/roles/<position>?<search>")]
async fn role_page(code: &str, position: u32, search: Option<&str>, store: Store) -> Result<Json<RolePage>> {
    let commission = commissions::by_link_code(&store, code).await?;
    Ok(Json(
        sessions::role_page(&store, &commission, position, search).await?,
    ))
}

#[post("/vote/commission/<code>", data = "<choices>", format = "json")]
async fn submit_ballot(
    code: &str,
    choices: Json<Submission>,
    store: Store,
) -> Result<Json<SubmissionReceipt>> {
    let commission = commissions::by_link_code(&store, code).await?;
    let receipt = submission::submit(&store, &commission, choices.into_inner()).await?;
    Ok(Json(receipt))
}

#[get("/vote/survey/<code>")]
async fn survey_paper(code: &str, store: Store) -> Result<Json<SurveyPaper>> {
    let survey = surveys::by_link_code(&store, code).await?;
    Ok(Json(sessions::survey_paper(&store, survey).await?))
}

#[post("/vote/survey/<code>", data = "<choices>", format = "json")]
async fn submit_survey(
    code: &str,
    choices: Json<SurveySubmission>,
    store: Store,
) -> Result<Json<SuggestionReceipt>> {
    let survey = surveys::by_link_code(&store, code).await?;
    let suggestions = surveys::submit(&store, &survey, choices.into_inner()).await?;
    Ok(Json(SuggestionReceipt { suggestions }))
}
