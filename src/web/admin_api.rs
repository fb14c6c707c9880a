use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use warp::reply::{self, Reply, Response};

use crate::context::Ctx;
use crate::error::{validation, Error};
use crate::judging::Category;

use super::auth_api::hash_password;
use super::db::{models, schema};
use super::require_admin;

#[derive(Deserialize)]
pub struct BadgeRequest {
    pub name: String,
    pub description: String,
}

#[derive(Deserialize)]
pub struct JudgeRequest {
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Serialize)]
pub struct JudgeView {
    pub id: i32,
    pub name: String,
    pub is_admin: bool,
}

#[derive(Deserialize)]
pub struct PeriodRequest {
    pub submission_start: DateTime<Utc>,
    pub submission_end: DateTime<Utc>,
}

pub fn clear_votes(token: Option<String>, ctx: Ctx) -> Response {
    match clear_votes_internal(token.as_deref(), &ctx) {
        Ok(()) => reply::json(&json!({
            "success": "All judge votes have been cleared successfully."
        }))
        .into_response(),
        Err(err) => err.into_response(),
    }
}

fn clear_votes_internal(token: Option<&str>, ctx: &Ctx) -> Result<(), Error> {
    let admin = require_admin(ctx, token)?;
    let conn = &mut ctx.connect()?;
    let deleted = diesel::delete(schema::judge_votes::table).execute(conn)?;
    warn!(admin = admin.id, deleted, "all votes cleared");
    Ok(())
}

pub fn delete_submission(category: String, id: i32, token: Option<String>, ctx: Ctx) -> Response {
    match delete_submission_internal(&category, id, token.as_deref(), &ctx) {
        Ok(()) => reply::json(&json!({ "success": "Submission deleted successfully." }))
            .into_response(),
        Err(err) => err.into_response(),
    }
}

/// Remove a submission and everything hanging off it: badge artworks first,
/// votes referencing them, then the submission row, in one transaction.
fn delete_submission_internal(
    category: &str,
    id: i32,
    token: Option<&str>,
    ctx: &Ctx,
) -> Result<(), Error> {
    let admin = require_admin(ctx, token)?;
    let category: Category = category.parse()?;

    let conn = &mut ctx.connect()?;
    conn.transaction::<(), Error, _>(|conn| {
        use schema::{artist_submissions, badge_artworks, judge_votes, youth_artist_submissions};

        let deleted = match category {
            Category::Adult => {
                diesel::delete(judge_votes::table.filter(judge_votes::submission_id.eq(id)))
                    .execute(conn)?;
                diesel::delete(badge_artworks::table.filter(badge_artworks::submission_id.eq(id)))
                    .execute(conn)?;
                diesel::delete(artist_submissions::table.find(id)).execute(conn)?
            }
            Category::Youth => {
                diesel::delete(judge_votes::table.filter(judge_votes::youth_submission_id.eq(id)))
                    .execute(conn)?;
                diesel::delete(
                    badge_artworks::table.filter(badge_artworks::youth_submission_id.eq(id)),
                )
                .execute(conn)?;
                diesel::delete(youth_artist_submissions::table.find(id)).execute(conn)?
            }
        };
        if deleted == 0 {
            return Err(Error::NotFound("submission"));
        }
        Ok(())
    })?;

    info!(admin = admin.id, %category, submission = id, "submission deleted with cascade");
    Ok(())
}

pub fn add_badge(token: Option<String>, body: BadgeRequest, ctx: Ctx) -> Response {
    match add_badge_internal(token.as_deref(), &body, &ctx) {
        Ok(badge) => reply::json(&badge).into_response(),
        Err(err) => err.into_response(),
    }
}

fn add_badge_internal(
    token: Option<&str>,
    body: &BadgeRequest,
    ctx: &Ctx,
) -> Result<models::Badge, Error> {
    use schema::badges;

    require_admin(ctx, token)?;
    let conn = &mut ctx.connect()?;

    let existing: i64 = badges::table
        .filter(badges::name.eq(&body.name))
        .count()
        .get_result(conn)?;
    if existing > 0 {
        return Err(validation(format!("Badge '{}' already exists!", body.name)));
    }

    let badge = diesel::insert_into(badges::table)
        .values(models::NewBadge {
            name: body.name.clone(),
            description: body.description.clone(),
        })
        .returning(models::Badge::as_returning())
        .get_result(conn)?;
    info!(badge = %badge.name, "badge added");
    Ok(badge)
}

pub fn update_badge(id: i32, token: Option<String>, body: BadgeRequest, ctx: Ctx) -> Response {
    match update_badge_internal(id, token.as_deref(), &body, &ctx) {
        Ok(()) => reply::json(&json!({ "success": true })).into_response(),
        Err(err) => err.into_response(),
    }
}

fn update_badge_internal(
    id: i32,
    token: Option<&str>,
    body: &BadgeRequest,
    ctx: &Ctx,
) -> Result<(), Error> {
    use schema::badges;

    require_admin(ctx, token)?;
    let conn = &mut ctx.connect()?;
    let updated = diesel::update(badges::table.find(id))
        .set((
            badges::name.eq(&body.name),
            badges::description.eq(&body.description),
        ))
        .execute(conn)?;
    if updated == 0 {
        return Err(Error::NotFound("badge"));
    }
    Ok(())
}

pub fn delete_badge(id: i32, token: Option<String>, ctx: Ctx) -> Response {
    match delete_badge_internal(id, token.as_deref(), &ctx) {
        Ok(()) => reply::json(&json!({ "success": true })).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Deleting a badge takes its artworks and any votes on them along.
fn delete_badge_internal(id: i32, token: Option<&str>, ctx: &Ctx) -> Result<(), Error> {
    require_admin(ctx, token)?;
    let conn = &mut ctx.connect()?;
    conn.transaction::<(), Error, _>(|conn| {
        use schema::{badge_artworks, badges, judge_votes};

        let artwork_ids: Vec<i32> = badge_artworks::table
            .filter(badge_artworks::badge_id.eq(id))
            .select(badge_artworks::id)
            .load(conn)?;
        diesel::delete(
            judge_votes::table.filter(judge_votes::badge_artwork_id.eq_any(&artwork_ids)),
        )
        .execute(conn)?;
        diesel::delete(badge_artworks::table.filter(badge_artworks::badge_id.eq(id)))
            .execute(conn)?;
        let deleted = diesel::delete(badges::table.find(id)).execute(conn)?;
        if deleted == 0 {
            return Err(Error::NotFound("badge"));
        }
        Ok(())
    })
}

pub fn list_judges(token: Option<String>, ctx: Ctx) -> Response {
    match list_judges_internal(token.as_deref(), &ctx) {
        Ok(judges) => reply::json(&judges).into_response(),
        Err(err) => err.into_response(),
    }
}

fn list_judges_internal(token: Option<&str>, ctx: &Ctx) -> Result<Vec<JudgeView>, Error> {
    use schema::judges;

    require_admin(ctx, token)?;
    let conn = &mut ctx.connect()?;
    let rows: Vec<(i32, String, bool)> = judges::table
        .order(judges::name.asc())
        .select((judges::id, judges::name, judges::is_admin))
        .load(conn)?;
    Ok(rows
        .into_iter()
        .map(|(id, name, is_admin)| JudgeView { id, name, is_admin })
        .collect())
}

pub fn add_judge(token: Option<String>, body: JudgeRequest, ctx: Ctx) -> Response {
    match add_judge_internal(token.as_deref(), &body, &ctx) {
        Ok(judge) => reply::json(&judge).into_response(),
        Err(err) => err.into_response(),
    }
}

fn add_judge_internal(
    token: Option<&str>,
    body: &JudgeRequest,
    ctx: &Ctx,
) -> Result<JudgeView, Error> {
    use schema::judges;

    require_admin(ctx, token)?;
    let conn = &mut ctx.connect()?;

    let existing: i64 = judges::table
        .filter(judges::name.eq(&body.name))
        .count()
        .get_result(conn)?;
    if existing > 0 {
        return Err(validation(format!("Judge '{}' already exists!", body.name)));
    }

    let judge: models::Judge = diesel::insert_into(judges::table)
        .values(models::NewJudge {
            name: body.name.clone(),
            password_hash: hash_password(&body.password)?,
            is_admin: body.is_admin,
        })
        .returning(models::Judge::as_returning())
        .get_result(conn)?;
    info!(judge = %judge.name, is_admin = judge.is_admin, "judge added");
    Ok(JudgeView {
        id: judge.id,
        name: judge.name,
        is_admin: judge.is_admin,
    })
}

pub fn remove_judge(id: i32, token: Option<String>, ctx: Ctx) -> Response {
    match remove_judge_internal(id, token.as_deref(), &ctx) {
        Ok(()) => reply::json(&json!({ "success": true })).into_response(),
        Err(err) => err.into_response(),
    }
}

fn remove_judge_internal(id: i32, token: Option<&str>, ctx: &Ctx) -> Result<(), Error> {
    use schema::{judge_votes, judges};

    require_admin(ctx, token)?;
    let conn = &mut ctx.connect()?;

    let judge: Option<models::Judge> = judges::table
        .find(id)
        .select(models::Judge::as_select())
        .first(conn)
        .optional()?;
    let Some(judge) = judge else {
        return Err(Error::NotFound("judge"));
    };
    if judge.is_admin {
        return Err(validation("You cannot remove the admin."));
    }

    conn.transaction::<(), Error, _>(|conn| {
        diesel::delete(judge_votes::table.filter(judge_votes::judge_id.eq(id))).execute(conn)?;
        diesel::delete(judges::table.find(id)).execute(conn)?;
        Ok(())
    })?;
    info!(judge = %judge.name, "judge removed");
    Ok(())
}

pub fn set_period(token: Option<String>, body: PeriodRequest, ctx: Ctx) -> Response {
    match set_period_internal(token.as_deref(), &body, &ctx) {
        Ok(()) => reply::json(&json!({ "success": true })).into_response(),
        Err(err) => err.into_response(),
    }
}

fn set_period_internal(token: Option<&str>, body: &PeriodRequest, ctx: &Ctx) -> Result<(), Error> {
    use schema::submission_periods;

    require_admin(ctx, token)?;
    if body.submission_start >= body.submission_end {
        return Err(validation("Submission period must end after it starts."));
    }

    let conn = &mut ctx.connect()?;
    diesel::insert_into(submission_periods::table)
        .values(models::NewSubmissionPeriod {
            submission_start: body.submission_start.naive_utc(),
            submission_end: body.submission_end.naive_utc(),
        })
        .execute(conn)?;
    info!(
        start = %body.submission_start,
        end = %body.submission_end,
        "submission period updated"
    );
    Ok(())
}
