use std::collections::HashMap;

use diesel::prelude::*;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use warp::http::StatusCode;
use warp::reply::{self, Reply, Response};

use crate::context::Ctx;
use crate::error::{validation, Error};
use crate::judging::SubmissionWindow;

use super::db::{models, schema};

#[derive(Deserialize)]
pub struct BadgeUpload {
    pub badge_id: i32,
    /// Opaque stored-file reference produced by the upload step.
    pub artwork_file: String,
}

#[derive(Deserialize)]
pub struct ArtistSubmissionRequest {
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub artist_bio: String,
    pub portfolio_link: Option<String>,
    pub statement: String,
    pub demographic_identity: Option<String>,
    pub lane_county_connection: Option<String>,
    pub accessibility_needs: Option<String>,
    pub future_engagement: Option<String>,
    pub consent_to_data: bool,
    #[serde(default)]
    pub opt_in_featured_artwork: bool,
    pub badge_uploads: Vec<BadgeUpload>,
}

#[derive(Deserialize)]
pub struct YouthSubmissionRequest {
    pub name: String,
    pub age: i32,
    pub parent_contact_info: String,
    pub email: String,
    pub about_why_design: String,
    pub about_yourself: String,
    pub badge_id: i32,
    pub artwork_file: String,
}

#[derive(Deserialize)]
pub struct EmailCheck {
    pub email: String,
}

pub fn list_badges(ctx: Ctx) -> Response {
    match list_badges_internal(&ctx) {
        Ok(badges) => reply::json(&badges).into_response(),
        Err(err) => err.into_response(),
    }
}

fn list_badges_internal(ctx: &Ctx) -> Result<Vec<models::Badge>, Error> {
    use schema::badges;

    let conn = &mut ctx.connect()?;
    Ok(badges::table
        .order(badges::id.asc())
        .select(models::Badge::as_select())
        .load(conn)?)
}

pub fn submission_status(ctx: Ctx) -> Response {
    match status_internal(&ctx) {
        Ok(body) => reply::json(&body).into_response(),
        Err(err) => err.into_response(),
    }
}

fn status_internal(ctx: &Ctx) -> Result<serde_json::Value, Error> {
    let conn = &mut ctx.connect()?;
    let window = active_window(conn)?;
    let open = window.map_or(false, |w| w.is_open(ctx.now()));
    Ok(json!({
        "submission_status": if open { "Open" } else { "Closed" },
        "submission_start": window.map_or_else(|| String::from("N/A"), |w| w.display_start()),
        "submission_deadline": window.map_or_else(|| String::from("N/A"), |w| w.display_end()),
    }))
}

/// The most recently configured window, if any.
pub(crate) fn active_window(conn: &mut PgConnection) -> Result<Option<SubmissionWindow>, Error> {
    use schema::submission_periods;

    let period: Option<models::SubmissionPeriod> = submission_periods::table
        .order(submission_periods::id.desc())
        .select(models::SubmissionPeriod::as_select())
        .first(conn)
        .optional()?;
    Ok(period.map(Into::into))
}

/// Non-admins may only submit while the window is open; admins bypass the
/// gate by design.
fn ensure_open(ctx: &Ctx, conn: &mut PgConnection, token: Option<&str>) -> Result<(), Error> {
    let is_admin = ctx
        .sessions
        .current_user(token)
        .map_or(false, |user| user.is_admin);
    if is_admin {
        debug!("submission gate bypassed by admin");
        return Ok(());
    }
    let open = active_window(conn)?.map_or(false, |w| w.is_open(ctx.now()));
    if open {
        Ok(())
    } else {
        Err(Error::WindowClosed)
    }
}

pub fn validate_email(body: EmailCheck, ctx: Ctx) -> Response {
    match email_in_use(&body.email, &ctx) {
        Ok(true) => reply::with_status(
            reply::json(&json!({ "error": "Email is already in use" })),
            StatusCode::CONFLICT,
        )
        .into_response(),
        Ok(false) => reply::json(&json!({ "success": "Email is available" })).into_response(),
        Err(err) => err.into_response(),
    }
}

fn email_in_use(email: &str, ctx: &Ctx) -> Result<bool, Error> {
    if email.is_empty() {
        return Err(validation("Email is required"));
    }
    let conn = &mut ctx.connect()?;
    email_exists(conn, email)
}

pub fn create_artist_submission(
    token: Option<String>,
    body: ArtistSubmissionRequest,
    ctx: Ctx,
) -> Response {
    match create_artist_internal(token.as_deref(), body, &ctx) {
        Ok(id) => reply::json(&json!({ "success": true, "submission_id": id })).into_response(),
        Err(err) => err.into_response(),
    }
}

fn create_artist_internal(
    token: Option<&str>,
    body: ArtistSubmissionRequest,
    ctx: &Ctx,
) -> Result<i32, Error> {
    use schema::{artist_submissions, badge_artworks, badges};

    let conn = &mut ctx.connect()?;
    ensure_open(ctx, conn, token)?;

    if body.badge_uploads.is_empty() {
        return Err(validation("Each badge must have an associated artwork file."));
    }
    if !body.consent_to_data {
        return Err(validation("Consent to data usage is required."));
    }
    if email_exists(conn, &body.email)? {
        return Err(validation("Email is already in use"));
    }

    let submission_id = conn.transaction::<i32, Error, _>(|conn| {
        let submission_id: i32 = diesel::insert_into(artist_submissions::table)
            .values(models::NewArtistSubmission {
                name: body.name.clone(),
                email: body.email.clone(),
                phone_number: body.phone_number.clone(),
                artist_bio: body.artist_bio.clone(),
                portfolio_link: body.portfolio_link.clone(),
                statement: body.statement.clone(),
                demographic_identity: body.demographic_identity.clone(),
                lane_county_connection: body.lane_county_connection.clone(),
                accessibility_needs: body.accessibility_needs.clone(),
                future_engagement: body.future_engagement.clone(),
                consent_to_data: body.consent_to_data,
                opt_in_featured_artwork: body.opt_in_featured_artwork,
            })
            .returning(artist_submissions::id)
            .get_result(conn)?;

        // instance numbers repeats of the same badge within one submission
        let mut per_badge: HashMap<i32, i32> = HashMap::new();
        for upload in &body.badge_uploads {
            let known: i64 = badges::table
                .find(upload.badge_id)
                .count()
                .get_result(conn)?;
            if known == 0 {
                return Err(validation("Invalid badge selection."));
            }
            let instance = per_badge.entry(upload.badge_id).or_insert(0);
            *instance += 1;
            diesel::insert_into(badge_artworks::table)
                .values(models::NewBadgeArtwork {
                    submission_id: Some(submission_id),
                    youth_submission_id: None,
                    badge_id: upload.badge_id,
                    artwork_file: upload.artwork_file.clone(),
                    instance: *instance,
                })
                .execute(conn)?;
        }
        Ok(submission_id)
    })?;

    info!(submission = submission_id, artworks = body.badge_uploads.len(), "artist submission received");
    Ok(submission_id)
}

fn email_exists(conn: &mut PgConnection, email: &str) -> Result<bool, Error> {
    use schema::artist_submissions;

    let count: i64 = artist_submissions::table
        .filter(artist_submissions::email.eq(email))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

pub fn create_youth_submission(
    token: Option<String>,
    body: YouthSubmissionRequest,
    ctx: Ctx,
) -> Response {
    match create_youth_internal(token.as_deref(), body, &ctx) {
        Ok(id) => reply::json(&json!({ "success": true, "submission_id": id })).into_response(),
        Err(err) => err.into_response(),
    }
}

fn create_youth_internal(
    token: Option<&str>,
    body: YouthSubmissionRequest,
    ctx: &Ctx,
) -> Result<i32, Error> {
    use schema::{badge_artworks, badges, youth_artist_submissions};

    let conn = &mut ctx.connect()?;
    ensure_open(ctx, conn, token)?;

    if body.age <= 0 {
        return Err(validation("Please provide a valid age."));
    }
    let known: i64 = badges::table.find(body.badge_id).count().get_result(conn)?;
    if known == 0 {
        return Err(validation("Invalid badge selection."));
    }

    let submission_id = conn.transaction::<i32, Error, _>(|conn| {
        let submission_id: i32 = diesel::insert_into(youth_artist_submissions::table)
            .values(models::NewYouthArtistSubmission {
                name: body.name.clone(),
                age: body.age,
                parent_contact_info: body.parent_contact_info.clone(),
                email: body.email.clone(),
                about_why_design: body.about_why_design.clone(),
                about_yourself: body.about_yourself.clone(),
            })
            .returning(youth_artist_submissions::id)
            .get_result(conn)?;

        diesel::insert_into(badge_artworks::table)
            .values(models::NewBadgeArtwork {
                submission_id: None,
                youth_submission_id: Some(submission_id),
                badge_id: body.badge_id,
                artwork_file: body.artwork_file.clone(),
                instance: 1,
            })
            .execute(conn)?;
        Ok(submission_id)
    })?;

    info!(submission = submission_id, "youth submission received");
    Ok(submission_id)
}

pub fn artwork_detail(item_id: i32, ctx: Ctx) -> Response {
    match detail_internal(item_id, &ctx) {
        Ok(body) => reply::json(&body).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Look the id up as a badge artwork first, then as an adult submission,
/// mirroring how results and gallery pages link through to details.
fn detail_internal(item_id: i32, ctx: &Ctx) -> Result<serde_json::Value, Error> {
    use schema::{artist_submissions, badge_artworks};

    let conn = &mut ctx.connect()?;

    let artwork: Option<models::BadgeArtwork> = badge_artworks::table
        .find(item_id)
        .select(models::BadgeArtwork::as_select())
        .first(conn)
        .optional()?;
    if let Some(artwork) = artwork {
        if let Some(submission_id) = artwork.submission_id {
            let submission: models::ArtistSubmission = artist_submissions::table
                .find(submission_id)
                .select(models::ArtistSubmission::as_select())
                .first(conn)?;
            return Ok(artist_detail(&submission, &[artwork]));
        }
        if let Some(youth_id) = artwork.youth_submission_id {
            return youth_detail(conn, youth_id, &artwork);
        }
    }

    let submission: Option<models::ArtistSubmission> = artist_submissions::table
        .find(item_id)
        .select(models::ArtistSubmission::as_select())
        .first(conn)
        .optional()?;
    let Some(submission) = submission else {
        return Err(Error::NotFound("artwork"));
    };
    let artworks: Vec<models::BadgeArtwork> = badge_artworks::table
        .filter(badge_artworks::submission_id.eq(submission.id))
        .select(models::BadgeArtwork::as_select())
        .load(conn)?;
    Ok(artist_detail(&submission, &artworks))
}

fn artist_detail(
    submission: &models::ArtistSubmission,
    artworks: &[models::BadgeArtwork],
) -> serde_json::Value {
    json!({
        "name": submission.name,
        "email": submission.email,
        "artist_bio": submission.artist_bio,
        "portfolio_link": submission.portfolio_link,
        "statement": submission.statement,
        "demographic_identity": submission.demographic_identity,
        "lane_county_connection": submission.lane_county_connection,
        "accessibility_needs": submission.accessibility_needs,
        "future_engagement": submission.future_engagement,
        "opt_in_featured_artwork": submission.opt_in_featured_artwork,
        "badge_artworks": artworks.iter().map(|artwork| json!({
            "badge_id": artwork.badge_id,
            "artwork_file": format!("static/submissions/{}", artwork.artwork_file),
        })).collect::<Vec<_>>(),
    })
}

fn youth_detail(
    conn: &mut PgConnection,
    youth_id: i32,
    artwork: &models::BadgeArtwork,
) -> Result<serde_json::Value, Error> {
    use schema::youth_artist_submissions;

    let submission: models::YouthArtistSubmission = youth_artist_submissions::table
        .find(youth_id)
        .select(models::YouthArtistSubmission::as_select())
        .first(conn)?;
    Ok(json!({
        "name": submission.name,
        "age": submission.age,
        "email": submission.email,
        "about_why_design": submission.about_why_design,
        "about_yourself": submission.about_yourself,
        "badge_artworks": [{
            "badge_id": artwork.badge_id,
            "artwork_file": format!("static/submissions/{}", artwork.artwork_file),
        }],
    }))
}
