use diesel::prelude::*;
use serde::Serialize;
use tracing::error;
use warp::reply::{self, Reply, Response};

use crate::context::Ctx;
use crate::error::Error;
use crate::judging::{
    aggregate, judge_status, ArtworkRow, Category, CategoryResults, JudgeRow, JudgeStatus, VoteRow,
};

use super::db::schema;
use super::require_judge;

#[derive(Serialize)]
pub struct ResultsView {
    pub adult: CategoryResults,
    pub youth: CategoryResults,
    pub judges_status: JudgeStatus,
    pub error: bool,
}

pub fn get_results(token: Option<String>, ctx: Ctx) -> Response {
    match get_internal(token.as_deref(), &ctx) {
        Ok(view) => reply::json(&view).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Build the full results payload. Individual query failures degrade to
/// empty sections with the `error` flag set, so the results page stays
/// viewable through partial data problems.
fn get_internal(token: Option<&str>, ctx: &Ctx) -> Result<ResultsView, Error> {
    require_judge(ctx, token)?;
    let conn = &mut ctx.connect()?;
    let mut degraded = false;

    let adult_artworks = fetch_or_empty(load_artworks(conn, Category::Adult), &mut degraded);
    let youth_artworks = fetch_or_empty(load_artworks(conn, Category::Youth), &mut degraded);
    let (adult_votes, youth_votes) = match load_votes(conn) {
        Ok(split) => split,
        Err(source) => {
            error!(%source, "failed to load votes for results");
            degraded = true;
            (vec![], vec![])
        }
    };
    let roster = fetch_or_empty(load_roster(conn), &mut degraded);

    let mut all_votes = adult_votes.clone();
    all_votes.extend(youth_votes.iter().cloned());

    Ok(ResultsView {
        adult: aggregate(&adult_artworks, &adult_votes),
        youth: aggregate(&youth_artworks, &youth_votes),
        judges_status: judge_status(&roster, &all_votes),
        error: degraded,
    })
}

fn fetch_or_empty<T>(result: Result<Vec<T>, Error>, degraded: &mut bool) -> Vec<T> {
    match result {
        Ok(rows) => rows,
        Err(source) => {
            error!(%source, "results query failed, degrading");
            *degraded = true;
            vec![]
        }
    }
}

fn load_artworks(conn: &mut PgConnection, category: Category) -> Result<Vec<ArtworkRow>, Error> {
    use schema::{artist_submissions, badge_artworks, badges, youth_artist_submissions};

    let rows: Vec<(i32, String, String, String)> = match category {
        Category::Adult => badge_artworks::table
            .inner_join(badges::table)
            .inner_join(
                artist_submissions::table
                    .on(badge_artworks::submission_id.eq(artist_submissions::id.nullable())),
            )
            .select((
                badge_artworks::id,
                artist_submissions::name,
                badges::name,
                badge_artworks::artwork_file,
            ))
            .load(conn)?,
        Category::Youth => badge_artworks::table
            .inner_join(badges::table)
            .inner_join(
                youth_artist_submissions::table.on(badge_artworks::youth_submission_id
                    .eq(youth_artist_submissions::id.nullable())),
            )
            .select((
                badge_artworks::id,
                youth_artist_submissions::name,
                badges::name,
                badge_artworks::artwork_file,
            ))
            .load(conn)?,
    };

    Ok(rows
        .into_iter()
        .map(
            |(badge_artwork_id, artist_name, badge_name, artwork_file)| ArtworkRow {
                badge_artwork_id,
                artist_name,
                badge_name,
                artwork_file,
            },
        )
        .collect())
}

/// Every vote with its judge's name, split adult/youth by which submission
/// column the row references.
fn load_votes(conn: &mut PgConnection) -> Result<(Vec<VoteRow>, Vec<VoteRow>), Error> {
    use schema::{judge_votes, judges};

    let rows: Vec<(i32, i32, String, i32, Option<i32>)> = judge_votes::table
        .inner_join(judges::table)
        .select((
            judge_votes::badge_artwork_id,
            judges::id,
            judges::name,
            judge_votes::rank,
            judge_votes::submission_id,
        ))
        .load(conn)?;

    let mut adult = vec![];
    let mut youth = vec![];
    for (badge_artwork_id, judge_id, judge_name, rank, submission_id) in rows {
        let vote = VoteRow {
            badge_artwork_id,
            judge_id,
            judge_name,
            rank,
        };
        if submission_id.is_some() {
            adult.push(vote);
        } else {
            youth.push(vote);
        }
    }
    Ok((adult, youth))
}

fn load_roster(conn: &mut PgConnection) -> Result<Vec<JudgeRow>, Error> {
    use schema::judges;

    let rows: Vec<(i32, String)> = judges::table
        .order(judges::name.asc())
        .select((judges::id, judges::name))
        .load(conn)?;
    Ok(rows
        .into_iter()
        .map(|(id, name)| JudgeRow { id, name })
        .collect())
}
