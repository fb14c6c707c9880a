use std::collections::HashMap;

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};
use warp::reply::{self, Reply, Response};

use crate::context::Ctx;
use crate::error::Error;
use crate::judging::{self, Category};

use super::db::{models, schema};
use super::require_judge;

/// One candidate on a judge's ballot. Ranking happens by submission id; the
/// artwork and badge fields are for display.
#[derive(Clone, Serialize)]
pub struct BallotEntry {
    pub submission_id: i32,
    pub artist_name: String,
    pub badge_id: i32,
    pub badge_name: String,
    pub artwork_file: String,
}

#[derive(Serialize)]
pub struct BallotView {
    pub artist_submissions: Vec<BallotEntry>,
    pub youth_submissions: Vec<BallotEntry>,
}

#[derive(Deserialize)]
pub struct SubmitRanking {
    pub category: Category,
    pub ranked_ids: Vec<i32>,
}

pub fn get_ballot(token: Option<String>, ctx: Ctx) -> Response {
    match get_internal(token.as_deref(), &ctx) {
        Ok(view) => reply::json(&view).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn submit_ranking(token: Option<String>, body: SubmitRanking, ctx: Ctx) -> Response {
    match submit_internal(token.as_deref(), &body, &ctx) {
        Ok(()) => reply::json(&json!({ "success": true })).into_response(),
        Err(err) => err.into_response(),
    }
}

fn get_internal(token: Option<&str>, ctx: &Ctx) -> Result<BallotView, Error> {
    let user = require_judge(ctx, token)?;
    let token = token.ok_or(Error::Unauthorized)?;
    debug!(judge = user.id, "building ballot");

    let conn = &mut ctx.connect()?;
    let artist_candidates = load_candidates(conn, Category::Adult)?;
    let youth_candidates = load_candidates(conn, Category::Youth)?;

    Ok(BallotView {
        artist_submissions: order_for_judge(
            ctx,
            conn,
            token,
            user.id,
            Category::Adult,
            artist_candidates,
        )?,
        youth_submissions: order_for_judge(
            ctx,
            conn,
            token,
            user.id,
            Category::Youth,
            youth_candidates,
        )?,
    })
}

/// All current candidates for one category, one entry per submission. A
/// submission with several badge artworks is represented by its first one.
fn load_candidates(conn: &mut PgConnection, category: Category) -> Result<Vec<BallotEntry>, Error> {
    use schema::{artist_submissions, badge_artworks, badges, youth_artist_submissions};

    let rows: Vec<(i32, String, i32, String, String)> = match category {
        Category::Adult => badge_artworks::table
            .inner_join(badges::table)
            .inner_join(
                artist_submissions::table
                    .on(badge_artworks::submission_id.eq(artist_submissions::id.nullable())),
            )
            .order((artist_submissions::id.asc(), badge_artworks::id.asc()))
            .select((
                artist_submissions::id,
                artist_submissions::name,
                badges::id,
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
            .order((youth_artist_submissions::id.asc(), badge_artworks::id.asc()))
            .select((
                youth_artist_submissions::id,
                youth_artist_submissions::name,
                badges::id,
                badges::name,
                badge_artworks::artwork_file,
            ))
            .load(conn)?,
    };

    let mut entries: Vec<BallotEntry> = Vec::with_capacity(rows.len());
    for (submission_id, artist_name, badge_id, badge_name, artwork_file) in rows {
        if entries.iter().any(|e| e.submission_id == submission_id) {
            continue;
        }
        entries.push(BallotEntry {
            submission_id,
            artist_name,
            badge_id,
            badge_name,
            artwork_file,
        });
    }
    Ok(entries)
}

/// Saved ranking first, unranked candidates after. With no saved votes the
/// order comes from the session's cached shuffle instead.
fn order_for_judge(
    ctx: &Ctx,
    conn: &mut PgConnection,
    token: &str,
    judge_id: i32,
    category: Category,
    candidates: Vec<BallotEntry>,
) -> Result<Vec<BallotEntry>, Error> {
    let saved = saved_ranking(conn, judge_id, category)?;
    let candidate_ids: Vec<i32> = candidates.iter().map(|c| c.submission_id).collect();

    let order = if saved.is_empty() {
        ctx.sessions.shuffled_order(token, category, &candidate_ids)
    } else {
        judging::build_order(&candidate_ids, &saved)
    };

    let mut by_id: HashMap<i32, BallotEntry> = candidates
        .into_iter()
        .map(|entry| (entry.submission_id, entry))
        .collect();
    Ok(order.iter().filter_map(|id| by_id.remove(id)).collect())
}

/// The judge's persisted ranking for one category, best rank first.
fn saved_ranking(
    conn: &mut PgConnection,
    judge_id: i32,
    category: Category,
) -> Result<Vec<i32>, Error> {
    use schema::judge_votes;

    let votes: Vec<models::JudgeVote> = judge_votes::table
        .filter(judge_votes::judge_id.eq(judge_id))
        .order(judge_votes::rank.asc())
        .select(models::JudgeVote::as_select())
        .load(conn)?;
    Ok(votes
        .into_iter()
        .filter_map(|vote| category.submission_ref(vote.submission_id, vote.youth_submission_id))
        .collect())
}

/// Replace the judge's vote set for the submitted category, all or nothing.
/// The other category's votes are untouched, so adult and youth ballots can
/// be submitted in separate requests without clobbering each other.
fn submit_internal(token: Option<&str>, body: &SubmitRanking, ctx: &Ctx) -> Result<(), Error> {
    let user = require_judge(ctx, token)?;
    let votes = judging::assign_ranks(&body.ranked_ids)?;

    let conn = &mut ctx.connect()?;
    conn.transaction::<(), Error, _>(|conn| {
        use schema::{badge_artworks, judge_votes};

        match body.category {
            Category::Adult => {
                diesel::delete(
                    judge_votes::table.filter(
                        judge_votes::judge_id
                            .eq(user.id)
                            .and(judge_votes::submission_id.is_not_null()),
                    ),
                )
                .execute(conn)?;
            }
            Category::Youth => {
                diesel::delete(
                    judge_votes::table.filter(
                        judge_votes::judge_id
                            .eq(user.id)
                            .and(judge_votes::youth_submission_id.is_not_null()),
                    ),
                )
                .execute(conn)?;
            }
        }

        for vote in &votes {
            let artwork_id: i32 = match body.category {
                Category::Adult => badge_artworks::table
                    .filter(badge_artworks::submission_id.eq(vote.submission_id))
                    .order(badge_artworks::id.asc())
                    .select(badge_artworks::id)
                    .first::<i32>(conn)
                    .optional()?,
                Category::Youth => badge_artworks::table
                    .filter(badge_artworks::youth_submission_id.eq(vote.submission_id))
                    .order(badge_artworks::id.asc())
                    .select(badge_artworks::id)
                    .first::<i32>(conn)
                    .optional()?,
            }
            .ok_or(Error::InvalidCandidate(vote.submission_id))?;

            let (submission_id, youth_submission_id) =
                body.category.submission_columns(vote.submission_id);
            let row = models::NewJudgeVote {
                judge_id: user.id,
                submission_id,
                youth_submission_id,
                badge_artwork_id: artwork_id,
                rank: vote.rank,
            };
            diesel::insert_into(judge_votes::table)
                .values(&row)
                .execute(conn)?;
        }

        Ok(())
    })?;

    info!(
        judge = user.id,
        category = %body.category,
        count = body.ranked_ids.len(),
        "rankings replaced"
    );
    Ok(())
}
