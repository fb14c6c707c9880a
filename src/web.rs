pub mod admin_api;
pub mod auth_api;
pub mod ballot_api;
pub mod db;
pub mod result_api;
pub mod session;
pub mod submission_api;

use std::convert::Infallible;

use tracing::info;
use warp::Filter;

use crate::context::Ctx;
use crate::error::Error;
use session::CurrentUser;

pub(crate) fn require_judge(ctx: &Ctx, token: Option<&str>) -> Result<CurrentUser, Error> {
    ctx.sessions.current_user(token).ok_or(Error::Unauthorized)
}

pub(crate) fn require_admin(ctx: &Ctx, token: Option<&str>) -> Result<CurrentUser, Error> {
    let user = require_judge(ctx, token)?;
    if user.is_admin {
        Ok(user)
    } else {
        Err(Error::Forbidden)
    }
}

fn with_ctx(ctx: Ctx) -> impl Filter<Extract = (Ctx,), Error = Infallible> + Clone {
    warp::any().map(move || ctx.clone())
}

fn session_token() -> impl Filter<Extract = (Option<String>,), Error = Infallible> + Copy {
    warp::cookie::optional::<String>("session")
}

pub async fn setup(ctx: Ctx) {
    let login = warp::post()
        .and(warp::path!("api" / "login"))
        .and(warp::body::json())
        .and(with_ctx(ctx.clone()))
        .map(auth_api::login);

    let me = warp::get()
        .and(warp::path!("api" / "me"))
        .and(session_token())
        .and(with_ctx(ctx.clone()))
        .map(auth_api::me);

    let logout = warp::post()
        .and(warp::path!("api" / "logout"))
        .and(session_token())
        .and(with_ctx(ctx.clone()))
        .map(auth_api::logout);

    let get_ballot = warp::get()
        .and(warp::path!("api" / "ballot"))
        .and(session_token())
        .and(with_ctx(ctx.clone()))
        .map(ballot_api::get_ballot);

    let submit_ranking = warp::post()
        .and(warp::path!("api" / "ballot"))
        .and(session_token())
        .and(warp::body::json())
        .and(with_ctx(ctx.clone()))
        .map(ballot_api::submit_ranking);

    let get_results = warp::get()
        .and(warp::path!("api" / "results"))
        .and(session_token())
        .and(with_ctx(ctx.clone()))
        .map(result_api::get_results);

    let list_badges = warp::get()
        .and(warp::path!("api" / "badges"))
        .and(with_ctx(ctx.clone()))
        .map(submission_api::list_badges);

    let submission_status = warp::get()
        .and(warp::path!("api" / "status"))
        .and(with_ctx(ctx.clone()))
        .map(submission_api::submission_status);

    let validate_email = warp::post()
        .and(warp::path!("api" / "validate-email"))
        .and(warp::body::json())
        .and(with_ctx(ctx.clone()))
        .map(submission_api::validate_email);

    let create_submission = warp::post()
        .and(warp::path!("api" / "submissions"))
        .and(session_token())
        .and(warp::body::json())
        .and(with_ctx(ctx.clone()))
        .map(submission_api::create_artist_submission);

    let create_youth_submission = warp::post()
        .and(warp::path!("api" / "youth-submissions"))
        .and(session_token())
        .and(warp::body::json())
        .and(with_ctx(ctx.clone()))
        .map(submission_api::create_youth_submission);

    let artwork_detail = warp::get()
        .and(warp::path!("api" / "artwork-detail" / i32))
        .and(with_ctx(ctx.clone()))
        .map(submission_api::artwork_detail);

    let clear_votes = warp::post()
        .and(warp::path!("api" / "admin" / "clear-votes"))
        .and(session_token())
        .and(with_ctx(ctx.clone()))
        .map(admin_api::clear_votes);

    let delete_submission = warp::delete()
        .and(warp::path!("api" / "admin" / "submissions" / String / i32))
        .and(session_token())
        .and(with_ctx(ctx.clone()))
        .map(admin_api::delete_submission);

    let add_badge = warp::post()
        .and(warp::path!("api" / "admin" / "badges"))
        .and(session_token())
        .and(warp::body::json())
        .and(with_ctx(ctx.clone()))
        .map(admin_api::add_badge);

    let update_badge = warp::put()
        .and(warp::path!("api" / "admin" / "badges" / i32))
        .and(session_token())
        .and(warp::body::json())
        .and(with_ctx(ctx.clone()))
        .map(admin_api::update_badge);

    let delete_badge = warp::delete()
        .and(warp::path!("api" / "admin" / "badges" / i32))
        .and(session_token())
        .and(with_ctx(ctx.clone()))
        .map(admin_api::delete_badge);

    let list_judges = warp::get()
        .and(warp::path!("api" / "admin" / "judges"))
        .and(session_token())
        .and(with_ctx(ctx.clone()))
        .map(admin_api::list_judges);

    let add_judge = warp::post()
        .and(warp::path!("api" / "admin" / "judges"))
        .and(session_token())
        .and(warp::body::json())
        .and(with_ctx(ctx.clone()))
        .map(admin_api::add_judge);

    let remove_judge = warp::delete()
        .and(warp::path!("api" / "admin" / "judges" / i32))
        .and(session_token())
        .and(with_ctx(ctx.clone()))
        .map(admin_api::remove_judge);

    let set_period = warp::post()
        .and(warp::path!("api" / "admin" / "period"))
        .and(session_token())
        .and(warp::body::json())
        .and(with_ctx(ctx.clone()))
        .map(admin_api::set_period);

    let static_files = warp::path("static")
        .and(warp::fs::dir(ctx.upload_dir.clone()));

    let routes = login
        .or(me)
        .or(logout)
        .or(get_ballot)
        .or(submit_ranking)
        .or(get_results)
        .or(list_badges)
        .or(submission_status)
        .or(validate_email)
        .or(create_submission)
        .or(create_youth_submission)
        .or(artwork_detail)
        .or(clear_votes)
        .or(delete_submission)
        .or(add_badge)
        .or(update_badge)
        .or(delete_badge)
        .or(list_judges)
        .or(add_judge)
        .or(remove_judge)
        .or(set_period)
        .or(static_files);

    info!(addr = %ctx.bind_addr, "listening");
    warp::serve(routes).run(ctx.bind_addr).await;
}
