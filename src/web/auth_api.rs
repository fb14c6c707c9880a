use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use diesel::prelude::*;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;
use warp::reply::{self, Reply, Response};

use crate::context::Ctx;
use crate::error::{validation, Error};

use super::db::{models, schema};
use super::require_judge;
use super::session::CurrentUser;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

pub fn login(body: LoginRequest, ctx: Ctx) -> Response {
    match login_internal(&body, &ctx) {
        Ok(token) => {
            let cookie = format!("session={token}; Path=/; HttpOnly");
            reply::with_header(
                reply::json(&json!({ "success": true })),
                "set-cookie",
                cookie,
            )
            .into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub fn me(token: Option<String>, ctx: Ctx) -> Response {
    match require_judge(&ctx, token.as_deref()) {
        Ok(user) => reply::json(&json!({
            "id": user.id,
            "name": user.name,
            "is_admin": user.is_admin,
        }))
        .into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn logout(token: Option<String>, ctx: Ctx) -> Response {
    ctx.sessions.destroy(token.as_deref());
    let expired = "session=; Path=/; HttpOnly; Max-Age=0";
    reply::with_header(reply::json(&json!({ "success": true })), "set-cookie", expired)
        .into_response()
}

fn login_internal(body: &LoginRequest, ctx: &Ctx) -> Result<Uuid, Error> {
    use schema::judges;

    let conn = &mut ctx.connect()?;

    // no admin yet means a fresh install: the first login creates one
    let admin_count: i64 = judges::table
        .filter(judges::is_admin.eq(true))
        .count()
        .get_result(conn)?;
    if admin_count == 0 {
        let judge: models::Judge = diesel::insert_into(judges::table)
            .values(models::NewJudge {
                name: body.name.clone(),
                password_hash: hash_password(&body.password)?,
                is_admin: true,
            })
            .returning(models::Judge::as_returning())
            .get_result(conn)?;
        info!(judge = %judge.name, "created bootstrap admin");
        return Ok(ctx.sessions.create(CurrentUser {
            id: judge.id,
            name: judge.name,
            is_admin: true,
        }));
    }

    let judge: Option<models::Judge> = judges::table
        .filter(judges::name.eq(&body.name))
        .select(models::Judge::as_select())
        .first(conn)
        .optional()?;
    let Some(judge) = judge else {
        warn!(name = %body.name, "login attempt for unknown judge");
        return Err(Error::Unauthorized);
    };
    if !verify_password(&judge.password_hash, &body.password) {
        warn!(name = %body.name, "login attempt with wrong password");
        return Err(Error::Unauthorized);
    }

    info!(judge = judge.id, "judge logged in");
    Ok(ctx.sessions.create(CurrentUser {
        id: judge.id,
        name: judge.name,
        is_admin: judge.is_admin,
    }))
}

pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| validation("Could not process password."))
}

pub fn verify_password(stored_hash: &str, password: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|hash| {
            Argon2::default()
                .verify_password(password.as_bytes(), &hash)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trips() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password(&hash, "hunter2"));
        assert!(!verify_password(&hash, "hunter3"));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("not-a-phc-string", "anything"));
    }
}
