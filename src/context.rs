use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use diesel::{Connection, PgConnection};

use crate::error::Error;
use crate::web::session::SessionStore;

pub type Ctx = Arc<Context>;

/// Everything a request handler needs, passed explicitly instead of living in
/// module-level globals: the database, the session store, and the clock.
pub struct Context {
    db_url: String,
    pub bind_addr: SocketAddr,
    pub upload_dir: String,
    pub sessions: SessionStore,
    clock: fn() -> DateTime<Utc>,
}

impl Context {
    pub fn from_env() -> Context {
        let db_url = env::var("DATABASE_URL")
            .expect("Environment variable 'DATABASE_URL' must be set");
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| String::from("0.0.0.0:3000"))
            .parse()
            .expect("BIND_ADDR must be a host:port pair");
        let upload_dir =
            env::var("UPLOAD_DIR").unwrap_or_else(|_| String::from("static/submissions"));

        Context {
            db_url,
            bind_addr,
            upload_dir,
            sessions: SessionStore::default(),
            clock: Utc::now,
        }
    }

    pub fn connect(&self) -> Result<PgConnection, Error> {
        Ok(PgConnection::establish(&self.db_url)?)
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}
