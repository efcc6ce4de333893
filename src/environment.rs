use std::sync::Arc;

use log::Logger;
use time::OffsetDateTime;

use crate::db::Db;
use crate::urls::Urls;

/// Supplies the current time to handlers that compare against it.
pub type Clock = dyn Fn() -> OffsetDateTime + Send + Sync;

pub type SafeDb = dyn Db + Send + Sync;

/// Everything a handler needs, constructed once at startup and cloned
/// into each route.
#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub db: Arc<SafeDb>,
    pub urls: Arc<Urls>,
    pub clock: Arc<Clock>,
}

impl Environment {
    pub fn new(logger: Arc<Logger>, db: Arc<SafeDb>, urls: Arc<Urls>, clock: Arc<Clock>) -> Self {
        Self {
            logger,
            db,
            urls,
            clock,
        }
    }

    /// An environment reading the system clock.
    pub fn with_system_clock(logger: Arc<Logger>, db: Arc<SafeDb>, urls: Arc<Urls>) -> Self {
        Self::new(logger, db, urls, Arc::new(OffsetDateTime::now_utc))
    }

    pub fn now(&self) -> OffsetDateTime {
        (self.clock)()
    }
}
