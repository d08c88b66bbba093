//! Periodic background position log.
//!
//! While an entry is open, the original portal sampled the device position
//! immediately and then on a fixed interval, stopping the moment the
//! session left the clocked-in state. The same contract holds here: the
//! loop samples first, then waits out the interval, and re-checks the
//! entry's status before every sample so a clock-out from another process
//! (or a stop signal) ends the loop instead of leaking a timer that keeps
//! sampling a closed session.
//!
//! A failed sample is reported and skipped; there is no client-side retry.

use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{entry_status, insert_gps_sample, load_project_by_id};
use crate::errors::{AppError, AppResult};
use crate::geo::provider::{GeoRequest, LocationProvider};
use crate::models::entry::EntryStatus;
use crate::models::verdict::ComplianceVerdict;
use crate::ui::messages::{info, warning};
use chrono::Local;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::time::Duration;

/// Sends the stop signal to a running tracker loop.
pub struct StopHandle(Sender<()>);

impl StopHandle {
    pub fn stop(&self) {
        let _ = self.0.send(());
    }
}

/// A paired stop handle and receiver for `TrackerLogic::run`.
pub fn stop_channel() -> (StopHandle, Receiver<()>) {
    let (tx, rx) = channel();
    (StopHandle(tx), rx)
}

pub struct TrackerLogic;

impl TrackerLogic {
    /// Take one sample for an open entry and record it.
    pub fn sample(
        pool: &mut DbPool,
        cfg: &Config,
        provider: &dyn LocationProvider,
        entry_id: i64,
    ) -> AppResult<ComplianceVerdict> {
        let fix = provider.current_position(&GeoRequest::default())?;

        let project_id: i64 = pool.conn.query_row(
            "SELECT project_id FROM entries WHERE id = ?1",
            [entry_id],
            |row| row.get(0),
        )?;
        let project = load_project_by_id(&pool.conn, project_id)?;

        let (distance_m, verdict) = project.check_position(&fix, cfg.default_radius_m);

        insert_gps_sample(&pool.conn, entry_id, Local::now(), &fix, distance_m, verdict)?;

        Ok(verdict)
    }

    /// Sample immediately, then on every interval tick, until the stop
    /// signal arrives or the entry is no longer open. Returns the number of
    /// samples recorded.
    pub fn run(
        pool: &mut DbPool,
        cfg: &Config,
        provider: &dyn LocationProvider,
        entry_id: i64,
        interval: Duration,
        stop: &Receiver<()>,
    ) -> AppResult<usize> {
        let mut recorded = 0usize;

        loop {
            // The interval must not keep firing once the session is closed.
            match entry_status(&pool.conn, entry_id)? {
                Some(EntryStatus::Open) => {}
                Some(EntryStatus::Closed) => {
                    info("Session closed; position logging stopped.");
                    break;
                }
                None => {
                    return Err(AppError::EntryClosed(entry_id));
                }
            }

            match Self::sample(pool, cfg, provider, entry_id) {
                Ok(verdict) => {
                    recorded += 1;
                    info(format!(
                        "Position logged ({}) at {}.",
                        verdict.to_db_str(),
                        Local::now().format("%H:%M:%S")
                    ));
                }
                // No retry: report and wait for the next tick.
                Err(e) => warning(format!("Position sample failed: {}", e)),
            }

            match stop.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    info("Position logging stopped.");
                    break;
                }
            }
        }

        if recorded > 0 {
            ttlog(
                &pool.conn,
                "track",
                &format!("entry #{}", entry_id),
                &format!("Recorded {} position sample(s)", recorded),
            )?;
        }

        Ok(recorded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use crate::db::queries::{gps_sample_count, insert_entry, insert_project};
    use crate::geo::provider::GeoError;
    use crate::models::coordinate::Coordinate;
    use std::cell::Cell;
    use std::sync::mpsc::channel;

    fn test_pool(name: &str) -> (DbPool, String) {
        let mut path = std::env::temp_dir();
        path.push(format!("{}_geoclock_tracker.sqlite", name));
        let p = path.to_string_lossy().to_string();
        std::fs::remove_file(&p).ok();

        let pool = DbPool::new(&p).expect("open db");
        init_db(&pool.conn).expect("init db");
        (pool, p)
    }

    fn test_cfg(db: &str) -> Config {
        Config {
            database: db.to_string(),
            ..Config::default()
        }
    }

    fn seed_open_entry(pool: &DbPool) -> i64 {
        let site = Coordinate::new(52.0907, 5.1214).unwrap();
        let project_id = insert_project(
            &pool.conn,
            "Kade West",
            "The Global",
            "",
            Some(site),
            Some(100.0),
        )
        .unwrap();
        insert_entry(
            &pool.conn,
            project_id,
            "",
            Local::now(),
            &site,
            Some(0.0),
            ComplianceVerdict::WithinRadius,
        )
        .unwrap()
    }

    struct FixedFix;
    impl LocationProvider for FixedFix {
        fn current_position(&self, _req: &GeoRequest) -> Result<Coordinate, GeoError> {
            Ok(Coordinate::new(52.0907, 5.1214).unwrap())
        }
    }

    /// Closes the tracked entry after N fixes, through its own connection.
    struct ClosingProvider {
        db_path: String,
        entry_id: i64,
        fixes_before_close: Cell<usize>,
    }

    impl LocationProvider for ClosingProvider {
        fn current_position(&self, _req: &GeoRequest) -> Result<Coordinate, GeoError> {
            let remaining = self.fixes_before_close.get();
            if remaining <= 1 {
                let conn = rusqlite::Connection::open(&self.db_path).expect("open db");
                conn.execute(
                    "UPDATE entries SET status = 'closed', total_minutes = 0 WHERE id = ?1",
                    [self.entry_id],
                )
                .expect("close entry");
            }
            self.fixes_before_close.set(remaining.saturating_sub(1));
            Ok(Coordinate::new(52.0907, 5.1214).unwrap())
        }
    }

    #[test]
    fn stop_signal_ends_the_loop_after_first_sample() {
        let (mut pool, db) = test_pool("stop_signal");
        let cfg = test_cfg(&db);
        let entry_id = seed_open_entry(&pool);

        let (tx, rx) = channel();
        tx.send(()).unwrap(); // stop already queued: one sample, then exit

        let recorded = TrackerLogic::run(
            &mut pool,
            &cfg,
            &FixedFix,
            entry_id,
            Duration::from_millis(5),
            &rx,
        )
        .unwrap();

        assert_eq!(recorded, 1);
        assert_eq!(gps_sample_count(&pool.conn, entry_id).unwrap(), 1);
    }

    #[test]
    fn closing_the_entry_cancels_the_interval() {
        let (mut pool, db) = test_pool("entry_close");
        let cfg = test_cfg(&db);
        let entry_id = seed_open_entry(&pool);

        let provider = ClosingProvider {
            db_path: db.clone(),
            entry_id,
            fixes_before_close: Cell::new(2),
        };

        let (_tx, rx) = channel::<()>();
        let recorded = TrackerLogic::run(
            &mut pool,
            &cfg,
            &provider,
            entry_id,
            Duration::from_millis(5),
            &rx,
        )
        .unwrap();

        // Two samples land; the status re-check then sees the closed entry
        // and stops. No further samples, no matter how much time elapses.
        assert_eq!(recorded, 2);
        assert_eq!(gps_sample_count(&pool.conn, entry_id).unwrap(), 2);
    }

    #[test]
    fn failed_samples_are_skipped_without_retry() {
        struct FailingFix;
        impl LocationProvider for FailingFix {
            fn current_position(&self, _req: &GeoRequest) -> Result<Coordinate, GeoError> {
                Err(GeoError::PositionUnavailable("no fix".into()))
            }
        }

        let (mut pool, db) = test_pool("failed_sample");
        let cfg = test_cfg(&db);
        let entry_id = seed_open_entry(&pool);

        let (tx, rx) = channel();
        tx.send(()).unwrap();

        let recorded = TrackerLogic::run(
            &mut pool,
            &cfg,
            &FailingFix,
            entry_id,
            Duration::from_millis(5),
            &rx,
        )
        .unwrap();

        assert_eq!(recorded, 0);
        assert_eq!(gps_sample_count(&pool.conn, entry_id).unwrap(), 0);
    }

    #[test]
    fn sample_records_distance_and_verdict() {
        let (mut pool, db) = test_pool("sample_verdict");
        let cfg = test_cfg(&db);
        let entry_id = seed_open_entry(&pool);

        let verdict = TrackerLogic::sample(&mut pool, &cfg, &FixedFix, entry_id).unwrap();
        assert!(verdict.is_within());
        assert_eq!(gps_sample_count(&pool.conn, entry_id).unwrap(), 1);
    }
}
