use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;

use crate::record::{self, MediaRecord};
use crate::source::{DatasetSource, FetchError};

pub const DEFAULT_MIN_LOADING: Duration = Duration::from_millis(1800);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct Sequencer {
    issued: u64,
}

impl Sequencer {
    pub fn issue(&mut self) -> RequestToken {
        self.issued += 1;
        RequestToken(self.issued)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.issued
    }
}

#[derive(Debug)]
pub struct Completion {
    pub token: RequestToken,
    pub outcome: Result<Vec<MediaRecord>, FetchError>,
    pub elapsed: Duration,
}

pub struct Orchestrator {
    source: Arc<dyn DatasetSource>,
    min_loading: Duration,
    supplemental: MediaRecord,
}

impl Orchestrator {
    pub fn new(source: Arc<dyn DatasetSource>, min_loading: Duration) -> Self {
        Self {
            source,
            min_loading,
            supplemental: record::supplemental(),
        }
    }

    /// Fetches, merges the supplemental entry and holds until at least
    /// `min_loading` has passed since `started`. Failures return at once.
    pub fn load(&self, started: Instant) -> Result<Vec<MediaRecord>, FetchError> {
        let fetched = self.source.fetch()?;
        let merged = merge_supplemental(fetched, &self.supplemental);
        hold_minimum(started, self.min_loading);
        Ok(merged)
    }

    pub fn spawn(
        self: &Arc<Self>,
        token: RequestToken,
        started: Instant,
        tx: Sender<Completion>,
    ) -> thread::JoinHandle<()> {
        let orchestrator = Arc::clone(self);
        thread::spawn(move || {
            tracing::info!(token = token.value(), "fetching dataset");
            let outcome = orchestrator.load(started);
            let completion = Completion {
                token,
                outcome,
                elapsed: started.elapsed(),
            };
            if tx.send(completion).is_err() {
                tracing::debug!(token = token.value(), "fetch finished after host shut down");
            }
        })
    }
}

pub fn merge_supplemental(mut records: Vec<MediaRecord>, extra: &MediaRecord) -> Vec<MediaRecord> {
    let present = records.iter().any(|record| {
        let same_url = extra.url.is_some() && record.url == extra.url;
        let same_title = extra.title.is_some() && record.title == extra.title;
        same_url || same_title
    });
    if !present {
        records.insert(0, extra.clone());
    }
    records
}

fn hold_minimum(started: Instant, minimum: Duration) {
    let elapsed = started.elapsed();
    if elapsed < minimum {
        thread::sleep(minimum - elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    struct SlowSource {
        delay: Duration,
        result: fn() -> Result<Vec<MediaRecord>, FetchError>,
    }

    impl DatasetSource for SlowSource {
        fn fetch(&self) -> Result<Vec<MediaRecord>, FetchError> {
            thread::sleep(self.delay);
            (self.result)()
        }
    }

    fn one_record() -> Result<Vec<MediaRecord>, FetchError> {
        Ok(vec![MediaRecord {
            title: Some("Fetched".into()),
            url: Some("https://apod.test/fetched.jpg".into()),
            ..MediaRecord::default()
        }])
    }

    fn failing() -> Result<Vec<MediaRecord>, FetchError> {
        Err(FetchError::Status(503))
    }

    fn orchestrator(delay_ms: u64, min_ms: u64) -> Orchestrator {
        Orchestrator::new(
            Arc::new(SlowSource {
                delay: Duration::from_millis(delay_ms),
                result: one_record,
            }),
            Duration::from_millis(min_ms),
        )
    }

    #[test]
    fn fast_fetch_waits_for_minimum() {
        let started = Instant::now();
        let records = orchestrator(20, 300).load(started).unwrap();
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn slow_fetch_adds_no_delay() {
        let started = Instant::now();
        orchestrator(300, 50).load(started).unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(300));
        assert!(elapsed < Duration::from_millis(600), "took {elapsed:?}");
    }

    #[test]
    fn failures_skip_the_minimum() {
        let orchestrator = Orchestrator::new(
            Arc::new(SlowSource {
                delay: Duration::ZERO,
                result: failing,
            }),
            Duration::from_secs(5),
        );
        let started = Instant::now();
        assert!(matches!(orchestrator.load(started), Err(FetchError::Status(503))));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn supplemental_is_prepended_once() {
        let extra = record::supplemental();
        let merged = merge_supplemental(one_record().unwrap(), &extra);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], extra);

        let duplicate = MediaRecord {
            title: Some("Renamed".into()),
            url: extra.url.clone(),
            ..MediaRecord::default()
        };
        let merged = merge_supplemental(vec![duplicate], &extra);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.iter().filter(|r| r.url == extra.url).count(), 1);
    }

    #[test]
    fn supplemental_matched_by_title() {
        let extra = record::supplemental();
        let same_title = MediaRecord {
            title: extra.title.clone(),
            url: Some("https://elsewhere.test/earthrise.jpg".into()),
            ..MediaRecord::default()
        };
        assert_eq!(merge_supplemental(vec![same_title], &extra).len(), 1);
    }

    #[test]
    fn sequencer_tracks_latest_token() {
        let mut sequencer = Sequencer::default();
        let first = sequencer.issue();
        let second = sequencer.issue();
        assert!(second > first);
        assert!(!sequencer.is_current(first));
        assert!(sequencer.is_current(second));
    }

    #[test]
    fn spawn_reports_completion() {
        let orchestrator = Arc::new(orchestrator(0, 0));
        let (tx, rx) = unbounded();
        let mut sequencer = Sequencer::default();
        let token = sequencer.issue();
        orchestrator.spawn(token, Instant::now(), tx).join().unwrap();
        let completion = rx.recv().unwrap();
        assert_eq!(completion.token, token);
        assert_eq!(completion.outcome.unwrap().len(), 2);
    }
}
