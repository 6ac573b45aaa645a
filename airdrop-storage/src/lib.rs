//! JSON files for allocation reports and the raw snapshots they were computed from.

use std::fs;
use std::path::{Path, PathBuf};

use airdrop_types::{AllocationReport, RawSnapshot};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error on {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, StorageError>;

pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `proposal_<id>_months_<month>_voters.json`, month taken from the snapshot time.
    pub fn report_path(&self, report: &AllocationReport) -> PathBuf {
        self.dir.join(format!(
            "proposal_{}_months_{}_voters.json",
            report.proposal_id,
            report.snapshot_month()
        ))
    }

    pub fn snapshot_path(&self, snapshot: &RawSnapshot) -> PathBuf {
        self.dir.join(format!(
            "proposal_{}_snapshot_{}.json",
            snapshot.proposal_id,
            snapshot.taken_at.format("%Y%m%dT%H%M%SZ")
        ))
    }

    pub fn save_report(&self, report: &AllocationReport) -> Result<PathBuf> {
        let path = self.report_path(report);
        self.write_json(&path, report)?;
        info!("Results saved to: {}", path.display());
        Ok(path)
    }

    pub fn save_snapshot(&self, snapshot: &RawSnapshot) -> Result<PathBuf> {
        let path = self.snapshot_path(snapshot);
        self.write_json(&path, snapshot)?;
        info!("Raw snapshot saved to: {}", path.display());
        Ok(path)
    }

    pub fn load_report(path: &Path) -> Result<AllocationReport> {
        read_json(path)
    }

    pub fn load_snapshot(path: &Path) -> Result<RawSnapshot> {
        read_json(path)
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let content = serde_json::to_string_pretty(value).map_err(|source| StorageError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, content).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use airdrop_types::{Account, AllocationEntry, GlobalStakeParameters, ProxyChainRecord};
    use chrono::{TimeZone, Utc};

    fn sample_report() -> AllocationReport {
        AllocationReport {
            snapshot_timestamp: Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap(),
            proposal_id: 90,
            total_voters: 1,
            total_proxied_accounts: 0,
            total_airdrop: 160_000_000,
            months: 8,
            airdrop_per_month: 20_000_000.0,
            proposal_total_stake: 500.0,
            airdrop_total_token_count: 20_000_000,
            conflicts: vec![],
            entries: vec![AllocationEntry {
                account: "alice".into(),
                stake_held: 500.0,
                stake_delegated_from: 0.0,
                total_counted_stake: 500.0,
                share_percent: 100.0,
                token_allocation: 20_000_000,
                is_eligible: true,
                proxy_target: None,
            }],
        }
    }

    #[test]
    fn test_report_file_name_uses_snapshot_month() {
        let store = ReportStore::new("/tmp/reports");
        assert_eq!(
            store.report_path(&sample_report()),
            PathBuf::from("/tmp/reports/proposal_90_months_3_voters.json")
        );
    }

    #[test]
    fn test_save_and_load_report() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportStore::new(dir.path().join("out"));

        let report = sample_report();
        let path = store.save_report(&report).unwrap();
        assert!(path.exists());
        assert_eq!(ReportStore::load_report(&path).unwrap(), report);
    }

    #[test]
    fn test_save_and_load_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportStore::new(dir.path());

        let snapshot = RawSnapshot {
            proposal_id: 90,
            taken_at: Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap(),
            params: GlobalStakeParameters::new(1000.0, 2000.0),
            voters: vec!["alice".into()],
            voter_accounts: vec![Account::new("alice", 1000.0)],
            proxy_chains: vec![ProxyChainRecord {
                voter: "alice".into(),
                account: "dave".into(),
                delegated_vests: 10.0,
            }],
            proxied_accounts: vec![Account::new("dave", 10.0).with_proxy("alice")],
        };
        let path = store.save_snapshot(&snapshot).unwrap();
        assert!(path.ends_with("proposal_90_snapshot_20250314T120000Z.json"));
        assert_eq!(ReportStore::load_snapshot(&path).unwrap(), snapshot);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReportStore::load_report(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }
}
