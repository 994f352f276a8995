//! Persistence port for records and attendance.
//!
//! [`crate::Engine`] implements it over sea-orm. Reports and the importer
//! only depend on the trait.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{AttendanceMarking, MonetaryRecord, NewRecord, RecordKind, RecordPatch, ResultEngine};

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Validates and stores `record`, assigning its id and creation time.
    async fn insert(&self, kind: RecordKind, record: NewRecord) -> ResultEngine<MonetaryRecord>;

    /// Applies the fields present in `patch`. Last write wins.
    async fn update(&self, kind: RecordKind, id: Uuid, patch: RecordPatch) -> ResultEngine<()>;

    async fn delete(&self, kind: RecordKind, id: Uuid) -> ResultEngine<()>;

    /// Records dated in `start..=end`, newest date first.
    async fn query_by_date_range(
        &self,
        kind: RecordKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<Vec<MonetaryRecord>>;

    /// Records of one day, most recently created first.
    async fn query_by_date(
        &self,
        kind: RecordKind,
        date: NaiveDate,
    ) -> ResultEngine<Vec<MonetaryRecord>>;

    /// Every record of `kind`, newest date first.
    async fn query_all(&self, kind: RecordKind) -> ResultEngine<Vec<MonetaryRecord>>;

    /// Inserts the marking or replaces the type of the one on the same date.
    async fn upsert_attendance(&self, marking: AttendanceMarking) -> ResultEngine<()>;

    async fn delete_attendance(&self, date: NaiveDate) -> ResultEngine<()>;

    /// Markings in `start..=end`, oldest first.
    async fn attendance_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<Vec<AttendanceMarking>>;
}
