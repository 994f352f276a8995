use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::OnConflict,
};
use tracing::error;
use uuid::Uuid;

use crate::{
    AttendanceMarking, EngineError, MonetaryRecord, NewRecord, RecordKind, RecordPatch,
    RecordStore, ResultEngine, attendance, is_sunday,
};

use super::{Engine, on_table, with_tx};

fn not_found(kind: RecordKind, id: Uuid) -> EngineError {
    EngineError::KeyNotFound(format!("{} {id}", kind.as_str()))
}

fn log_db<T>(result: ResultEngine<T>, op: &str) -> ResultEngine<T> {
    if let Err(EngineError::Database(err)) = &result {
        error!(op, error = %err, "store operation failed");
    }
    result
}

impl Engine {
    async fn insert_record(
        &self,
        kind: RecordKind,
        record: NewRecord,
    ) -> ResultEngine<MonetaryRecord> {
        let record = record.validate(kind)?;
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        on_table!(kind, table => {
            let model = table::ActiveModel {
                id: ActiveValue::Set(id),
                date: ActiveValue::Set(record.date),
                description: ActiveValue::Set(record.description),
                amount: ActiveValue::Set(record.amount.amount()),
                category: ActiveValue::Set(record.category.as_str().to_string()),
                created_at: ActiveValue::Set(created_at),
            };
            MonetaryRecord::try_from(model.insert(&self.database).await?)
        })
    }

    async fn update_record(
        &self,
        kind: RecordKind,
        id: Uuid,
        patch: RecordPatch,
    ) -> ResultEngine<()> {
        let patch = patch.validate(kind)?;

        with_tx!(self, |db_tx| {
            on_table!(kind, table => {
                let model = table::Entity::find_by_id(id.to_string())
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| not_found(kind, id))?;

                if !patch.is_empty() {
                    let mut active: table::ActiveModel = model.into();
                    if let Some(date) = patch.date {
                        active.date = ActiveValue::Set(date);
                    }
                    if let Some(description) = patch.description {
                        active.description = ActiveValue::Set(description);
                    }
                    if let Some(amount) = patch.amount {
                        active.amount = ActiveValue::Set(amount.amount());
                    }
                    if let Some(category) = patch.category {
                        active.category = ActiveValue::Set(category.as_str().to_string());
                    }
                    active.update(&db_tx).await?;
                }
                Ok(())
            })
        })
    }

    async fn delete_record(&self, kind: RecordKind, id: Uuid) -> ResultEngine<()> {
        let res = on_table!(kind, table => {
            table::Entity::delete_by_id(id.to_string())
                .exec(&self.database)
                .await?
        });
        if res.rows_affected == 0 {
            return Err(not_found(kind, id));
        }
        Ok(())
    }

    async fn records_in_range(
        &self,
        kind: RecordKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<Vec<MonetaryRecord>> {
        on_table!(kind, table => {
            table::Entity::find()
                .filter(table::Column::Date.between(start, end))
                .order_by_desc(table::Column::Date)
                .order_by_desc(table::Column::CreatedAt)
                .all(&self.database)
                .await?
                .into_iter()
                .map(MonetaryRecord::try_from)
                .collect()
        })
    }

    async fn records_on(
        &self,
        kind: RecordKind,
        date: NaiveDate,
    ) -> ResultEngine<Vec<MonetaryRecord>> {
        on_table!(kind, table => {
            table::Entity::find()
                .filter(table::Column::Date.eq(date))
                .order_by_desc(table::Column::CreatedAt)
                .all(&self.database)
                .await?
                .into_iter()
                .map(MonetaryRecord::try_from)
                .collect()
        })
    }

    async fn all_records(&self, kind: RecordKind) -> ResultEngine<Vec<MonetaryRecord>> {
        on_table!(kind, table => {
            table::Entity::find()
                .order_by_desc(table::Column::Date)
                .order_by_desc(table::Column::CreatedAt)
                .all(&self.database)
                .await?
                .into_iter()
                .map(MonetaryRecord::try_from)
                .collect()
        })
    }

    async fn write_attendance(&self, marking: AttendanceMarking) -> ResultEngine<()> {
        // Fields are public, so re-check what `AttendanceMarking::new` enforces.
        if is_sunday(marking.date) {
            return Err(EngineError::InvalidDate(format!(
                "{} is a Sunday; attendance cannot be recorded",
                marking.date
            )));
        }

        let model: attendance::ActiveModel = (&marking).into();
        attendance::Entity::insert(model)
            .on_conflict(
                OnConflict::column(attendance::Column::Date)
                    .update_column(attendance::Column::AttendanceType)
                    .to_owned(),
            )
            .exec_without_returning(&self.database)
            .await?;
        Ok(())
    }

    async fn remove_attendance(&self, date: NaiveDate) -> ResultEngine<()> {
        let res = attendance::Entity::delete_by_id(date)
            .exec(&self.database)
            .await?;
        if res.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(format!("attendance {date}")));
        }
        Ok(())
    }

    async fn read_attendance(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<Vec<AttendanceMarking>> {
        attendance::Entity::find()
            .filter(attendance::Column::Date.between(start, end))
            .order_by_asc(attendance::Column::Date)
            .all(&self.database)
            .await?
            .into_iter()
            .map(AttendanceMarking::try_from)
            .collect()
    }
}

// Every store operation goes through `log_db`, so database failures are
// logged in one place.
#[async_trait]
impl RecordStore for Engine {
    async fn insert(&self, kind: RecordKind, record: NewRecord) -> ResultEngine<MonetaryRecord> {
        log_db(self.insert_record(kind, record).await, "insert")
    }

    async fn update(&self, kind: RecordKind, id: Uuid, patch: RecordPatch) -> ResultEngine<()> {
        log_db(self.update_record(kind, id, patch).await, "update")
    }

    async fn delete(&self, kind: RecordKind, id: Uuid) -> ResultEngine<()> {
        log_db(self.delete_record(kind, id).await, "delete")
    }

    async fn query_by_date_range(
        &self,
        kind: RecordKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<Vec<MonetaryRecord>> {
        log_db(
            self.records_in_range(kind, start, end).await,
            "query_by_date_range",
        )
    }

    async fn query_by_date(
        &self,
        kind: RecordKind,
        date: NaiveDate,
    ) -> ResultEngine<Vec<MonetaryRecord>> {
        log_db(self.records_on(kind, date).await, "query_by_date")
    }

    async fn query_all(&self, kind: RecordKind) -> ResultEngine<Vec<MonetaryRecord>> {
        log_db(self.all_records(kind).await, "query_all")
    }

    async fn upsert_attendance(&self, marking: AttendanceMarking) -> ResultEngine<()> {
        log_db(self.write_attendance(marking).await, "upsert_attendance")
    }

    async fn delete_attendance(&self, date: NaiveDate) -> ResultEngine<()> {
        log_db(self.remove_attendance(date).await, "delete_attendance")
    }

    async fn attendance_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<Vec<AttendanceMarking>> {
        log_db(self.read_attendance(start, end).await, "attendance_between")
    }
}
