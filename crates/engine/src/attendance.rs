//! Work attendance markings.
//!
//! A marking says the user worked a full or half day on a date. The date is
//! the natural key: at most one marking per day.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, dates::is_sunday};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceKind {
    FullDay,
    HalfDay,
}

impl AttendanceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullDay => "full_day",
            Self::HalfDay => "half_day",
        }
    }

    /// Work units the marking contributes to a salary estimate.
    pub fn weight(self) -> f64 {
        match self {
            Self::FullDay => 1.0,
            Self::HalfDay => 0.5,
        }
    }
}

impl TryFrom<&str> for AttendanceKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "full_day" => Ok(Self::FullDay),
            "half_day" => Ok(Self::HalfDay),
            other => Err(EngineError::InvalidField(format!(
                "invalid attendance type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceMarking {
    pub date: NaiveDate,
    pub kind: AttendanceKind,
}

impl AttendanceMarking {
    /// Sundays are not working days and cannot be marked.
    pub fn new(date: NaiveDate, kind: AttendanceKind) -> ResultEngine<Self> {
        if is_sunday(date) {
            return Err(EngineError::InvalidDate(format!(
                "{date} is a Sunday; attendance cannot be recorded"
            )));
        }
        Ok(Self { date, kind })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "work_attendance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub date: Date,
    pub attendance_type: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for AttendanceMarking {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            date: model.date,
            kind: AttendanceKind::try_from(model.attendance_type.as_str())?,
        })
    }
}

impl From<&AttendanceMarking> for ActiveModel {
    fn from(marking: &AttendanceMarking) -> Self {
        Self {
            date: ActiveValue::Set(marking.date),
            attendance_type: ActiveValue::Set(marking.kind.as_str().to_string()),
        }
    }
}
