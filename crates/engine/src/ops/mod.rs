use sea_orm::DatabaseConnection;

use crate::ResultEngine;

mod reports;
mod store;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

/// Run `$body` with `$table` bound to the entity module of `$kind`.
///
/// `expenses` and `incomes` have identical columns, so one body serves both.
macro_rules! on_table {
    ($kind:expr, $table:ident => $body:expr) => {
        match $kind {
            $crate::RecordKind::Expense => {
                use $crate::expenses as $table;
                $body
            }
            $crate::RecordKind::Income => {
                use $crate::incomes as $table;
                $body
            }
        }
    };
}

pub(crate) use on_table;
pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
