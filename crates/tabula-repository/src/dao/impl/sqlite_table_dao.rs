//! SQLite implementation of [`TableDao`].

use crate::dao::table_dao::{TableDao, SOFT_DELETE_COLUMN};
use crate::executor::{retry_policy_from_config, TransactionalExecutor};
use crate::pool::DatabasePoolInterface;
use crate::query::{
    apply_paging, build_filter, build_order, DeleteStatement, Fields, Filter, InsertStatement, OrderBy,
    SelectStatement, Statement, UpdateStatement,
};
use crate::schema::{Table, TableSchema};
use crate::sqlite::exec;
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;
use tabula_config::RetryConfig;
use tabula_core::{Paging, Row, TabulaError, TabulaResult, Value};
use tabula_resilience::retry::RetryPolicy;
use tracing::{debug, info};

/// Shorthand for the SQLite-backed DAO of `T`.
pub type Dao<T> = SqliteTableDao<T>;

/// SQLite-backed DAO for the table described by `T`.
pub struct SqliteTableDao<T: Table> {
    schema: Arc<TableSchema>,
    executor: TransactionalExecutor,
    _table: PhantomData<fn() -> T>,
}

impl<T: Table> SqliteTableDao<T> {
    /// Creates a DAO with the default retry policy.
    ///
    /// Validates the schema and creates the table if it does not exist.
    pub async fn new(pool: Arc<dyn DatabasePoolInterface>) -> TabulaResult<Self> {
        Self::with_executor(TransactionalExecutor::new(pool)).await
    }

    /// Creates a DAO retrying under `policy`.
    pub async fn with_retry_policy(pool: Arc<dyn DatabasePoolInterface>, policy: RetryPolicy) -> TabulaResult<Self> {
        Self::with_executor(TransactionalExecutor::with_policy(pool, policy)).await
    }

    /// Creates a DAO retrying per the `retry` configuration section.
    pub async fn from_config(pool: Arc<dyn DatabasePoolInterface>, retry: &RetryConfig) -> TabulaResult<Self> {
        Self::with_retry_policy(pool, retry_policy_from_config(retry)).await
    }

    pub async fn with_executor(executor: TransactionalExecutor) -> TabulaResult<Self> {
        let schema = T::schema();
        schema.validate()?;
        let schema = Arc::new(schema);

        let ddl_schema = Arc::clone(&schema);
        executor
            .run("create_table", move |conn| {
                Box::pin(exec::create_table(conn, Arc::clone(&ddl_schema)))
            })
            .await?;
        info!(table = schema.name(), "Table ready");

        Ok(Self {
            schema,
            executor,
            _table: PhantomData,
        })
    }

    /// Base select over `columns`, or the default projection when none of
    /// them is known.
    #[must_use]
    pub fn select_statement(&self, columns: &[&str]) -> SelectStatement {
        let mut projection: Vec<String> = columns
            .iter()
            .filter(|c| self.schema.has_column(c))
            .map(|c| (*c).to_string())
            .collect();
        if projection.is_empty() {
            projection = self.schema.projection();
        }
        SelectStatement::new(self.schema.name(), projection)
    }

    /// Base update assigning the known, non-null `fields`.
    #[must_use]
    pub fn update_statement(&self, fields: Fields) -> UpdateStatement {
        UpdateStatement::new(self.schema.name(), fields.assignable(&self.schema))
    }

    #[must_use]
    pub fn delete_statement(&self) -> DeleteStatement {
        DeleteStatement::new(self.schema.name())
    }

    #[must_use]
    pub fn executor(&self) -> &TransactionalExecutor {
        &self.executor
    }

    async fn run_update(&self, statement: UpdateStatement) -> TabulaResult<u64> {
        self.executor
            .run("update", move |conn| Box::pin(exec::update(conn, statement.clone())))
            .await
    }

    fn check_statement(&self, statement: &Statement) -> TabulaResult<()> {
        if statement.table() != self.schema.name() {
            return Err(TabulaError::validation(format!(
                "Statement targets '{}' but this DAO serves '{}'",
                statement.table(),
                self.schema.name()
            )));
        }
        if let Some(unknown) = statement
            .referenced_columns()
            .into_iter()
            .find(|c| !self.schema.has_column(c))
        {
            return Err(TabulaError::validation(format!(
                "Unknown column '{}' in table '{}'",
                unknown,
                self.schema.name()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Table> TableDao for SqliteTableDao<T> {
    fn schema(&self) -> &TableSchema {
        &self.schema
    }

    async fn insert(&self, fields: Fields) -> TabulaResult<()> {
        let statement = InsertStatement::new(self.schema.name(), fields.insertable(&self.schema));
        self.executor
            .run("insert", move |conn| Box::pin(exec::insert(conn, statement.clone())))
            .await?;
        Ok(())
    }

    async fn update(&self, fields: Fields, filter: &Filter) -> TabulaResult<u64> {
        let statement = self.update_statement(fields);
        if statement.assignments().is_empty() {
            debug!(table = self.schema.name(), "Update has no assignable fields");
            return Ok(0);
        }
        self.run_update(build_filter(statement, filter, &self.schema)).await
    }

    async fn delete(&self, filter: &Filter, soft: bool) -> TabulaResult<u64> {
        if soft {
            if !self.schema.has_column(SOFT_DELETE_COLUMN) {
                return Err(TabulaError::schema(format!(
                    "Table '{}' has no '{}' column for soft delete",
                    self.schema.name(),
                    SOFT_DELETE_COLUMN
                )));
            }
            let statement = self.update_statement(Fields::new().with(SOFT_DELETE_COLUMN, Value::Boolean(true)));
            return self.run_update(build_filter(statement, filter, &self.schema)).await;
        }

        let statement = build_filter(self.delete_statement(), filter, &self.schema);
        self.executor
            .run("delete", move |conn| Box::pin(exec::delete(conn, statement.clone())))
            .await
    }

    async fn count(&self, filter: &Filter) -> TabulaResult<u64> {
        let statement = build_filter(self.select_statement(&[]), filter, &self.schema);
        self.executor
            .run("count", move |conn| Box::pin(exec::count(conn, statement.clone())))
            .await
    }

    async fn select(
        &self,
        columns: &[&str],
        filter: &Filter,
        order_by: Option<&OrderBy>,
        paging: Option<Paging>,
    ) -> TabulaResult<Vec<Row>> {
        let mut statement = build_filter(self.select_statement(columns), filter, &self.schema);
        if let Some(paging) = paging {
            statement = apply_paging(statement, paging.page, paging.page_size);
        }
        if let Some(order_by) = order_by {
            statement = build_order(statement, order_by, &self.schema);
        }

        let schema = Arc::clone(&self.schema);
        self.executor
            .run("select", move |conn| {
                Box::pin(exec::select(conn, statement.clone(), Arc::clone(&schema)))
            })
            .await
    }

    async fn execute(&self, statement: Statement) -> TabulaResult<Option<Vec<Row>>> {
        self.check_statement(&statement)?;
        let schema = Arc::clone(&self.schema);
        self.executor
            .run("execute", move |conn| {
                Box::pin(exec::execute(conn, statement.clone(), Arc::clone(&schema)))
            })
            .await
    }
}

impl<T: Table> std::fmt::Debug for SqliteTableDao<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteTableDao")
            .field("table", &self.schema.name())
            .field("executor", &self.executor)
            .finish()
    }
}
