//! Execution sessions.
//!
//! A [`Session`] is an explicit handle to a worker pool plus a catalog of
//! named temporary views. It is created from a [`SessionConfig`], passed to
//! the code that needs it, and releases its workers when it is stopped or
//! dropped. [`Session::scoped`] ties the lifetime to a closure so the pool is
//! released on every exit path.

pub mod config;
pub mod error;

pub use config::{DEFAULT_APP_NAME, Master, SessionConfig, SessionConfigBuilder};
pub use error::SessionError;

use crate::core::filters::{FilterError, StructureFilter};
use crate::dataset::AnnotationTable;
use crate::query::{CompiledFilter, Expr, Projection, QueryError, parse_predicate, parse_select};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

pub struct Session {
    config: SessionConfig,
    pool: ThreadPool,
    views: HashMap<String, AnnotationTable>,
    live_workers: Arc<AtomicUsize>,
}

impl Session {
    /// Starts a session with a dedicated worker pool sized by `config.master`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ThreadPool`] when the pool cannot be created.
    pub fn start(config: SessionConfig) -> Result<Self, SessionError> {
        let threads = config.master.worker_threads();
        let live_workers = Arc::new(AtomicUsize::new(0));
        let started = Arc::clone(&live_workers);
        let exited = Arc::clone(&live_workers);
        let app_name = config.app_name.clone();

        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(move |i| format!("{}-worker-{}", app_name, i))
            .start_handler(move |_| {
                started.fetch_add(1, Ordering::SeqCst);
            })
            .exit_handler(move |_| {
                exited.fetch_sub(1, Ordering::SeqCst);
            })
            .build()?;

        info!(
            "Session '{}' started on master {} with {} worker thread(s).",
            config.app_name, config.master, threads
        );
        Ok(Self {
            config,
            pool,
            views: HashMap::new(),
            live_workers,
        })
    }

    /// Runs `f` with a fresh session and releases it afterwards, whether `f`
    /// succeeds, fails or panics.
    pub fn scoped<T, E, F>(config: SessionConfig, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Session) -> Result<T, E>,
        E: From<SessionError>,
    {
        let mut session = Session::start(config)?;
        let result = f(&mut session);
        session.stop();
        result
    }

    /// Releases the worker pool and every registered view.
    pub fn stop(self) {
        drop(self);
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn app_name(&self) -> &str {
        &self.config.app_name
    }

    pub fn worker_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Number of pool threads currently running.
    pub fn live_workers(&self) -> usize {
        self.live_workers.load(Ordering::SeqCst)
    }

    /// Returns the rows of `table` for which `condition` is TRUE, in their original order.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Query`] when the condition names a column that
    /// is not in the table or is not a boolean condition.
    pub fn filter(
        &self,
        table: &AnnotationTable,
        condition: &Expr,
    ) -> Result<AnnotationTable, SessionError> {
        let compiled = CompiledFilter::compile(condition, table.schema())?;
        let rows = self.pool.install(|| {
            table
                .rows()
                .par_iter()
                .filter(|row| compiled.matches(row))
                .cloned()
                .collect::<Vec<_>>()
        });
        debug!(
            "Filter `{}` kept {} of {} rows.",
            condition,
            rows.len(),
            table.len()
        );
        Ok(AnnotationTable::from_parts_unchecked(
            table.schema().clone(),
            rows,
        ))
    }

    /// Like [`filter`](Self::filter), with the condition given as query text.
    pub fn filter_str(
        &self,
        table: &AnnotationTable,
        condition: &str,
    ) -> Result<AnnotationTable, SessionError> {
        let expr = parse_predicate(condition)?;
        self.filter(table, &expr)
    }

    /// Registers `table` under `name` for use in [`sql`](Self::sql), returning
    /// the table previously registered under that name.
    pub fn create_or_replace_temp_view(
        &mut self,
        name: &str,
        table: AnnotationTable,
    ) -> Option<AnnotationTable> {
        debug!("Registering temporary view '{}'.", name);
        self.views.insert(name.to_string(), table)
    }

    /// Removes a temporary view. Returns `true` when the view existed.
    pub fn drop_temp_view(&mut self, name: &str) -> bool {
        self.views.remove(name).is_some()
    }

    pub fn temp_view(&self, name: &str) -> Option<&AnnotationTable> {
        self.views.get(name)
    }

    pub fn view_names(&self) -> impl Iterator<Item = &str> {
        self.views.keys().map(String::as_str)
    }

    /// Runs a `SELECT` statement against the registered temporary views.
    ///
    /// The `WHERE` clause is applied before the projection, so it may refer
    /// to columns that are not selected.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownView`] when the `FROM` view is not
    /// registered and [`SessionError::Query`] for syntax errors or unknown
    /// columns.
    pub fn sql(&self, statement: &str) -> Result<AnnotationTable, SessionError> {
        let parsed = parse_select(statement)?;
        let view = self
            .views
            .get(&parsed.from)
            .ok_or_else(|| SessionError::UnknownView {
                name: parsed.from.clone(),
            })?;

        if let Projection::Columns(columns) = &parsed.projection {
            if let Some(missing) = columns.iter().find(|c| view.schema().index_of(c).is_none()) {
                return Err(QueryError::UnknownColumn {
                    name: missing.clone(),
                }
                .into());
            }
        }

        let filtered = match &parsed.predicate {
            Some(condition) => self.filter(view, condition)?,
            None => view.clone(),
        };
        let projected = match &parsed.projection {
            Projection::All => filtered,
            Projection::Columns(columns) => filtered.select(columns.as_slice())?,
        };
        Ok(match parsed.limit {
            Some(n) => projected.limit(n),
            None => projected,
        })
    }

    /// Applies `filter` to every entry on the session pool and returns the ids
    /// of the accepted structures in input order.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Filter`] for the first entry, in input order,
    /// whose structure is absent.
    pub fn filter_structures<S, F>(
        &self,
        entries: &[(String, Option<S>)],
        filter: &F,
    ) -> Result<Vec<String>, SessionError>
    where
        S: Sync,
        F: StructureFilter<S> + ?Sized,
    {
        let verdicts: Vec<Result<bool, FilterError>> = self.pool.install(|| {
            entries
                .par_iter()
                .map(|(id, structure)| filter.check(id, structure.as_ref()))
                .collect()
        });

        let mut accepted = Vec::new();
        for ((id, _), verdict) in entries.iter().zip(verdicts) {
            if verdict? {
                accepted.push(id.clone());
            }
        }
        Ok(accepted)
    }

    #[cfg(test)]
    pub(crate) fn live_worker_gauge(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.live_workers)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        info!(
            "Session '{}' stopped; releasing {} worker thread(s) and {} view(s).",
            self.config.app_name,
            self.pool.current_num_threads(),
            self.views.len()
        );
    }
}
