/// Events emitted while a workflow runs, for front ends that display progress.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    /// A table became available with the given shape.
    TableReady { rows: usize, columns: usize },
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Brackets `f` with `PhaseStart`/`PhaseFinish`. The finish event is sent
    /// only when `f` succeeds.
    pub fn phase<T, E>(
        &self,
        name: &'static str,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        self.report(Progress::PhaseStart { name });
        let value = f()?;
        self.report(Progress::PhaseFinish);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_ignores_events() {
        ProgressReporter::new().report(Progress::TableReady {
            rows: 0,
            columns: 0,
        });
    }

    #[test]
    fn phase_reports_start_and_finish() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|e| events.lock().unwrap().push(e)));

        let ok: Result<u8, ()> = reporter.phase("Fetch", || Ok(7));
        let failed: Result<u8, &str> = reporter.phase("Filter", || Err("boom"));
        drop(reporter);

        assert_eq!(ok, Ok(7));
        assert_eq!(failed, Err("boom"));
        assert_eq!(
            events.into_inner().unwrap(),
            vec![
                Progress::PhaseStart { name: "Fetch" },
                Progress::PhaseFinish,
                Progress::PhaseStart { name: "Filter" },
            ]
        );
    }
}
