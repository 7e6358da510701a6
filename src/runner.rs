/// Batch extraction runner.
///
/// Executes the jobs of an `ExtractionConfig` on a single background
/// worker: the foreground thread stays free to report progress while the
/// worker opens each output file, extracts the requested series, and
/// evaluates the statistics. Jobs run sequentially on the worker, so no
/// two jobs ever touch shared series data.
///
/// Failure policy matches the rest of the pipeline: an unreadable file or
/// entity list becomes per-row error outcomes, a missing entity or metric
/// becomes per-row not-available outcomes, and the batch always continues
/// to the next job.

use std::path::Path;
use std::sync::mpsc;
use threadpool::ThreadPool;

use crate::analysis::extrema;
use crate::config::{ExtractionConfig, JobConfig};
use crate::ingest::entity_list;
use crate::ingest::swmm_out::OutFile;
use crate::model::{ElementKind, MetricRequest, Outcome, ResultRow};

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

pub struct Runner {
    config: ExtractionConfig,
}

impl Runner {
    pub fn new(config: ExtractionConfig) -> Self {
        Runner { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Runs every job on the background worker and collects the results
    /// table, printing a progress line as each job finishes.
    pub fn run(&self) -> Vec<ResultRow> {
        let pool = ThreadPool::new(1);
        let (tx, rx) = mpsc::channel();

        for (index, job) in self.config.jobs.iter().cloned().enumerate() {
            let tx = tx.clone();
            pool.execute(move || {
                let rows = process_job(&job);
                // A closed receiver means the foreground is gone; nothing
                // left to deliver to.
                let _ = tx.send((index, job.file.clone(), rows));
            });
        }
        drop(tx);

        let mut batches: Vec<(usize, Vec<ResultRow>)> = Vec::new();
        for (index, file, rows) in rx {
            let errors = rows
                .iter()
                .filter(|r| matches!(r.outcome, Outcome::Error(_)))
                .count();
            if errors > 0 {
                println!(
                    "   ⚠ job {} ({}): {} rows, {} with errors",
                    index + 1,
                    file,
                    rows.len(),
                    errors
                );
            } else {
                println!("   ✓ job {} ({}): {} rows", index + 1, file, rows.len());
            }
            batches.push((index, rows));
        }

        batches.sort_by_key(|(index, _)| *index);
        batches.into_iter().flat_map(|(_, rows)| rows).collect()
    }
}

// ---------------------------------------------------------------------------
// Job processing
// ---------------------------------------------------------------------------

/// Processes one job: resolve entities, open the output file, extract and
/// evaluate. Never fails — failures become row outcomes.
pub fn process_job(job: &JobConfig) -> Vec<ResultRow> {
    // Requests were validated at config load; a stray invalid one becomes
    // an error row rather than a panic.
    let mut requests: Vec<MetricRequest> = Vec::new();
    for request in &job.requests {
        match request.to_request() {
            Ok(r) => requests.push(r),
            Err(msg) => {
                return vec![error_row(job, "*", &msg)];
            }
        }
    }

    let entities = match resolve_entities(job) {
        Ok(entities) => entities,
        Err(msg) => return vec![error_row(job, "*", &msg)],
    };

    let out = match OutFile::open(Path::new(&job.file)) {
        Ok(out) => out,
        Err(msg) => {
            // Unreadable file: mark every requested cell so the results
            // table still accounts for the whole job.
            return entities
                .iter()
                .flat_map(|entity| {
                    let msg = msg.clone();
                    requests.iter().map(move |request| ResultRow {
                        entity: entity.clone(),
                        source_file: job.file.clone(),
                        metric: metric_label(job, *request),
                        outcome: Outcome::Error(msg.clone()),
                    })
                })
                .collect();
        }
    };

    let mut rows = Vec::with_capacity(entities.len() * requests.len());
    for entity in &entities {
        let values = out
            .get_series(job.element_type, entity, &job.metric)
            .map(|series| series.values());

        for request in &requests {
            let outcome = match &values {
                Some(values) => extrema::evaluate(values, *request),
                // Entity or metric unknown to this file.
                None => Outcome::NotAvailable,
            };
            rows.push(ResultRow {
                entity: entity.clone(),
                source_file: job.file.clone(),
                metric: metric_label(job, *request),
                outcome,
            });
        }
    }

    rows
}

/// Entity names for a job: inline list, entity-list file, or the implicit
/// single "system" pseudo-entity for system-wide metrics.
fn resolve_entities(job: &JobConfig) -> Result<Vec<String>, String> {
    let mut entities = job.entities.clone();

    if let Some(list) = &job.entity_list {
        let loaded =
            entity_list::load_entity_names(Path::new(list), job.entity_column.as_deref())?;
        entities.extend(loaded);
    }

    if entities.is_empty() {
        if job.element_type == ElementKind::System {
            entities.push("system".to_string());
        } else {
            return Err("no entities to extract".to_string());
        }
    }

    Ok(entities)
}

fn metric_label(job: &JobConfig, request: MetricRequest) -> String {
    format!("{} {}", job.metric, request.label())
}

fn error_row(job: &JobConfig, entity: &str, msg: &str) -> ResultRow {
    ResultRow {
        entity: entity.to_string(),
        source_file: job.file.clone(),
        metric: job.metric.clone(),
        outcome: Outcome::Error(msg.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
