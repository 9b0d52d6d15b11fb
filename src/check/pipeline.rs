//! Ordered, fail-fast verification of a finished import.

use tracing::{info, warn};

use super::catalog;
use super::hint::{self, Hint};
use super::mode::InstallationMode;
use super::prober::SchemaProber;
use super::report::Reporter;

pub const CANARY_SQL: &str = "SELECT make_standard_name('a')";
pub const CANARY_EXPECTED: &str = "a";
pub const BACKLOG_SQL: &str = "SELECT count(*) FROM placex WHERE indexed_status > 0";
pub const INVALID_INDICES_SQL: &str = "SELECT relname::text \
     FROM pg_class, pg_index \
     WHERE pg_index.indisvalid = false \
       AND pg_index.indexrelid = pg_class.oid";

pub const PLACE_TABLE: &str = "place";
pub const TIGER_TABLE: &str = "location_property_tiger";
pub const INDEX_SECTION: &str = "Search index creation";

#[derive(Debug, Clone, Copy, Default)]
pub struct CheckOptions {
    /// US TIGER address data is expected to be present.
    pub use_tiger_data: bool,
}

/// When a check runs, relative to the detected installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applicability {
    Always,
    /// Forward-search only. No check in the plan carries it today: the search
    /// indices are gated through `catalog::expected_indices` instead.
    UnlessReverseOnly,
    UnlessNoUpdate,
    RegionalExtension,
}

impl Applicability {
    pub fn applies(self, mode: InstallationMode, options: CheckOptions) -> bool {
        match self {
            Applicability::Always => true,
            Applicability::UnlessReverseOnly => !mode.reverse_only,
            Applicability::UnlessNoUpdate => !mode.no_update,
            Applicability::RegionalExtension => options.use_tiger_data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    Connection,
    Module,
    PlaceTable,
    IndexingStatus,
    Index(&'static str),
    ValidIndices,
    TigerTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Connectivity,
    SchemaAbsence,
    DataIncomplete,
    QueryExecution,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub hint: Hint,
    /// Underlying probe error or unexpected value, for the log only.
    pub cause: Option<String>,
}

impl Failure {
    fn new(kind: FailureKind, hint: Hint) -> Self {
        Self {
            kind,
            hint,
            cause: None,
        }
    }

    fn caused_by(mut self, cause: impl ToString) -> Self {
        self.cause = Some(cause.to_string());
        self
    }
}

impl Check {
    pub fn label(&self) -> String {
        match self {
            Check::Connection => "database got created".into(),
            Check::Module => "nominatim.so module installed".into(),
            Check::PlaceTable => "place table".into(),
            Check::IndexingStatus => "indexing status".into(),
            Check::Index(name) => format!("index {name}"),
            Check::ValidIndices => "search indices are valid".into(),
            Check::TigerTable => "TIGER table exists".into(),
        }
    }

    pub fn applicability(&self) -> Applicability {
        match self {
            Check::PlaceTable => Applicability::UnlessNoUpdate,
            Check::TigerTable => Applicability::RegionalExtension,
            // search/update index subsets are gated by the catalog itself
            _ => Applicability::Always,
        }
    }

    /// Run the check's own assertion against the database.
    pub async fn evaluate<P: SchemaProber + ?Sized>(&self, prober: &mut P) -> Result<(), Failure> {
        match self {
            Check::Connection => {
                if prober.connect().await {
                    Ok(())
                } else {
                    Err(Failure::new(
                        FailureKind::Connectivity,
                        Hint::new(hint::CONNECTION),
                    ))
                }
            }
            Check::Module => match prober.scalar_text(CANARY_SQL).await {
                Ok(Some(v)) if v == CANARY_EXPECTED => Ok(()),
                Ok(other) => Err(
                    Failure::new(FailureKind::SchemaAbsence, Hint::new(hint::MODULE))
                        .caused_by(format!("unexpected canary result {other:?}")),
                ),
                Err(e) => Err(
                    Failure::new(FailureKind::QueryExecution, Hint::new(hint::MODULE))
                        .caused_by(e),
                ),
            },
            Check::PlaceTable => {
                table_check(prober, PLACE_TABLE, Hint::new(hint::PLACE_TABLE)).await
            }
            Check::IndexingStatus => match prober.scalar_count(BACKLOG_SQL).await {
                Ok(0) => Ok(()),
                Ok(n) => Err(Failure::new(
                    FailureKind::DataIncomplete,
                    Hint::new(hint::INDEXING).with("count", n),
                )),
                Err(e) => Err(Failure::new(
                    FailureKind::QueryExecution,
                    Hint::new(hint::INDEXING).with("count", "an unknown number of"),
                )
                .caused_by(e)),
            },
            Check::Index(name) => match prober.index_exists(name).await {
                Ok(true) => Ok(()),
                Ok(false) => Err(Failure::new(
                    FailureKind::SchemaAbsence,
                    Hint::new(hint::MISSING_INDEX),
                )),
                Err(e) => Err(
                    Failure::new(FailureKind::QueryExecution, Hint::new(hint::MISSING_INDEX))
                        .caused_by(e),
                ),
            },
            Check::ValidIndices => match prober.column(INVALID_INDICES_SQL).await {
                Ok(names) if names.is_empty() => Ok(()),
                Ok(names) => Err(Failure::new(
                    FailureKind::DataIncomplete,
                    Hint::new(hint::INVALID_INDICES).with("indices", names.join(", ")),
                )),
                Err(e) => Err(Failure::new(
                    FailureKind::QueryExecution,
                    Hint::new(hint::INVALID_INDICES).with("indices", "(query failed)"),
                )
                .caused_by(e)),
            },
            Check::TigerTable => {
                table_check(prober, TIGER_TABLE, Hint::new(hint::TIGER_TABLE)).await
            }
        }
    }
}

async fn table_check<P: SchemaProber + ?Sized>(
    prober: &P,
    table: &str,
    hint: Hint,
) -> Result<(), Failure> {
    match prober.table_exists(table).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(Failure::new(FailureKind::SchemaAbsence, hint)),
        Err(e) => Err(Failure::new(FailureKind::QueryExecution, hint).caused_by(e)),
    }
}

/// Checks that run before the installation mode is known.
pub fn preflight_checks() -> Vec<Check> {
    vec![Check::Connection, Check::Module]
}

/// Mode-dependent checks in execution order, already filtered by applicability.
pub fn planned_checks(mode: InstallationMode, options: CheckOptions) -> Vec<Check> {
    let mut plan = vec![Check::PlaceTable, Check::IndexingStatus];
    plan.extend(catalog::expected_indices(mode).into_iter().map(Check::Index));
    plan.push(Check::ValidIndices);
    plan.push(Check::TigerTable);
    plan.retain(|c| c.applicability().applies(mode, options));
    plan
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail {
        label: String,
        kind: FailureKind,
        hint: Hint,
    },
}

impl Verdict {
    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::Pass => 0,
            Verdict::Fail { .. } => 1,
        }
    }
}

/// Drives the checks against one prober, reporting as it goes.
pub struct Pipeline<'a, P: SchemaProber + ?Sized, R: Reporter + ?Sized> {
    prober: &'a mut P,
    reporter: &'a mut R,
    options: CheckOptions,
}

impl<'a, P: SchemaProber + ?Sized, R: Reporter + ?Sized> Pipeline<'a, P, R> {
    pub fn new(prober: &'a mut P, reporter: &'a mut R, options: CheckOptions) -> Self {
        Self {
            prober,
            reporter,
            options,
        }
    }

    pub async fn run(&mut self) -> Verdict {
        for check in preflight_checks() {
            if let Some(v) = self.step(&check).await {
                return v;
            }
        }

        let mode = InstallationMode::detect(&*self.prober).await;

        let mut in_index_block = false;
        for check in planned_checks(mode, self.options) {
            if matches!(check, Check::Index(_)) && !in_index_block {
                self.reporter.section(INDEX_SECTION);
                in_index_block = true;
            }
            if let Some(v) = self.step(&check).await {
                return v;
            }
        }

        info!("all checks passed");
        Verdict::Pass
    }

    async fn step(&mut self, check: &Check) -> Option<Verdict> {
        let label = check.label();
        self.reporter.begin(&label);
        match check.evaluate(&mut *self.prober).await {
            Ok(()) => {
                self.reporter.pass();
                None
            }
            Err(failure) => {
                warn!(
                    check = %label,
                    kind = ?failure.kind,
                    cause = failure.cause.as_deref().unwrap_or("-"),
                    "check failed"
                );
                self.reporter.fail(&failure.hint.render());
                Some(Verdict::Fail {
                    label,
                    kind: failure.kind,
                    hint: failure.hint,
                })
            }
        }
    }
}
