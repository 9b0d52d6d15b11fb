//! Installation-variant detection.
//!
//! Nothing in the database records how the import was run, so the variant is
//! guessed from tables that the optional setup steps create or drop. A
//! database can match these patterns without having gone through the matching
//! setup path; the guess is not second-guessed here.

use tracing::{info, warn};

use super::prober::SchemaProber;

pub const SEARCH_NAME_TABLE: &str = "search_name";
pub const PLACEX_TABLE: &str = "placex";
pub const OSM_RELS_TABLE: &str = "planet_osm_rels";

/// Shape of the installation, computed once per run before any gated check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstallationMode {
    /// Forward search schema missing: only reverse lookups are served.
    pub reverse_only: bool,
    /// Raw OSM tables were dropped after import (`--drop`): no updates possible.
    pub no_update: bool,
}

impl InstallationMode {
    /// Pure classification over observed table presence.
    pub fn from_tables(has_search_name: bool, has_placex: bool, has_osm_rels: bool) -> Self {
        Self {
            reverse_only: !has_search_name,
            no_update: has_placex && !has_osm_rels,
        }
    }

    pub async fn detect<P: SchemaProber + ?Sized>(prober: &P) -> Self {
        let has_search_name = table_present(prober, SEARCH_NAME_TABLE).await;
        let has_placex = table_present(prober, PLACEX_TABLE).await;
        let has_osm_rels = table_present(prober, OSM_RELS_TABLE).await;
        let mode = Self::from_tables(has_search_name, has_placex, has_osm_rels);
        info!(
            reverse_only = mode.reverse_only,
            no_update = mode.no_update,
            "detected installation mode"
        );
        mode
    }
}

pub async fn detect_reverse_only<P: SchemaProber + ?Sized>(prober: &P) -> bool {
    !table_present(prober, SEARCH_NAME_TABLE).await
}

pub async fn detect_no_update<P: SchemaProber + ?Sized>(prober: &P) -> bool {
    table_present(prober, PLACEX_TABLE).await && !table_present(prober, OSM_RELS_TABLE).await
}

// Probe errors count as "absent".
async fn table_present<P: SchemaProber + ?Sized>(prober: &P, name: &str) -> bool {
    match prober.table_exists(name).await {
        Ok(v) => v,
        Err(e) => {
            warn!(table = name, error = %e, "table probe failed; treating as absent");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::prober::fake::FakeProber;

    #[test]
    fn classification_covers_all_table_patterns() {
        let full = InstallationMode::from_tables(true, true, true);
        assert_eq!(full, InstallationMode::default());

        let dropped = InstallationMode::from_tables(true, true, false);
        assert!(dropped.no_update);
        assert!(!dropped.reverse_only);

        // no placex at all: never "no-update"
        let empty = InstallationMode::from_tables(true, false, false);
        assert!(!empty.no_update);

        let reverse = InstallationMode::from_tables(false, true, true);
        assert!(reverse.reverse_only);
        assert!(!reverse.no_update);
    }

    #[tokio::test]
    async fn reverse_only_depends_only_on_search_name() {
        let with = FakeProber::new().with_tables(&["search_name"]);
        assert!(!detect_reverse_only(&with).await);

        let without = FakeProber::new().with_tables(&["placex", "planet_osm_rels", "place"]);
        assert!(detect_reverse_only(&without).await);
    }

    #[tokio::test]
    async fn no_update_needs_placex_without_rels() {
        let dropped = FakeProber::new().with_tables(&["placex"]);
        assert!(detect_no_update(&dropped).await);

        let full = FakeProber::new().with_tables(&["placex", "planet_osm_rels"]);
        assert!(!detect_no_update(&full).await);

        let bare = FakeProber::new();
        assert!(!detect_no_update(&bare).await);

        let rels_only = FakeProber::new().with_tables(&["planet_osm_rels"]);
        assert!(!detect_no_update(&rels_only).await);
    }

    #[tokio::test]
    async fn failed_table_lookup_counts_as_absent() {
        let prober = FakeProber::new()
            .with_tables(&["search_name", "placex", "planet_osm_rels"])
            .failing_table("planet_osm_rels");
        assert!(!detect_reverse_only(&prober).await);
        assert!(detect_no_update(&prober).await);

        let prober = FakeProber::new()
            .with_tables(&["search_name", "placex"])
            .failing_table("search_name")
            .failing_table("placex");
        let mode = InstallationMode::detect(&prober).await;
        assert_eq!(
            mode,
            InstallationMode {
                reverse_only: true,
                no_update: false
            }
        );
    }

    #[tokio::test]
    async fn detect_combines_both_axes() {
        let prober = FakeProber::new().with_tables(&["placex"]);
        let mode = InstallationMode::detect(&prober).await;
        assert_eq!(
            mode,
            InstallationMode {
                reverse_only: true,
                no_update: true
            }
        );
    }
}
