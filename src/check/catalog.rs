//! Indices the import is contracted to leave behind.
//! Renaming an index in the SQL setup scripts means updating these lists.

use super::mode::InstallationMode;

/// Always required (word lookup, address lines, ranking, reverse geometry,
/// parent linkage, postcodes).
pub const BASE_INDICES: [&str; 11] = [
    "idx_word_word_id",
    "idx_place_addressline_address_place_id",
    "idx_placex_rank_search",
    "idx_placex_rank_address",
    "idx_placex_parent_place_id",
    "idx_placex_geometry_reverse_lookuppolygon",
    "idx_placex_geometry_reverse_placenode",
    "idx_osmline_parent_place_id",
    "idx_osmline_parent_osm_id",
    "idx_postcode_id",
    "idx_postcode_postcode",
];

/// Forward full-text search; absent on reverse-only installs.
pub const SEARCH_INDICES: [&str; 3] = [
    "idx_search_name_nameaddress_vector",
    "idx_search_name_name_vector",
    "idx_search_name_centroid",
];

/// Only needed while the database can still take updates.
pub const UPDATE_INDICES: [&str; 3] = [
    "idx_placex_pendingsector",
    "idx_location_area_country_place_id",
    "idx_place_osm_unique",
];

/// Ordered list of expected index names: base, then search, then update.
pub fn expected_indices(mode: InstallationMode) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = BASE_INDICES.to_vec();
    if !mode.reverse_only {
        out.extend_from_slice(&SEARCH_INDICES);
    }
    if !mode.no_update {
        out.extend_from_slice(&UPDATE_INDICES);
    }
    out
}
