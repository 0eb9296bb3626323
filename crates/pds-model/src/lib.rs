pub mod alias;
pub mod error;
pub mod policy;

pub use alias::{AliasTable, ColumnResolution, EXPECTED_PROVINCE_COUNT, Resolution};
pub use error::{AliasTableError, Result};
pub use policy::{CleanConfig, EXCLUDED_PROVINCES, SENTINEL_PROVINCES};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_mapping_loads() {
        let table = AliasTable::embedded().expect("embedded mapping");
        assert_eq!(table.canonical_names().len(), EXPECTED_PROVINCE_COUNT);
    }

    #[test]
    fn excluded_provinces_are_canonical() {
        let table = AliasTable::embedded().expect("embedded mapping");
        for province in EXCLUDED_PROVINCES {
            assert!(table.is_canonical(province), "{province} not canonical");
        }
    }

    #[test]
    fn sentinels_never_resolve() {
        let table = AliasTable::embedded().expect("embedded mapping");
        for sentinel in SENTINEL_PROVINCES {
            assert_eq!(table.resolve(sentinel), Resolution::Unresolved);
        }
    }
}
