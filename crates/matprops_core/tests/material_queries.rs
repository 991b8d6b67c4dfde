use matprops_core::db::open_db_in_memory;
use matprops_core::{
    Column, EditorSession, FilterSet, MaterialQueries, MaterialRepository, MechanicalProperties,
    QueryError, SortOrder, SqliteMaterialQueries, SqliteMaterialRepository, ValidationError,
};
use rusqlite::Connection;
use std::collections::HashSet;

fn props(density: Option<f64>, yield_strength: Option<f64>) -> MechanicalProperties {
    MechanicalProperties {
        density,
        yield_strength,
        ..MechanicalProperties::default()
    }
}

fn seed(conn: &Connection) {
    let repo = SqliteMaterialRepository::new(conn);
    repo.add_entry("Steel-1020", "Metal", &props(Some(7870.0), Some(350.0)))
        .unwrap();
    repo.add_entry("Al-6061", "Metal", &props(Some(2700.0), Some(276.0)))
        .unwrap();
    repo.add_entry("Ti-6Al-4V", "Metal", &props(Some(4430.0), Some(880.0)))
        .unwrap();
    repo.add_entry("Brass", "Metal", &props(None, Some(300.0)))
        .unwrap();
    repo.add_entry("HDPE", "Polymer", &props(Some(950.0), Some(26.0)))
        .unwrap();
    repo.add_entry("PEEK", "Polymer", &props(Some(1300.0), Some(400.0)))
        .unwrap();
    repo.add_entry("Alumina", "Ceramic", &props(Some(3950.0), None))
        .unwrap();
}

fn names(records: &[matprops_core::MaterialRecord]) -> Vec<&str> {
    records.iter().map(|record| record.material.as_str()).collect()
}

#[test]
fn list_all_defaults_to_material_ascending() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let queries = SqliteMaterialQueries::new(&conn);

    let listed = queries.list_all(SortOrder::default()).unwrap();
    assert_eq!(
        names(&listed),
        vec![
            "Al-6061",
            "Alumina",
            "Brass",
            "HDPE",
            "PEEK",
            "Steel-1020",
            "Ti-6Al-4V"
        ]
    );
}

#[test]
fn list_all_sorts_by_density_descending_with_every_row_once() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let queries = SqliteMaterialQueries::new(&conn);

    let order = SortOrder::parse("density", true).unwrap();
    let listed = queries.list_all(order).unwrap();
    assert_eq!(listed.len(), 7);

    let unique: HashSet<&str> = names(&listed).into_iter().collect();
    assert_eq!(unique.len(), 7);

    let densities: Vec<f64> = listed
        .iter()
        .filter_map(|record| record.properties.density)
        .collect();
    assert!(densities.windows(2).all(|pair| pair[0] >= pair[1]));
    assert_eq!(densities[0], 7870.0);
}

#[test]
fn list_all_rejects_unknown_order_column() {
    let err = SortOrder::parse("hardness", false).unwrap_err();
    assert!(matches!(
        err,
        QueryError::Validation(ValidationError::UnknownColumn(ref name)) if name == "hardness"
    ));
}

#[test]
fn list_filtered_combines_filters_with_and() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let queries = SqliteMaterialQueries::new(&conn);

    let mut filters = FilterSet::new();
    filters.add(Column::Category, "Metal", "=").unwrap();
    filters.add(Column::YieldStrength, "300", ">=").unwrap();

    let listed = queries.list_filtered(&filters).unwrap();
    assert_eq!(names(&listed), vec!["Brass", "Steel-1020", "Ti-6Al-4V"]);
}

#[test]
fn list_filtered_compares_numbers_numerically() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let queries = SqliteMaterialQueries::new(&conn);

    // As text, "950" > "1000" would hold.
    let mut filters = FilterSet::new();
    filters.add(Column::Density, "1000", "<").unwrap();

    let listed = queries.list_filtered(&filters).unwrap();
    assert_eq!(names(&listed), vec!["HDPE"]);
}

#[test]
fn list_filtered_excludes_missing_values() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let queries = SqliteMaterialQueries::new(&conn);

    let mut filters = FilterSet::new();
    filters.add(Column::Density, "0", ">").unwrap();

    let listed = queries.list_filtered(&filters).unwrap();
    assert!(!names(&listed).contains(&"Brass"));
    assert_eq!(listed.len(), 6);
}

#[test]
fn list_filtered_treats_values_as_literals() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let queries = SqliteMaterialQueries::new(&conn);

    let mut filters = FilterSet::new();
    filters
        .add(Column::Material, "x\" OR \"1\" = \"1", "=")
        .unwrap();

    assert!(queries.list_filtered(&filters).unwrap().is_empty());
}

#[test]
fn list_filtered_without_filters_returns_everything() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let queries = SqliteMaterialQueries::new(&conn);

    let listed = queries.list_filtered(&FilterSet::new()).unwrap();
    assert_eq!(listed.len(), 7);
}

#[test]
fn category_summary_reports_means_and_empty_categories() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let queries = SqliteMaterialQueries::new(&conn);

    let summaries = queries.category_summary().unwrap();
    let categories: Vec<&str> = summaries
        .iter()
        .map(|summary| summary.category.as_str())
        .collect();
    assert_eq!(
        categories,
        vec!["Metal", "Polymer", "Ceramic", "Composite", "Other"]
    );

    let metal = &summaries[0];
    assert_eq!(metal.materials, 4);
    // Brass has no density; it is excluded rather than counted as zero.
    let expected_density = (7870.0 + 2700.0 + 4430.0) / 3.0;
    assert!((metal.averages.density.unwrap() - expected_density).abs() < 1e-9);
    let expected_yield = (350.0 + 276.0 + 880.0 + 300.0) / 4.0;
    assert!((metal.averages.yield_strength.unwrap() - expected_yield).abs() < 1e-9);
    assert_eq!(metal.averages.modulus_of_elasticity, None);

    let polymer = &summaries[1];
    assert_eq!(polymer.materials, 2);
    assert_eq!(polymer.averages.density, Some(1125.0));

    let ceramic = &summaries[2];
    assert_eq!(ceramic.materials, 1);
    assert_eq!(ceramic.averages.yield_strength, None);

    let composite = &summaries[3];
    assert_eq!(composite.materials, 0);
    assert_eq!(composite.averages, MechanicalProperties::default());
}

#[test]
fn category_summary_tracks_deletes() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let repo = SqliteMaterialRepository::new(&conn);
    let queries = SqliteMaterialQueries::new(&conn);

    assert!(repo.delete_material("Alumina").unwrap());

    let summaries = queries.category_summary().unwrap();
    assert_eq!(summaries[2].category, "Ceramic");
    assert_eq!(summaries[2].materials, 0);
    assert_eq!(summaries[2].averages.density, None);
}

#[test]
fn list_columns_matches_column_allow_list() {
    let conn = open_db_in_memory().unwrap();
    let queries = SqliteMaterialQueries::new(&conn);

    let columns = queries.list_columns().unwrap();
    let expected: Vec<&str> = Column::ALL.iter().map(|column| column.as_str()).collect();
    assert_eq!(columns, expected);
}

#[test]
fn session_filters_apply_until_cleared() {
    let mut session = EditorSession::in_memory().unwrap();
    seed(session.connection());

    session.add_filter(Column::Category, "Polymer", "=").unwrap();
    assert_eq!(names(&session.list_filtered().unwrap()), vec!["HDPE", "PEEK"]);

    session.add_filter(Column::YieldStrength, "100", ">").unwrap();
    assert_eq!(names(&session.list_filtered().unwrap()), vec!["PEEK"]);

    let err = session
        .add_filter(Column::YieldStrength, "100", "=>")
        .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidOperator { ref operator, .. } if operator == "=>"));
    assert_eq!(session.filters().len(), 2);

    let first = session.filters().as_slice()[0].clone();
    assert!(session.remove_filter(&first));
    assert_eq!(
        names(&session.list_filtered().unwrap()),
        vec!["Al-6061", "Brass", "PEEK", "Steel-1020", "Ti-6Al-4V"]
    );

    session.clear_filters();
    assert!(session.filters().is_empty());
}
