//! Console table rendering.

use matprops_core::{CategorySummary, Column, Filter, MaterialRecord};

/// Width of every table cell.
pub const COLUMN_SPACING: usize = 11;

/// Display label for a view column, falling back to the raw name.
pub fn column_label(name: &str) -> &str {
    match name {
        "material" => "Material",
        "materials" => "Materials",
        "category" => "Category",
        "density" => "ρ(kg/m³)",
        "modulus_of_elasticity" => "E(GPa)",
        "modulus_of_rigidity" => "G(GPa)",
        "yield_strength" => "σy(MPa)",
        "ultimate_tensile_strength" => "σult(MPa)",
        "percent_elongation" => "%EL",
        other => other,
    }
}

/// Human-readable filter, e.g. `σy(MPa) >= 300`.
pub fn filter_label(filter: &Filter) -> String {
    format!(
        "{} {} {}",
        column_label(filter.column.as_str()),
        filter.operator,
        filter.value
    )
}

fn format_number(value: Option<f64>) -> String {
    value.map(|number| number.to_string()).unwrap_or_default()
}

fn center(text: &str) -> String {
    format!("{text:^width$}", width = COLUMN_SPACING)
}

fn spacer(columns: usize) -> String {
    "-".repeat(COLUMN_SPACING * columns)
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut table = String::new();
    table.push_str(
        &headers
            .iter()
            .map(|header| center(column_label(header)))
            .collect::<String>(),
    );
    table.push('\n');
    table.push_str(&spacer(headers.len()));
    table.push('\n');
    for row in rows {
        table.push_str(&row.iter().map(|cell| center(cell)).collect::<String>());
        table.push('\n');
    }
    table.push_str(&spacer(headers.len()));
    table
}

/// Material table, or `No Materials...` for an empty list.
pub fn materials_table(materials: &[MaterialRecord]) -> String {
    if materials.is_empty() {
        return "No Materials...".to_string();
    }

    let headers = Column::ALL.map(Column::as_str);
    let rows = materials
        .iter()
        .map(|record| {
            let mut row = vec![record.material.clone(), record.category.clone()];
            row.extend(record.properties.values().map(format_number));
            row
        })
        .collect::<Vec<_>>();
    render_table(&headers, &rows)
}

/// Category summary table with an `Averages` banner over the property columns.
pub fn summary_table(summaries: &[CategorySummary]) -> String {
    let mut headers = vec!["category", "materials"];
    headers.extend(Column::PROPERTIES.map(Column::as_str));
    let rows = summaries
        .iter()
        .map(|summary| {
            let mut row = vec![summary.category.clone(), summary.materials.to_string()];
            row.extend(summary.averages.values().map(format_number));
            row
        })
        .collect::<Vec<_>>();

    let banner_width = COLUMN_SPACING * Column::PROPERTIES.len();
    format!(
        "{}{:^banner_width$}\n{}",
        " ".repeat(COLUMN_SPACING * 2),
        "Averages",
        render_table(&headers, &rows)
    )
}
