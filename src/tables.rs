use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use pack_runtime::{
    quantity::precision::{Rounding, format_value},
    session::{GroupSnapshot, Report},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

pub fn build_group_table(snapshot: &GroupSnapshot) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new(snapshot.id).add_attribute(Attribute::Bold),
        Cell::new("Value"),
        Cell::new("Unit"),
        Cell::new("Source"),
        Cell::new("Error"),
    ]);
    for field in &snapshot.fields {
        let kind = field.id.group.kind.quantity(field.id.role);
        table.add_row(vec![
            Cell::new(field.id.role),
            Cell::new(&field.text).set_alignment(CellAlignment::Right),
            Cell::new(kind.unit()).add_attribute(Attribute::Dim),
            if field.is_owner {
                Cell::new("user").fg(Color::Green)
            } else if field.text.is_empty() {
                Cell::new("")
            } else {
                Cell::new("auto").add_attribute(Attribute::Dim)
            },
            // Only the group's error surface is shown:
            snapshot
                .error
                .filter(|(id, _)| *id == field.id)
                .map_or_else(|| Cell::new(""), |(_, error)| Cell::new(error).fg(Color::Red)),
        ]);
    }
    table
}

pub fn build_report_table(report: &Report) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Quantity", "Nominal", "Min", "Max", "Unit", "Exact"]);
    let format_extreme = |value: Option<f64>| value.map(format_value).unwrap_or_default();
    for output in &report.outputs {
        let solution = output.solution;
        table.add_row(vec![
            Cell::new(output.kind.label()),
            Cell::new(format_value(solution.nominal))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Bold),
            Cell::new(format_extreme(solution.min))
                .set_alignment(CellAlignment::Right)
                .fg(Color::DarkYellow),
            Cell::new(format_extreme(solution.max))
                .set_alignment(CellAlignment::Right)
                .fg(Color::DarkYellow),
            Cell::new(output.kind.unit()).add_attribute(Attribute::Dim),
            match output.kind.rounding() {
                Rounding::Ceiling => Cell::new(format!("{:.3}", solution.exact))
                    .set_alignment(CellAlignment::Right)
                    .add_attribute(Attribute::Dim),
                Rounding::Nearest(_) => Cell::new(""),
            },
        ]);
    }
    if let Some(path) = report.path {
        let path = path.locked().map_or_else(|| "unset".to_owned(), |path| path.to_string());
        table.add_row(vec![Cell::new("Path"), Cell::new(path).fg(Color::Cyan)]);
    }
    table
}
