use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sms_core::{Callback, Method};
use sms_standards::{FormRegistry, TierSelector};

/// Table of the registered forms.
pub fn forms_table(registry: &FormRegistry) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Title"),
        header_cell("Fields"),
        header_cell("Aggregates"),
        header_cell("Recipients"),
        header_cell("Acknowledgement"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for form in registry.iter() {
        let recipients = form
            .tasks
            .recipients
            .iter()
            .map(selector_label)
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(&form.code)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(form.title.as_deref().unwrap_or_default()),
            Cell::new(form.fields.len()),
            count_cell(form.aggregates.len()),
            text_or_dash(&recipients),
            text_or_dash(form.acknowledgement.as_deref().unwrap_or_default()),
        ]);
    }
    table
}

/// Table of the errors, tasks and responses carried by a callback's record.
pub fn record_table(callback: &Callback) -> Table {
    let record = &callback.body;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Kind"),
        header_cell("To / Code"),
        header_cell("Message"),
    ]);
    apply_record_table_style(&mut table);
    for error in &record.errors {
        table.add_row(vec![
            Cell::new("error").fg(Color::Red),
            Cell::new(error.code),
            Cell::new(&error.message),
        ]);
    }
    for task in &record.tasks {
        for message in &task.messages {
            table.add_row(vec![
                Cell::new("task").fg(Color::Green),
                Cell::new(&message.to),
                Cell::new(&message.message),
            ]);
        }
    }
    for response in &record.responses {
        table.add_row(vec![
            Cell::new("response").fg(Color::Cyan),
            Cell::new(&response.to),
            Cell::new(&response.message),
        ]);
    }
    let method = match callback.method {
        Method::Get => "GET",
        Method::Post => "POST",
        Method::Put => "PUT",
    };
    table.add_row(vec![
        Cell::new("write")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(method).add_attribute(Attribute::Bold),
        Cell::new(&callback.path),
    ]);
    table
}

fn selector_label(selector: &TierSelector) -> String {
    match selector {
        TierSelector::Topmost => "topmost".to_string(),
        TierSelector::Closest => "closest".to_string(),
        TierSelector::All => "all".to_string(),
        TierSelector::EntityType(entity_type) => format!("type:{entity_type}"),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_record_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        dim_cell(count)
    }
}

fn text_or_dash(value: &str) -> Cell {
    if value.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(value)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
