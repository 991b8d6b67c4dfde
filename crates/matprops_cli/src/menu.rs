//! Interactive menu state machine.
//!
//! # Responsibility
//! - Drive the main → database → view/edit screens from numbered selections.
//! - Convert core errors into user-facing messages at this boundary.
//!
//! # Invariants
//! - A session is open exactly while a screen other than `Main` is active.
//! - End of input unwinds to `Exit` from any screen.

use crate::display::{column_label, filter_label, materials_table, summary_table};
use crate::prompt::Prompter;
use log::warn;
use matprops_core::{
    create_database, Column, DbError, EditorSession, MaterialRecord, MechanicalProperties,
    Operator, RepoError, SortOrder,
};
use std::io::{self, BufRead, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
enum Screen {
    Main,
    Database,
    View,
    Filters,
    Edit,
    Material(MaterialRecord),
    Exit,
}

pub struct App<R, W> {
    io: Prompter<R, W>,
    session: Option<EditorSession>,
    /// Leaving the database screen exits instead of returning to `Main`.
    standalone: bool,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(io: Prompter<R, W>) -> Self {
        Self {
            io,
            session: None,
            standalone: false,
        }
    }

    /// Runs from the main menu (create/open/exit).
    pub fn run_main(mut self) -> io::Result<Prompter<R, W>> {
        self.run(Screen::Main)?;
        Ok(self.io)
    }

    /// Runs directly on an already-open store.
    pub fn run_editor(mut self, session: EditorSession) -> io::Result<Prompter<R, W>> {
        self.session = Some(session);
        self.standalone = true;
        self.run(Screen::Database)?;
        Ok(self.io)
    }

    fn run(&mut self, mut screen: Screen) -> io::Result<()> {
        while screen != Screen::Exit {
            screen = self.step(screen)?;
        }
        self.close_session();
        Ok(())
    }

    fn step(&mut self, screen: Screen) -> io::Result<Screen> {
        if screen == Screen::Main {
            return self.main_menu();
        }

        let Some(session) = self.session.as_mut() else {
            return Ok(Screen::Main);
        };
        let io = &mut self.io;
        let next = match screen {
            Screen::Database => database_menu(io, session)?,
            Screen::View => view_menu(io, session)?,
            Screen::Filters => filter_menu(io, session)?,
            Screen::Edit => edit_menu(io, session)?,
            Screen::Material(record) => material_menu(io, session, record)?,
            Screen::Main | Screen::Exit => Some(Screen::Exit),
        };

        // `None` means the user left the database screen.
        Ok(match next {
            Some(next) => next,
            None => {
                self.close_session();
                if self.standalone {
                    Screen::Exit
                } else {
                    Screen::Main
                }
            }
        })
    }

    fn main_menu(&mut self) -> io::Result<Screen> {
        self.io.say("Mechanical Properties Database Editor")?;
        let options = ["Create New Database", "Open Existing Database", "Exit"];
        let Some(choice) = self.io.select(&options, false)? else {
            return Ok(Screen::Exit);
        };

        match choice {
            0 => {
                let Some(filename) = self.io.ask("Database to Create: ")? else {
                    return Ok(Screen::Exit);
                };
                match create_database(&filename) {
                    Ok(()) => self.io.say(format!("{filename} created..."))?,
                    Err(DbError::AlreadyExists(_)) => {
                        self.io.say(format!("{filename} already exists..."))?
                    }
                    Err(err) => self.io.say(format!("Unable to create {filename}: {err}"))?,
                }
                Ok(Screen::Main)
            }
            1 => {
                let Some(filename) = self.io.ask("Database to Edit: ")? else {
                    return Ok(Screen::Exit);
                };
                match EditorSession::open(&filename) {
                    Ok(session) => {
                        self.session = Some(session);
                        Ok(Screen::Database)
                    }
                    Err(DbError::NotFound(_)) => {
                        self.io
                            .say(format!("{filename} does not currently exist..."))?;
                        Ok(Screen::Main)
                    }
                    Err(err) => {
                        self.io.say(format!("Unable to open {filename}: {err}"))?;
                        Ok(Screen::Main)
                    }
                }
            }
            _ => Ok(Screen::Exit),
        }
    }

    fn close_session(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(err) = session.close() {
                warn!("event=session_close module=cli status=error error={err}");
            }
        }
    }
}

fn store_name(session: &EditorSession) -> String {
    session
        .path()
        .map(Path::display)
        .map(|path| path.to_string())
        .unwrap_or_else(|| ":memory:".to_string())
}

/// Returns `None` when the user is done with the database.
fn database_menu<R: BufRead, W: Write>(
    io: &mut Prompter<R, W>,
    session: &mut EditorSession,
) -> io::Result<Option<Screen>> {
    io.say(format!("Database: {}", store_name(session)))?;
    let options = ["View Database", "Edit Database", "Done"];
    Ok(match io.select(&options, false)? {
        None => Some(Screen::Exit),
        Some(0) => Some(Screen::View),
        Some(1) => Some(Screen::Edit),
        Some(_) => None,
    })
}

fn view_menu<R: BufRead, W: Write>(
    io: &mut Prompter<R, W>,
    session: &mut EditorSession,
) -> io::Result<Option<Screen>> {
    io.say(format!("Display Database: {}", store_name(session)))?;
    let options = [
        "Display All Materials",
        "Display Material",
        "Display Sorted Materials",
        "Display Filtered Materials",
        "Display Category Summaries",
        "Done",
    ];
    let Some(choice) = io.select(&options, false)? else {
        return Ok(Some(Screen::Exit));
    };

    let next = match choice {
        0 => display_all(io, session).map(|()| Screen::View),
        1 => display_material(io, session).map(|done| done.unwrap_or(Screen::View)),
        2 => display_sorted(io, session).map(|done| done.unwrap_or(Screen::View)),
        3 => Ok(Screen::Filters),
        4 => display_summaries(io, session).map(|()| Screen::View),
        _ => Ok(Screen::Database),
    };
    next.map(Some)
}

fn filter_menu<R: BufRead, W: Write>(
    io: &mut Prompter<R, W>,
    session: &mut EditorSession,
) -> io::Result<Option<Screen>> {
    io.say("Filters")?;
    if session.filters().is_empty() {
        io.say("\tNo filters...")?;
    } else {
        for filter in session.filters() {
            io.say(format!("\t{}", filter_label(filter)))?;
        }
    }

    let options = [
        "Add filter",
        "Remove Filter",
        "Apply Filters",
        "Clear Filters",
        "Done",
    ];
    let Some(choice) = io.select(&options, false)? else {
        return Ok(Some(Screen::Exit));
    };

    let next = match choice {
        0 => add_filter(io, session)?,
        1 => remove_filter(io, session)?,
        2 => {
            // With no filters set, show everything.
            if session.filters().is_empty() {
                display_all(io, session)?;
            } else {
                match session.list_filtered() {
                    Ok(materials) => io.say(materials_table(&materials))?,
                    Err(err) => io.say(format!("Unable to filter materials: {err}"))?,
                }
            }
            None
        }
        3 => {
            session.clear_filters();
            None
        }
        _ => return Ok(Some(Screen::View)),
    };
    Ok(Some(next.unwrap_or(Screen::Filters)))
}

fn edit_menu<R: BufRead, W: Write>(
    io: &mut Prompter<R, W>,
    session: &mut EditorSession,
) -> io::Result<Option<Screen>> {
    io.say(format!("Edit Database: {}", store_name(session)))?;
    let options = ["Display Materials", "Add Material", "Edit Material", "Done"];
    let Some(choice) = io.select(&options, false)? else {
        return Ok(Some(Screen::Exit));
    };

    let next = match choice {
        0 => display_all(io, session).map(|()| Screen::Edit)?,
        1 => add_material(io, session)?.unwrap_or(Screen::Edit),
        2 => match prompt_material_name(io)? {
            Prompted::Value(name) => match session.get_entry_by_material(&name) {
                Ok(Some(record)) => Screen::Material(record),
                Ok(None) => {
                    io.say(format!("'{name}' does not currently exist..."))?;
                    Screen::Edit
                }
                Err(err) => {
                    io.say(format!("Unable to read {name}: {err}"))?;
                    Screen::Edit
                }
            },
            Prompted::Invalid => Screen::Edit,
            Prompted::Eof => Screen::Exit,
        },
        _ => Screen::Database,
    };
    Ok(Some(next))
}

fn material_menu<R: BufRead, W: Write>(
    io: &mut Prompter<R, W>,
    session: &mut EditorSession,
    record: MaterialRecord,
) -> io::Result<Option<Screen>> {
    io.say("Selected Material")?;
    io.say(materials_table(std::slice::from_ref(&record)))?;
    let options = ["Update Material", "Delete Material", "Done"];
    let Some(choice) = io.select(&options, false)? else {
        return Ok(Some(Screen::Exit));
    };

    let next = match choice {
        0 => update_material(io, session, record)?,
        1 => {
            match session.delete_material(&record.material) {
                Ok(true) => io.say(format!("{} successfully deleted...", record.material))?,
                Ok(false) => io.say(format!("{} was not found...", record.material))?,
                Err(err) => io.say(format!("Unable to delete {}: {err}", record.material))?,
            }
            Screen::Edit
        }
        _ => Screen::Edit,
    };
    Ok(Some(next))
}

/// Outcome of a prompt that validates its input.
enum Prompted<T> {
    Value(T),
    Invalid,
    Eof,
}

fn prompt_material_name<R: BufRead, W: Write>(
    io: &mut Prompter<R, W>,
) -> io::Result<Prompted<String>> {
    let Some(name) = io.ask("\tMaterial Name: ")? else {
        return Ok(Prompted::Eof);
    };
    if name.trim().is_empty() {
        io.say("Invalid value")?;
        return Ok(Prompted::Invalid);
    }
    Ok(Prompted::Value(name))
}

fn prompt_category<R: BufRead, W: Write>(
    io: &mut Prompter<R, W>,
    session: &EditorSession,
) -> io::Result<Prompted<String>> {
    let mut categories = match session.list_categories() {
        Ok(categories) => categories,
        Err(err) => {
            io.say(format!("Unable to read categories: {err}"))?;
            return Ok(Prompted::Invalid);
        }
    };
    Ok(match io.select(&categories, true)? {
        Some(index) => Prompted::Value(categories.swap_remove(index)),
        None => Prompted::Eof,
    })
}

fn prompt_column<R: BufRead, W: Write>(
    io: &mut Prompter<R, W>,
    session: &EditorSession,
) -> io::Result<Prompted<Column>> {
    let columns = match session.list_columns() {
        Ok(columns) => columns,
        Err(err) => {
            io.say(format!("Unable to read columns: {err}"))?;
            return Ok(Prompted::Invalid);
        }
    };
    let labels: Vec<&str> = columns.iter().map(|name| column_label(name)).collect();
    let Some(index) = io.select(&labels, true)? else {
        return Ok(Prompted::Eof);
    };
    match columns[index].parse::<Column>() {
        Ok(column) => Ok(Prompted::Value(column)),
        Err(err) => {
            io.say(err)?;
            Ok(Prompted::Invalid)
        }
    }
}

fn display_all<R: BufRead, W: Write>(
    io: &mut Prompter<R, W>,
    session: &EditorSession,
) -> io::Result<()> {
    match session.list_all(SortOrder::default()) {
        Ok(materials) => io.say(materials_table(&materials)),
        Err(err) => io.say(format!("Unable to list materials: {err}")),
    }
}

fn display_material<R: BufRead, W: Write>(
    io: &mut Prompter<R, W>,
    session: &EditorSession,
) -> io::Result<Option<Screen>> {
    let name = match prompt_material_name(io)? {
        Prompted::Value(name) => name,
        Prompted::Invalid => return Ok(None),
        Prompted::Eof => return Ok(Some(Screen::Exit)),
    };
    match session.get_entry_by_material(&name) {
        Ok(Some(record)) => io.say(materials_table(std::slice::from_ref(&record)))?,
        Ok(None) => io.say(format!("'{name}' does not currently exist..."))?,
        Err(err) => io.say(format!("Unable to read {name}: {err}"))?,
    }
    Ok(None)
}

fn display_sorted<R: BufRead, W: Write>(
    io: &mut Prompter<R, W>,
    session: &EditorSession,
) -> io::Result<Option<Screen>> {
    io.say("Order By")?;
    let order_by = match prompt_column(io, session)? {
        Prompted::Value(column) => column,
        Prompted::Invalid => return Ok(None),
        Prompted::Eof => return Ok(Some(Screen::Exit)),
    };
    let Some(answer) = io.ask("Ascending (Y/n): ")? else {
        return Ok(Some(Screen::Exit));
    };
    let descending = answer
        .trim()
        .chars()
        .next()
        .is_some_and(|first| first.eq_ignore_ascii_case(&'n'));

    match session.list_all(SortOrder {
        order_by,
        descending,
    }) {
        Ok(materials) => io.say(materials_table(&materials))?,
        Err(err) => io.say(format!("Unable to list materials: {err}"))?,
    }
    Ok(None)
}

fn display_summaries<R: BufRead, W: Write>(
    io: &mut Prompter<R, W>,
    session: &EditorSession,
) -> io::Result<()> {
    match session.category_summary() {
        Ok(summaries) => io.say(summary_table(&summaries)),
        Err(err) => io.say(format!("Unable to summarize categories: {err}")),
    }
}

fn add_material<R: BufRead, W: Write>(
    io: &mut Prompter<R, W>,
    session: &EditorSession,
) -> io::Result<Option<Screen>> {
    let name = match prompt_material_name(io)? {
        Prompted::Value(name) => name,
        Prompted::Invalid => return Ok(None),
        Prompted::Eof => return Ok(Some(Screen::Exit)),
    };
    let category = match prompt_category(io, session)? {
        Prompted::Value(category) => category,
        Prompted::Invalid => return Ok(None),
        Prompted::Eof => return Ok(Some(Screen::Exit)),
    };

    let prompts = [
        "\tDensity (kg/m³): ",
        "\tModulus of Elasticity (GPa): ",
        "\tModulus of Rigidity (GPa): ",
        "\tYield Strength (MPa): ",
        "\tUltimate Tensile Strength (MPa): ",
        "\tPercent Elongation (%): ",
    ];
    let mut inputs: [String; 6] = Default::default();
    for (prompt, input) in prompts.into_iter().zip(inputs.iter_mut()) {
        let Some(answer) = io.ask(prompt)? else {
            return Ok(Some(Screen::Exit));
        };
        *input = answer;
    }

    let properties = match MechanicalProperties::parse(inputs.each_ref().map(String::as_str)) {
        Ok(properties) => properties,
        Err(_) => {
            io.say("Invalid value")?;
            return Ok(None);
        }
    };

    match session.add_entry(&name, &category, &properties) {
        Ok(()) => io.say(format!("{name} successfully added..."))?,
        Err(RepoError::AlreadyExists(_)) => io.say(
            "A material with that name already exists, please update that material instead...",
        )?,
        Err(err) => io.say(format!("Unable to add {name}: {err}"))?,
    }
    Ok(None)
}

fn update_material<R: BufRead, W: Write>(
    io: &mut Prompter<R, W>,
    session: &EditorSession,
    record: MaterialRecord,
) -> io::Result<Screen> {
    let column = match prompt_column(io, session)? {
        Prompted::Value(column) => column,
        Prompted::Invalid => return Ok(Screen::Material(record)),
        Prompted::Eof => return Ok(Screen::Exit),
    };
    let label = column_label(column.as_str());

    let value = if column == Column::Category {
        match prompt_category(io, session)? {
            Prompted::Value(category) => category,
            Prompted::Invalid => return Ok(Screen::Material(record)),
            Prompted::Eof => return Ok(Screen::Exit),
        }
    } else {
        match io.ask(&format!("\t{label}: "))? {
            Some(value) => value,
            None => return Ok(Screen::Exit),
        }
    };

    match session.update_and_fetch(&record.material, column, &value) {
        Ok(Some(updated)) => {
            io.say(format!(
                "{}'s {label} successfully updated...",
                record.material
            ))?;
            Ok(Screen::Material(updated))
        }
        Ok(None) => {
            io.say(format!("{} was not found...", record.material))?;
            Ok(Screen::Edit)
        }
        Err(RepoError::AlreadyExists(_)) => {
            io.say("A material with that name already exists...")?;
            Ok(Screen::Material(record))
        }
        Err(err) => {
            io.say(err)?;
            Ok(Screen::Material(record))
        }
    }
}

fn add_filter<R: BufRead, W: Write>(
    io: &mut Prompter<R, W>,
    session: &mut EditorSession,
) -> io::Result<Option<Screen>> {
    let column = match prompt_column(io, session)? {
        Prompted::Value(column) => column,
        Prompted::Invalid => return Ok(None),
        Prompted::Eof => return Ok(Some(Screen::Exit)),
    };
    io.say(column_label(column.as_str()))?;

    // Text columns only support equality.
    let operator = if column.is_numeric() {
        let prompt = format!("Operator [{}]: ", Operator::SYMBOLS.join(", "));
        match io.ask(&prompt)? {
            Some(operator) => operator,
            None => return Ok(Some(Screen::Exit)),
        }
    } else {
        Operator::Eq.as_str().to_string()
    };

    let value = match column {
        Column::Material => io.ask("Name: ")?,
        Column::Category => match prompt_category(io, session)? {
            Prompted::Value(category) => Some(category),
            Prompted::Invalid => return Ok(None),
            Prompted::Eof => None,
        },
        _ => io.ask("Value: ")?,
    };
    let Some(value) = value else {
        return Ok(Some(Screen::Exit));
    };

    if let Err(err) = session.add_filter(column, &value, operator.trim()) {
        io.say(err)?;
    }
    Ok(None)
}

fn remove_filter<R: BufRead, W: Write>(
    io: &mut Prompter<R, W>,
    session: &mut EditorSession,
) -> io::Result<Option<Screen>> {
    if session.filters().is_empty() {
        io.say("No filters to remove...")?;
        return Ok(None);
    }

    let labels: Vec<String> = session.filters().iter().map(filter_label).collect();
    let Some(index) = io.select(&labels, true)? else {
        return Ok(Some(Screen::Exit));
    };
    let filter = session.filters().as_slice()[index].clone();
    session.remove_filter(&filter);
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::App;
    use crate::prompt::Prompter;
    use matprops_core::{Column, EditorSession, MechanicalProperties};
    use std::io::Cursor;

    fn run_script(session: EditorSession, script: &str) -> String {
        let io = Prompter::new(Cursor::new(script.to_string()), Vec::new());
        let io = App::new(io).run_editor(session).unwrap();
        String::from_utf8(io.into_output()).unwrap()
    }

    fn seeded_session() -> EditorSession {
        let session = EditorSession::in_memory().unwrap();
        let steel = MechanicalProperties::parse(["7870", "200", "80", "350", "420", "15"]).unwrap();
        session.add_entry("Steel-1020", "Metal", &steel).unwrap();
        let hdpe = MechanicalProperties::parse(["950", "", "", "26", "", ""]).unwrap();
        session.add_entry("HDPE", "Polymer", &hdpe).unwrap();
        session
    }

    #[test]
    fn add_material_through_edit_menu() {
        // Edit Database → Add Material → name, category 3 (Ceramic), six values,
        // then Display Materials, Done, Done.
        let script = "2\n2\nAlumina\n3\n3950\n370\n\n\n300\n\n1\n4\n3\n";
        let output = run_script(EditorSession::in_memory().unwrap(), script);

        assert!(output.contains("Alumina successfully added..."));
        assert!(output.contains("Ceramic"));
        assert!(output.contains("3950"));
    }

    #[test]
    fn duplicate_add_reports_existing_material() {
        let script = "2\n2\nHDPE\n1\n1\n1\n1\n1\n1\n1\n4\n3\n";
        let output = run_script(seeded_session(), script);
        assert!(output.contains("A material with that name already exists"));
    }

    #[test]
    fn invalid_property_value_is_rejected() {
        let script = "2\n2\nPEEK\n2\nheavy\n\n\n\n\n\n4\n3\n";
        let output = run_script(seeded_session(), script);
        assert!(output.contains("Invalid value"));
        assert!(!output.contains("PEEK successfully added"));
    }

    #[test]
    fn rename_and_delete_through_material_menu() {
        // Edit → Edit Material "Steel-1020" → Update → column 1 (Material) →
        // new name → Delete → Done, Done.
        let script = "2\n3\nSteel-1020\n1\n1\nAISI 1020\n2\n4\n3\n";
        let output = run_script(seeded_session(), script);

        assert!(output.contains("Steel-1020's Material successfully updated..."));
        assert!(output.contains("AISI 1020 successfully deleted..."));
    }

    #[test]
    fn editing_unknown_material_reports_missing() {
        let script = "2\n3\nGhost\n4\n3\n";
        let output = run_script(seeded_session(), script);
        assert!(output.contains("'Ghost' does not currently exist..."));
    }

    #[test]
    fn filters_combine_and_report_invalid_operator() {
        // View → Filtered → Add (category = Polymer) → Add (yield_strength != 5)
        // → Apply → Done (filters) → Done (view) → Done (database).
        let script = "1\n4\n1\n2\n2\n1\n6\n!=\n5\n3\n5\n6\n3\n";
        let output = run_script(seeded_session(), script);

        assert!(output.contains("\tCategory = Polymer"));
        assert!(output.contains("Invalid Operator (!=): Must be [<, =, >, >=, <=]"));
        let applied = output.rsplit("Selection: ").nth(3).unwrap();
        assert!(applied.contains("HDPE"));
        assert!(!applied.contains("Steel-1020"));
    }

    #[test]
    fn sorted_listing_orders_descending() {
        // View → Sorted → column 3 (density) → "n" → Done, Done.
        let script = "1\n3\n3\nn\n6\n3\n";
        let output = run_script(seeded_session(), script);

        let steel = output.find("Steel-1020").unwrap();
        let hdpe = output.find("HDPE").unwrap();
        assert!(steel < hdpe);
    }

    #[test]
    fn category_summary_lists_every_category() {
        let script = "1\n5\n6\n3\n";
        let output = run_script(seeded_session(), script);
        assert!(output.contains("Averages"));
        for category in ["Metal", "Polymer", "Ceramic", "Composite", "Other"] {
            assert!(output.contains(category));
        }
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        let output = run_script(seeded_session(), "1\n");
        assert!(output.contains("Display Database: :memory:"));
    }

    #[test]
    fn main_menu_reports_missing_store() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.db");
        let script = format!("2\n{}\n3\n", missing.display());
        let io = Prompter::new(Cursor::new(script), Vec::new());
        let io = App::new(io).run_main().unwrap();
        let output = String::from_utf8(io.into_output()).unwrap();
        assert!(output.contains("does not currently exist..."));
    }

    #[test]
    fn main_menu_refuses_blank_create_target() {
        let io = Prompter::new(Cursor::new("1\n\n3\n"), Vec::new());
        let io = App::new(io).run_main().unwrap();
        let output = String::from_utf8(io.into_output()).unwrap();

        assert!(output.contains("Unable to create : `` is not a valid database path"));
        assert!(!output.contains("created..."));
    }

    #[test]
    fn main_menu_creates_then_opens_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("materials.db");
        let script = format!(
            "1\n{path}\n1\n{path}\n2\n{path}\n3\n3\n",
            path = path.display()
        );
        let io = Prompter::new(Cursor::new(script), Vec::new());
        let io = App::new(io).run_main().unwrap();
        let output = String::from_utf8(io.into_output()).unwrap();

        assert!(output.contains("created..."));
        assert!(output.contains("already exists..."));
        assert!(output.contains(&format!("Database: {}", path.display())));

        let session = EditorSession::open(&path).unwrap();
        assert_eq!(session.list_columns().unwrap().len(), Column::ALL.len());
    }
}
