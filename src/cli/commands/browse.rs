//! `tradedesk orders browse` - a line-oriented table session
//!
//! Each input line is one UI event (search, filter, sort, page, select, drag)
//! applied to the data table, which is then redrawn. Input comes from a
//! prompt on a terminal, or one command per line from piped stdin.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use miette::{IntoDiagnostic, Result};
use tracing::{debug, info};

use crate::cli::commands::orders::{printable_columns, text_table};
use crate::cli::commands::utils::{data_path, load_table};
use crate::cli::helpers::{is_interactive, split_values};
use crate::cli::table::TextTable;
use crate::cli::GlobalOpts;
use crate::core::dataset;
use crate::core::{
    ColumnId, Config, DataTable, DragStart, SelectAllState, SortKey, Summary, TableOptions,
};

#[derive(clap::Args, Debug)]
pub struct BrowseArgs {
    /// Write reordered rows back to the dataset on exit
    #[arg(long)]
    pub save: bool,

    /// Rows per page (10, 20, 30, 40 or 50)
    #[arg(long)]
    pub page_size: Option<usize>,
}

/// Page navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMove {
    First,
    Previous,
    Next,
    Last,
    /// 1-based page number
    To(usize),
}

/// One session command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    /// Global search; empty clears it
    Search(String),
    /// Column filter; no values clears it
    Filter { column: ColumnId, values: Vec<String> },
    ClearFilters,
    /// Replace the sort with one key
    Sort(SortKey),
    /// Add a tie-break key
    ThenSort(SortKey),
    /// Header click: asc, desc, off
    Toggle(ColumnId),
    Unsort,
    Page(PageMove),
    PageSize(usize),
    /// Toggle row checkboxes
    Select(Vec<u32>),
    /// Header checkbox over every filtered row
    SelectAll(bool),
    /// List the selected rows
    Selected,
    Hide(ColumnId),
    Show(ColumnId),
    /// View-menu checkbox: flip a column's visibility
    Column(ColumnId),
    Drag(u32),
    Over(Option<u32>),
    Drop,
    Cancel,
    Move { id: u32, target: u32 },
    Summary,
    Save,
    Help,
    Quit,
}

const HELP: &str = "\
Commands:
  search <text>             search every field (no text clears)
  filter <column> <a,b,..>  keep rows whose column is one of the values (no values clears)
  clear                     remove search and column filters
  sort <column>[:desc]      sort by one column
  then <column>[:desc]      add a tie-break sort key
  toggle <column>           cycle a column through asc, desc, off
  unsort                    back to base order
  n | p | first | last      page navigation; page <n> jumps
  size <n>                  rows per page (10, 20, 30, 40, 50)
  select <id> [id..]        toggle row selection
  select all | none         select or clear every filtered row
  selected                  list the selected rows
  hide <column> / show <column>, column <column> flips it
  drag <id>, over <id>, drop, cancel   drag a row; move <id> <target> does all four
  summary                   dashboard figures
  save                      write the current row order to the dataset
  quit";

fn parse_id(raw: &str) -> std::result::Result<u32, String> {
    raw.trim_start_matches('#')
        .parse::<u32>()
        .map_err(|_| format!("Invalid row id: {}", raw))
}

impl std::str::FromStr for BrowseCommand {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let line = s.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        let cmd = match word.to_lowercase().as_str() {
            "search" | "/" => BrowseCommand::Search(rest.to_string()),
            "filter" => {
                let (column, values) = match rest.split_once(char::is_whitespace) {
                    Some((column, values)) => (column, split_values(values)),
                    None if !rest.is_empty() => (rest, Vec::new()),
                    None => return Err("Usage: filter <column> <value,value,..>".to_string()),
                };
                BrowseCommand::Filter {
                    column: column.parse()?,
                    values,
                }
            }
            "clear" => BrowseCommand::ClearFilters,
            "sort" => BrowseCommand::Sort(rest.parse()?),
            "then" => BrowseCommand::ThenSort(rest.parse()?),
            "toggle" => BrowseCommand::Toggle(rest.parse()?),
            "unsort" => BrowseCommand::Unsort,
            "n" | "next" => BrowseCommand::Page(PageMove::Next),
            "p" | "prev" | "previous" => BrowseCommand::Page(PageMove::Previous),
            "first" => BrowseCommand::Page(PageMove::First),
            "last" => BrowseCommand::Page(PageMove::Last),
            "page" => {
                let n = rest
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid page: {}", rest))?;
                BrowseCommand::Page(PageMove::To(n))
            }
            "size" => BrowseCommand::PageSize(
                rest.parse::<usize>()
                    .map_err(|_| format!("Invalid page size: {}", rest))?,
            ),
            "select" => match args.as_slice() {
                ["all"] => BrowseCommand::SelectAll(true),
                ["none"] => BrowseCommand::SelectAll(false),
                [] => return Err("Usage: select <id> [id..] | all | none".to_string()),
                ids => BrowseCommand::Select(
                    ids.iter()
                        .map(|id| parse_id(id))
                        .collect::<std::result::Result<_, _>>()?,
                ),
            },
            "hide" => BrowseCommand::Hide(rest.parse()?),
            "show" => BrowseCommand::Show(rest.parse()?),
            "column" => BrowseCommand::Column(rest.parse()?),
            "selected" => BrowseCommand::Selected,
            "drag" => BrowseCommand::Drag(parse_id(rest)?),
            "over" => BrowseCommand::Over(if rest.is_empty() {
                None
            } else {
                Some(parse_id(rest)?)
            }),
            "drop" => BrowseCommand::Drop,
            "cancel" => BrowseCommand::Cancel,
            "move" => match args.as_slice() {
                [id, target] => BrowseCommand::Move {
                    id: parse_id(id)?,
                    target: parse_id(target)?,
                },
                _ => return Err("Usage: move <id> <target>".to_string()),
            },
            "summary" => BrowseCommand::Summary,
            "save" => BrowseCommand::Save,
            "help" | "?" => BrowseCommand::Help,
            "quit" | "q" | "exit" => BrowseCommand::Quit,
            _ => return Err(format!("Unknown command: {} (type 'help')", word)),
        };
        Ok(cmd)
    }
}

/// What the session should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Redraw the table
    Redraw,
    /// Print a message, then redraw
    Message(String),
    /// Print text without redrawing
    Text(String),
    Save,
    Quit,
}

/// Apply one command to the table
pub fn execute(table: &mut DataTable, cmd: BrowseCommand) -> Response {
    debug!(?cmd, "browse command");
    match cmd {
        BrowseCommand::Search(query) => table.set_query(query),
        BrowseCommand::Filter { column, values } => {
            if !table.set_column_filter(column, values) {
                return Response::Message(format!("Column '{}' cannot be filtered", column));
            }
        }
        BrowseCommand::ClearFilters => table.clear_filters(),
        BrowseCommand::Sort(key) => {
            table.sort_by(key.column, key.direction);
        }
        BrowseCommand::ThenSort(key) => {
            table.then_sort_by(key.column, key.direction);
        }
        BrowseCommand::Toggle(column) => {
            if !table.toggle_sort(column) {
                return Response::Message(format!("Column '{}' cannot be sorted", column));
            }
        }
        BrowseCommand::Unsort => table.clear_sort(),
        BrowseCommand::Page(PageMove::First) => table.first_page(),
        BrowseCommand::Page(PageMove::Previous) => table.previous_page(),
        BrowseCommand::Page(PageMove::Next) => table.next_page(),
        BrowseCommand::Page(PageMove::Last) => table.last_page(),
        BrowseCommand::Page(PageMove::To(n)) => table.set_page_index(n as isize - 1),
        BrowseCommand::PageSize(size) => {
            if let Err(e) = table.set_page_size(size) {
                return Response::Message(e.to_string());
            }
        }
        BrowseCommand::Select(ids) => {
            if let Some(missing) = ids.iter().find(|id| !table.store().contains(**id)) {
                return Response::Message(format!("No row with id {}", missing));
            }
            for id in ids {
                table.toggle_row(id);
            }
        }
        BrowseCommand::Selected => {
            let rows = table.selected_rows();
            if rows.is_empty() {
                return Response::Text("No rows selected.".to_string());
            }
            let columns = printable_columns(&table.view().columns);
            return Response::Text(text_table(&columns, &rows).render());
        }
        BrowseCommand::SelectAll(on) => table.toggle_all(on),
        BrowseCommand::Hide(column) => {
            if !column.is_hideable() {
                return Response::Message(format!("Column '{}' is always shown", column));
            }
            table.set_column_visible(column, false);
        }
        BrowseCommand::Show(column) => table.set_column_visible(column, true),
        BrowseCommand::Column(column) => {
            if !column.is_hideable() {
                return Response::Message(format!("Column '{}' is always shown", column));
            }
            table.toggle_column(column);
        }
        BrowseCommand::Drag(id) => {
            let outcome = table.drag_start(id);
            if let Some(msg) = drag_message(outcome, id) {
                return Response::Message(msg);
            }
        }
        BrowseCommand::Over(over) => {
            table.drag_move(over);
            // Hovering is visual only; the table does not change
            return Response::Text(match over {
                Some(id) => format!("over #{}", id),
                None => "over nothing".to_string(),
            });
        }
        BrowseCommand::Drop => {
            if !table.reorder().is_dragging() {
                return Response::Message("Nothing is being dragged".to_string());
            }
            table.drag_end();
        }
        BrowseCommand::Cancel => table.drag_cancel(),
        BrowseCommand::Move { id, target } => {
            if let Err(outcome) = table.move_row(id, target) {
                let msg = drag_message(outcome, id)
                    .unwrap_or_else(|| format!("Cannot move row {}", id));
                return Response::Message(msg);
            }
        }
        BrowseCommand::Summary => {
            let summary = Summary::from_records(table.store().snapshot());
            let mut text = TextTable::new(["Metric", "Value"]);
            for (title, value) in summary.cards() {
                text.push([title.to_string(), value]);
            }
            return Response::Text(text.render());
        }
        BrowseCommand::Save => return Response::Save,
        BrowseCommand::Help => return Response::Text(HELP.to_string()),
        BrowseCommand::Quit => return Response::Quit,
    }
    Response::Redraw
}

/// What to tell the user about a drag start, if anything
fn drag_message(outcome: DragStart, id: u32) -> Option<String> {
    match outcome {
        DragStart::Started => None,
        DragStart::UnknownRow => Some(format!("No row with id {}", id)),
        other => Some(capitalize(&other.to_string())),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn checkbox(state: SelectAllState) -> &'static str {
    match state {
        SelectAllState::Checked => "[x]",
        SelectAllState::Indeterminate => "[-]",
        SelectAllState::Unchecked => "[ ]",
    }
}

/// Text of the current page with checkboxes and the pager footer
pub fn render(table: &DataTable) -> String {
    let view = table.view();
    let mut columns = printable_columns(&view.columns);
    columns.insert(0, ColumnId::Select);

    let headers = columns.iter().map(|c| match c {
        ColumnId::Select => checkbox(view.select_all).to_string(),
        other => {
            let arrow = match table.sort().direction(*other) {
                Some(crate::core::SortDirection::Asc) => " ↑",
                Some(crate::core::SortDirection::Desc) => " ↓",
                None => "",
            };
            format!("{}{}", other.header(), arrow)
        }
    });
    let mut text = TextTable::new(headers);
    let dragged = table.reorder().dragged();
    for record in &view.rows {
        text.push(columns.iter().map(|c| match c {
            ColumnId::Select => {
                let mark = if table.is_selected(record.id) { "[x]" } else { "[ ]" };
                mark.to_string()
            }
            ColumnId::Drag if dragged == Some(record.id) => format!("≡ {}", record.id),
            other => other.cell_text(record),
        }));
    }

    let mut out = if view.rows.is_empty() {
        "No results.".to_string()
    } else {
        text.render()
    };
    out.push('\n');
    out.push_str(&format!("{}   {}", view.selection_label(), view.page_label()));
    if !view.drag_enabled {
        out.push_str("   (sorted: drag disabled)");
    }
    if let Some(id) = dragged {
        out.push_str(&format!("\ndragging #{}", id));
        if let Some(over) = table.reorder().over() {
            out.push_str(&format!(" over #{}", over));
        }
    }
    out
}

/// Feed lines from `next_line` into the table until it runs dry or quits
pub fn session_loop<F, W>(
    table: &mut DataTable,
    mut next_line: F,
    out: &mut W,
    save_path: Option<&Path>,
) -> Result<()>
where
    F: FnMut() -> io::Result<Option<String>>,
    W: Write,
{
    writeln!(out, "{}", render(table)).into_diagnostic()?;

    while let Some(line) = next_line().into_diagnostic()? {
        if line.trim().is_empty() {
            continue;
        }
        let cmd = match line.parse::<BrowseCommand>() {
            Ok(cmd) => cmd,
            Err(e) => {
                writeln!(out, "{}", style(e).red()).into_diagnostic()?;
                continue;
            }
        };

        match execute(table, cmd) {
            Response::Redraw => writeln!(out, "{}", render(table)).into_diagnostic()?,
            Response::Message(msg) => {
                writeln!(out, "{}", style(msg).yellow()).into_diagnostic()?;
                writeln!(out, "{}", render(table)).into_diagnostic()?;
            }
            Response::Text(text) => writeln!(out, "{}", text).into_diagnostic()?,
            Response::Save => match save_path {
                Some(path) => {
                    dataset::save_records(path, table.store().snapshot())?;
                    writeln!(out, "Saved row order to {}", path.display()).into_diagnostic()?;
                }
                None => {
                    writeln!(out, "{}", style("Start with --save to write changes").yellow())
                        .into_diagnostic()?;
                }
            },
            Response::Quit => break,
        }
    }
    Ok(())
}

pub fn run(args: BrowseArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let path: PathBuf = data_path(global, config);
    let options = TableOptions {
        page_size: args.page_size.unwrap_or_else(|| config.page_size()),
        ..config.table_options()
    };
    let mut table = load_table(&path, options)?;
    let original_order = table.store().ids();
    let save_path = args.save.then_some(path.as_path());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if is_interactive() {
        let theme = ColorfulTheme::default();
        writeln!(out, "{}", style("Type 'help' for commands, 'quit' to leave").dim())
            .into_diagnostic()?;
        session_loop(
            &mut table,
            || {
                Input::<String>::with_theme(&theme)
                    .with_prompt("orders")
                    .allow_empty(true)
                    .interact_text()
                    .map(Some)
                    .map_err(|e| io::Error::other(e.to_string()))
            },
            &mut out,
            save_path,
        )?;
    } else {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        session_loop(&mut table, || lines.next().transpose(), &mut out, save_path)?;
    }

    if let Some(path) = save_path {
        if table.store().ids() != original_order {
            dataset::save_records(path, table.store().snapshot())?;
            info!(path = %path.display(), "row order saved");
        }
    }
    Ok(())
}
