//! `tradedesk orders` - list, show, reorder and summarize orders

use clap::Subcommand;
use console::style;
use miette::Result;
use tracing::debug;

use crate::cli::commands::browse::{self, BrowseArgs};
use crate::cli::commands::utils::{data_path, load_table, parse_id};
use crate::cli::filters::StatusFilter;
use crate::cli::helpers::split_values;
use crate::cli::output::effective_format;
use crate::cli::table::{print_item, print_list, TextTable};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::dataset;
use crate::core::{ColumnId, Config, DataTable, SortKey, Summary, TableOptions};
use crate::entities::{OrderStatus, Record};

#[derive(Subcommand, Debug)]
pub enum OrdersCommands {
    /// List orders with filtering, sorting and paging
    List(ListArgs),

    /// Show one order
    Show(ShowArgs),

    /// Move an order into another order's position
    Move(MoveArgs),

    /// Dashboard figures: counts, volume and value
    Summary,

    /// Interactive table session
    Browse(BrowseArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search every field (case-insensitive substring)
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Only these statuses
    #[arg(long, value_enum, value_delimiter = ',')]
    pub status: Vec<StatusFilter>,

    /// Only these categories (comma-separated)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Only these origin country codes (comma-separated)
    #[arg(long)]
    pub origin: Option<String>,

    /// Sort key as column[:asc|desc]; repeat to break ties
    #[arg(long)]
    pub sort: Vec<SortKey>,

    /// Page to show (1-based)
    #[arg(long, short = 'p', default_value_t = 1)]
    pub page: usize,

    /// Rows per page (10, 20, 30, 40 or 50)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Show every matching row instead of one page
    #[arg(long, short = 'a')]
    pub all: bool,

    /// Columns to hide (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub hide: Vec<ColumnId>,

    /// Show only the count of matching orders
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Order id
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct MoveArgs {
    /// Order to move
    pub id: String,

    /// Order whose position it takes
    pub target: String,
}

pub fn run(cmd: OrdersCommands, global: &GlobalOpts, config: &Config) -> Result<()> {
    match cmd {
        OrdersCommands::List(args) => run_list(args, global, config),
        OrdersCommands::Show(args) => run_show(args, global, config),
        OrdersCommands::Move(args) => run_move(args, global, config),
        OrdersCommands::Summary => run_summary(global, config),
        OrdersCommands::Browse(args) => browse::run(args, global, config),
    }
}

/// Status labels accepted by a set of status filters
fn status_labels(filters: &[StatusFilter], records: &[Record]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for filter in filters {
        match filter.labels() {
            Some(fixed) => labels.extend(fixed.iter().map(|l| l.to_string())),
            None => {
                labels.extend(
                    [OrderStatus::Processing, OrderStatus::OnHold, OrderStatus::InTransit]
                        .iter()
                        .map(|s| s.label().to_string()),
                );
                labels.extend(
                    records
                        .iter()
                        .filter(|r| filter.matches(&r.status))
                        .map(|r| r.status.label().to_string()),
                );
            }
        }
    }
    labels.sort();
    labels.dedup();
    labels
}

/// Apply list arguments to a freshly loaded table
fn apply_list_args(table: &mut DataTable, args: &ListArgs) {
    if let Some(search) = &args.search {
        table.set_query(search.as_str());
    }
    if !args.status.is_empty() {
        let labels = status_labels(&args.status, table.store().snapshot());
        table.set_column_filter(ColumnId::Status, labels);
    }
    if let Some(category) = &args.category {
        table.set_column_filter(ColumnId::Category, split_values(category));
    }
    if let Some(origin) = &args.origin {
        table.set_column_filter(ColumnId::Origin, split_values(origin));
    }
    for key in &args.sort {
        table.then_sort_by(key.column, key.direction);
    }
    for column in &args.hide {
        table.set_column_visible(*column, false);
    }
    table.set_page_index(args.page.saturating_sub(1) as isize);
}

/// Columns that carry text in a terminal listing
pub(crate) fn printable_columns(columns: &[ColumnId]) -> Vec<ColumnId> {
    columns
        .iter()
        .copied()
        .filter(|c| !matches!(c, ColumnId::Select | ColumnId::Actions))
        .collect()
}

pub(crate) fn text_table(columns: &[ColumnId], rows: &[&Record]) -> TextTable {
    let mut table = TextTable::new(columns.iter().map(|c| c.header()));
    for record in rows {
        table.push(columns.iter().map(|c| c.cell_text(record)));
    }
    table
}

fn run_list(args: ListArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let path = data_path(global, config);
    let options = TableOptions {
        page_size: args.page_size.unwrap_or_else(|| config.page_size()),
        ..config.table_options()
    };
    let mut table = load_table(&path, options)?;
    apply_list_args(&mut table, &args);

    if args.count {
        println!("{}", table.view().filtered_count);
        return Ok(());
    }

    let view = table.view();
    let rows: Vec<&Record> = if args.all {
        table.filtered_rows()
    } else {
        view.rows.clone()
    };
    debug!(
        filtered = view.filtered_count,
        shown = rows.len(),
        page = view.page_index,
        "orders listed"
    );

    let format = effective_format(global.output, true);
    if rows.is_empty() && matches!(format, OutputFormat::Table) {
        println!("No orders found.");
        return Ok(());
    }

    let columns = printable_columns(&view.columns);
    let text = text_table(&columns, &rows);
    let ids: Vec<String> = rows.iter().map(|r| r.id.to_string()).collect();
    print_list(format, &rows, &ids, &text)?;

    if matches!(format, OutputFormat::Table) && !global.quiet {
        let footer = if args.all {
            format!("{} order(s)", view.filtered_count)
        } else {
            format!("{} · {} order(s)", view.page_label(), view.filtered_count)
        };
        println!("{}", style(footer).dim());
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let id = parse_id(&args.id)?;
    let path = data_path(global, config);
    let store = dataset::load_store(&path)?;
    let record = store
        .get(id)
        .ok_or_else(|| miette::miette!("No order with id {}", id))?;

    match effective_format(global.output, false) {
        OutputFormat::Table => {
            let mut text = TextTable::new(["Field", "Value"]);
            for column in ColumnId::ALL.iter().filter(|c| c.is_data()) {
                text.push([column.header().to_string(), column.cell_text(record)]);
            }
            println!("{}", text.render());
        }
        OutputFormat::Id => println!("{}", record.id),
        format => print_item(format, record)?,
    }
    Ok(())
}

fn run_move(args: MoveArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let id = parse_id(&args.id)?;
    let target = parse_id(&args.target)?;
    let path = data_path(global, config);
    let mut table = load_table(&path, config.table_options())?;

    if !table.store().contains(id) {
        return Err(miette::miette!("No order with id {}", id));
    }
    if !table.store().contains(target) {
        return Err(miette::miette!("No order with id {}", target));
    }

    let moved = table
        .move_row(id, target)
        .map_err(|outcome| {
            miette::miette!(
                help = "Run `orders list` without --sort, or set reorder_policy: clear-sort",
                "Cannot move order {}: {}",
                id,
                outcome
            )
        })?;
    if !moved {
        if !global.quiet {
            println!("Order {} is already in place", id);
        }
        return Ok(());
    }

    let position = table.store().position(id).map_or(0, |p| p + 1);
    dataset::save_records(&path, table.store().snapshot())?;

    if !global.quiet {
        println!(
            "{} Moved order {} to position {} in {}",
            style("✓").green(),
            style(id).cyan(),
            position,
            style(path.display()).dim()
        );
    }
    Ok(())
}

fn run_summary(global: &GlobalOpts, config: &Config) -> Result<()> {
    let path = data_path(global, config);
    let store = dataset::load_store(&path)?;
    let summary = Summary::from_records(store.snapshot());

    match effective_format(global.output, true) {
        format @ (OutputFormat::Json | OutputFormat::Yaml) => print_item(format, &summary)?,
        format => {
            let cards = summary.cards();
            let mut text = TextTable::new(["Metric", "Value"]);
            for (title, value) in &cards {
                text.push([title.to_string(), value.clone()]);
            }
            let titles: Vec<String> = cards.iter().map(|(t, _)| t.to_string()).collect();
            print_list(format, &cards, &titles, &text)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels_for_active_include_custom_labels() {
        let records = vec![
            Record::new(1, "A").with_status("Delivered"),
            Record::new(2, "B").with_status("Pending Review"),
        ];
        let labels = status_labels(&[StatusFilter::Active], &records);
        assert!(labels.contains(&"Pending Review".to_string()));
        assert!(labels.contains(&"On Hold".to_string()));
        assert!(!labels.contains(&"Delivered".to_string()));

        let labels = status_labels(&[StatusFilter::Delivered, StatusFilter::OnHold], &records);
        assert_eq!(labels, vec!["Delivered", "On Hold"]);
    }

    #[test]
    fn test_printable_columns_drop_widgets() {
        let columns = printable_columns(&ColumnId::ALL);
        assert!(!columns.contains(&ColumnId::Select));
        assert!(!columns.contains(&ColumnId::Actions));
        assert_eq!(columns[0], ColumnId::Drag);
    }
}
