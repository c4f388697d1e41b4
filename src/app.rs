//! Headless one-shot runtime: load a module, apply the query from the
//! command line, run the requested bulk actions, and print the resulting
//! window.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::mpsc;

use crate::args::{Args, Module};
use crate::config::Settings;
use crate::dialer::{CallProgress, Dialer, DialerOptions, SimulatedCaller};
use crate::session::ModuleSession;
use crate::sources::backend_for;
use crate::state::{FacetFilter, PageSize, Record, SortDirection, Task, TeamMember};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// What: Run one headless pass for the module selected on the command line.
///
/// Inputs:
/// - `args`: Parsed command line
///
/// Output:
/// - `Ok(())` after printing the table.
///
/// # Errors
/// - Returns `Err` for flag values the engine cannot use: an unsupported
///   page size, a malformed facet, or an unknown column
///
/// Details:
/// - Settings come from `settings.conf` plus the environment; `--offline`
///   forces the local backend on top of both.
pub async fn run(args: Args) -> Result<()> {
    let mut settings = crate::config::settings();
    if args.offline {
        settings.offline = true;
    }
    match args.module {
        Module::Team => run_module::<TeamMember>(&args, &settings, TeamMember::sample_roster()).await,
        Module::Tasks => run_module::<Task>(&args, &settings, Vec::new()).await,
    }
}

async fn run_module<R>(args: &Args, settings: &Settings, local_seed: Vec<R>) -> Result<()>
where
    R: Record + DeserializeOwned,
{
    let source = backend_for::<R>(settings, local_seed);
    let mut session = ModuleSession::new(source);
    session.refresh().await;

    apply_query(&mut session, args, settings)?;
    for id in &args.select {
        session.table.selection.toggle(id);
    }

    if args.delete_selected {
        let selected = session.table.selection.len();
        match session.delete_selected().await {
            Ok(()) => {
                if selected > 0 {
                    println!("Deleted {selected} records");
                }
            }
            Err(err) => println!("Delete failed: {err}"),
        }
    }

    if args.call_selected {
        run_call_batch(&mut session, settings).await;
    }

    print_table(&session);
    Ok(())
}

/// Fold the command-line query flags into the session's table state.
///
/// Order matters: page size and filters first, the page jump last, so the
/// requested page clamps against the final filtered count.
fn apply_query<R: Record>(
    session: &mut ModuleSession<R>,
    args: &Args,
    settings: &Settings,
) -> Result<()> {
    let table = &mut session.table;
    table.set_page_size(settings.page_size);
    if let Some(rows) = args.page_size {
        let Some(size) = PageSize::from_rows(rows) else {
            return Err(format!("unsupported page size {rows}; choose 10, 25, 50 or 100").into());
        };
        table.set_page_size(size);
    }
    if let Some(search) = &args.search {
        table.set_search(search.clone());
    }
    for raw in &args.facets {
        let Some((key, value)) = raw.split_once('=') else {
            return Err(format!("facet `{raw}` is not COLUMN=VALUE").into());
        };
        let Some(field) = R::field_from_key(key) else {
            return Err(format!("unknown column `{}` for this module", key.trim()).into());
        };
        if !R::FACET_FIELDS.contains(&field) {
            return Err(format!("column `{}` cannot be filtered exactly", key.trim()).into());
        }
        table.set_facet(field, FacetFilter::Exact(value.trim().to_string()));
    }
    if let Some(sort_key) = &args.sort {
        let Some(field) = R::field_from_key(sort_key) else {
            return Err(format!("unknown sort column `{sort_key}` for this module").into());
        };
        table.query.sort_field = field;
    }
    table.query.sort_direction = if args.desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    table.set_page(args.page);
    Ok(())
}

/// Run the call batch over the current selection, printing progress lines
/// as the snapshots arrive and a summary at the end.
async fn run_call_batch<R: Record>(session: &mut ModuleSession<R>, settings: &Settings) {
    let caller = Arc::new(SimulatedCaller::new(Duration::from_millis(
        settings.call_delay_ms,
    )));
    let options = DialerOptions {
        max_in_flight: settings.call_max_in_flight.max(1),
        failure_policy: settings.call_failure_policy,
    };
    let mut dialer = Dialer::new(caller, options);
    let (tx, mut rx) = mpsc::unbounded_channel::<CallProgress>();
    let printer = tokio::spawn(async move {
        while let Some(snapshot) = rx.recv().await {
            println!(
                "Calling... {:.0}% ({}/{})",
                snapshot.percent(),
                snapshot.completed,
                snapshot.total
            );
        }
    });
    let report = session.call_selected(&mut dialer, &tx).await;
    drop(tx);
    let _ = printer.await;
    if report.requested > 0 {
        let suffix = if report.aborted { " (aborted)" } else { "" };
        println!(
            "Calls: {} placed, {} failed{suffix}",
            report.completed,
            report.failed.len()
        );
        for (id, err) in &report.failed {
            println!("  {id}: {err}");
        }
    }
}

/// Print the derived window as a tab-separated table with the footer line.
fn print_table<R: Record>(session: &ModuleSession<R>) {
    let view = session.view();
    let mut header: Vec<&str> = Vec::with_capacity(R::COLUMNS.len() + 1);
    header.push("sel");
    for field in R::COLUMNS {
        header.push(R::field_key(*field));
    }
    println!("{}", header.join("\t"));
    for row in &view.rows {
        let mut cells: Vec<&str> = Vec::with_capacity(R::COLUMNS.len() + 1);
        cells.push(if session.table.selection.contains(row.id()) {
            "[x]"
        } else {
            "[ ]"
        });
        for field in R::COLUMNS {
            cells.push(row.field_text(*field).unwrap_or_default());
        }
        println!("{}", cells.join("\t"));
    }
    println!(
        "Total {} records | {} of {} Pages",
        view.filtered_count, view.page, view.total_pages
    );
}
