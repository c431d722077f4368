//! Human-readable rendering of navigation snapshots.

use std::fmt::Write;

use pagestack::NavigationSnapshot;

/// One page of a snapshot, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PageRow {
    depth: usize,
    index: usize,
    view_type: String,
    title: String,
    page: String,
}

fn page_rows(snapshot: &NavigationSnapshot) -> Vec<PageRow> {
    snapshot
        .contexts
        .iter()
        .enumerate()
        .flat_map(|(depth, context)| {
            context.pages.iter().enumerate().map(move |(index, page)| PageRow {
                depth,
                index,
                view_type: page.view_type.clone(),
                title: page.title.clone().unwrap_or_else(|| "-".to_string()),
                page: page.id.to_string(),
            })
        })
        .collect()
}

/// Lay `rows` out under a header, one line per page.
///
/// Depth and index are right-aligned; the page id closes the line unpadded.
fn render_rows(rows: &[PageRow]) -> String {
    let view_width = rows
        .iter()
        .map(|r| r.view_type.len())
        .chain(["VIEW".len()])
        .max()
        .unwrap_or_default();
    let title_width = rows
        .iter()
        .map(|r| r.title.len())
        .chain(["TITLE".len()])
        .max()
        .unwrap_or_default();

    let mut out = format!(
        "CONTEXT  INDEX  {:<view_width$}  {:<title_width$}  PAGE\n",
        "VIEW", "TITLE"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:>7}  {:>5}  {:<view_width$}  {:<title_width$}  {}",
            row.depth, row.index, row.view_type, row.title, row.page
        );
    }
    out
}

/// Print every page of every context, root first, then a one-line summary.
pub fn print_snapshot(snapshot: &NavigationSnapshot) {
    let rows = page_rows(snapshot);
    if !rows.is_empty() {
        print!("{}", render_rows(&rows));
        println!();
    }
    println!(
        "Contexts: {}  Modals: {}  Pending transitions: {}",
        snapshot.depth(),
        snapshot.modals.len(),
        snapshot.pending_transitions
    );
}
