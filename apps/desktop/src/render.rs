use std::io::{self, Write};

use task_core::{view::EMPTY_STATE_MESSAGE, TaskListView, TextStyle};

pub fn render_view(view: &TaskListView, out: &mut impl Write) -> io::Result<()> {
    if view.show_empty_state {
        writeln!(out, "{EMPTY_STATE_MESSAGE}")?;
    }
    for row in &view.rows {
        let mark = if row.completed { 'x' } else { ' ' };
        let text = match row.style {
            TextStyle::Normal => row.text.clone(),
            TextStyle::Completed => strike(&row.text),
        };
        writeln!(out, "[{mark}] {:>13}  {text}", row.id)?;
    }
    writeln!(
        out,
        "{}  {}",
        view.counts.total_label(),
        view.counts.completed_label()
    )
}

/// Combining long stroke overlay, so completed text reads as crossed out.
fn strike(text: &str) -> String {
    text.chars().flat_map(|c| [c, '\u{0336}']).collect()
}
