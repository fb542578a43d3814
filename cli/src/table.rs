use chrono::{DateTime, Local, Utc};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tasklist_core::{Priority, Task, TaskStats};

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "St")]
    status: String,
    #[tabled(rename = "Pri")]
    priority: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Task")]
    text: String,
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Count")]
    count: usize,
}

pub fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::None => "-",
        Priority::Medium => "M",
        Priority::High => "H",
    }
}

pub fn short_id(task: &Task) -> String {
    task.id.to_string()[..8].to_string()
}

fn format_due(due: Option<DateTime<Utc>>) -> String {
    due.map(|d| d.with_timezone(&Local).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Positions are 1-based indices into the full list so they line up
/// with the `move` command even when the view is filtered.
pub fn render_tasks<'a>(tasks: impl IntoIterator<Item = (usize, &'a Task)>) -> String {
    let rows: Vec<TaskRow> = tasks
        .into_iter()
        .map(|(index, task)| TaskRow {
            position: index + 1,
            id: short_id(task),
            status: if task.completed { "✔" } else { "☐" }.to_string(),
            priority: priority_label(task.priority).to_string(),
            due: format_due(task.due_date),
            text: task.text.clone(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn render_stats(stats: &TaskStats) -> String {
    let rows = vec![
        StatRow { metric: "Total", count: stats.total },
        StatRow { metric: "Completed", count: stats.completed },
        StatRow { metric: "Active", count: stats.active },
        StatRow { metric: "High priority", count: stats.high_priority },
        StatRow { metric: "Overdue", count: stats.overdue },
    ];
    Table::new(rows).with(Style::rounded()).to_string()
}
