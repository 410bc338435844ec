use std::io::{self, Write};
use chrono::{Duration, NaiveDate};
use polars::prelude::{AnyValue, DataFrame};
use wbs_scheduler::{
    MIN_EFFORT, ProjectInfo, Schedule, logging, save_tasks_to_json, save_wbs_to_csv,
    tasks_to_dataframe,
};

fn cell_text(av: &AnyValue) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::Float64(v) => format!("{}", (v * 1000.0).round() / 1000.0),
        AnyValue::String(s) => s.to_string(),
        AnyValue::Date(days) => (NaiveDate::default() + Duration::days(*days as i64)).to_string(),
        _ => av.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default())
            .collect();
        cells.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &cells {
        for (ci, s) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(s.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| {
        let mut line = String::from("|");
        for (ci, s) in values.iter().enumerate() {
            line.push(' ');
            line.push_str(s);
            line.push_str(&" ".repeat(widths[ci].saturating_sub(s.chars().count())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&col_names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_schedule(schedule: &Schedule) -> String {
    match tasks_to_dataframe(schedule.tasks()) {
        Ok(df) => render_df_as_text_table(&df),
        Err(e) => format!("Render error: {}", e),
    }
}

fn print_help() {
    println!(
        "Commands:\n  help                                          Show this help\n  generate <ticket> <developer> <ba> <YYYY-MM-DD>\n                                                Build the six-task WBS\n  show                                          Show current schedule\n  effort   <id> <days>                          Set effort (min 0.1) and recompute\n  pct      <id> <text...>                       Set % complete\n  resource <id> <name...>                       Set resource name\n  summary                                       Effort per phase\n  unscheduled                                   Tasks without dates and why\n  export csv|json <path>                        Write the WBS sheet or task set\n  quit|exit                                     Exit"
    );
}

fn main() {
    logging::init_logging(tracing::Level::WARN);

    let mut schedule: Option<Schedule> = None;

    println!("WBS Scheduler (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() { continue; }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "generate" => {
                let ticket = parts.next().unwrap_or("");
                let developer = parts.next().unwrap_or("");
                let ba = parts.next().unwrap_or("");
                let start = parts.next().and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
                let project = ProjectInfo {
                    ticket_id: ticket.to_string(),
                    developer: developer.to_string(),
                    ba: ba.to_string(),
                    start_date: start,
                };
                match Schedule::generate(project) {
                    Ok(generated) => {
                        println!("Schedule generated.\n{}", render_schedule(&generated));
                        schedule = Some(generated);
                    }
                    Err(e) => println!("Please fill in all required fields ({})", e),
                }
            }
            _ => {
                let Some(current) = schedule.as_mut() else {
                    if matches!(cmd, "show" | "effort" | "pct" | "resource" | "summary" | "unscheduled" | "export") {
                        println!("No schedule yet. Run 'generate' first.");
                    } else {
                        println!("Unknown command. Type 'help'.");
                    }
                    continue;
                };
                run_schedule_command(current, cmd, parts.collect());
            }
        }
    }
}

fn run_schedule_command(schedule: &mut Schedule, cmd: &str, args: Vec<&str>) {
    match cmd {
        "show" => println!("{}", render_schedule(schedule)),
        "effort" => match (args.first(), args.get(1)) {
            (Some(id), Some(value)) => {
                let days: f64 = value.parse().unwrap_or(MIN_EFFORT);
                match schedule.update_effort(id, days) {
                    Ok(_) => println!("Effort updated.\n{}", render_schedule(schedule)),
                    Err(e) => println!("Error: {}", e),
                }
            }
            _ => println!("Usage: effort <id> <days>"),
        },
        "pct" | "resource" => {
            if args.len() < 2 {
                println!("Usage: {} <id> <text...>", cmd);
                return;
            }
            let text = args[1..].join(" ");
            let res = if cmd == "pct" {
                schedule.set_percent_complete(args[0], text).map(|_| ())
            } else {
                schedule.set_resource_name(args[0], text).map(|_| ())
            };
            match res {
                Ok(_) => println!("{} set.\n{}", cmd, render_schedule(schedule)),
                Err(e) => println!("Error: {}", e),
            }
        }
        "summary" => println!("{}", schedule.summary().to_cli_summary()),
        "unscheduled" => {
            let unscheduled = schedule.unscheduled();
            if unscheduled.is_empty() {
                println!("All tasks scheduled.");
            }
            for entry in unscheduled {
                println!("{}: {}", entry.id, entry.issue);
            }
        }
        "export" => match (args.first().copied(), args.get(1)) {
            (Some(kind @ ("csv" | "json")), Some(path)) => {
                let res = if kind == "csv" {
                    save_wbs_to_csv(schedule.project(), schedule.tasks(), path)
                } else {
                    save_tasks_to_json(schedule.project(), schedule.tasks(), path)
                };
                match res {
                    Ok(_) => println!("Exported {} to {}", kind, path),
                    Err(e) => println!("Export error: {}", e),
                }
            }
            _ => println!("Usage: export csv|json <path>"),
        },
        _ => println!("Unknown command. Type 'help'."),
    }
}
