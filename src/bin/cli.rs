use std::io::{self, Write};
use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use clap::Parser;
use nexflow::logging::{self, LogLevel};
use nexflow::persistence::{
    load_schedule_from_csv, load_schedule_from_json, save_schedule_to_csv, save_schedule_to_json,
};
use nexflow::report::{format_timestamp, render_text_table, render_timeline, schedule_frame};
use nexflow::{Schedule, ScheduleConfig, ScheduleError};

#[derive(Debug, Parser)]
#[command(name = "nexflow", about = "Interactive task scheduler")]
struct Args {
    /// TOML configuration file (falls back to NEXFLOW_CONFIG).
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show current schedule\n  timeline [width]                   Show a text Gantt chart (default width 40)\n  tasks                              List submitted task records\n  add <name> <hours> [dependency]    Submit a task\n  done <name>                        Mark a task completed\n  undo <name>                        Clear a task's completion flag\n  summary                            Count tasks per status\n  meta show                          Show project metadata\n  meta name <text...>                Update project name\n  meta desc <text...>                Update project description\n  save <json|csv> <path>             Persist session to disk\n  load <json|csv> <path>             Load session from disk\n  quit|exit                          Exit\n\nTask names are single words."
    );
}

fn print_metadata(schedule: &Schedule) {
    let metadata = schedule.metadata();
    println!("Project name       : {}", metadata.project_name);
    println!("Project description: {}", metadata.project_description);
    println!("Session started    : {}", format_timestamp(metadata.session_started));
}

fn print_schedule(schedule: &Schedule) {
    let entries = match schedule.compute(now()) {
        Ok(entries) => entries,
        Err(ScheduleError::InvalidDependencyGraph { cycle }) => {
            println!(
                "Invalid dependency graph: {}. Fix the dependencies to see a schedule.",
                cycle.join(" -> ")
            );
            return;
        }
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };
    if entries.is_empty() {
        println!("No tasks to schedule.");
        return;
    }
    match schedule_frame(&entries) {
        Ok(df) => println!("{}", render_text_table(&df)),
        Err(e) => println!("Error rendering schedule: {}", e),
    }
}

const DEFAULT_TIMELINE_WIDTH: usize = 40;

fn print_timeline(schedule: &Schedule, width: usize) {
    match schedule.compute(now()) {
        Ok(entries) if entries.is_empty() => println!("No tasks to schedule."),
        Ok(entries) => print!("{}", render_timeline(&entries, width)),
        Err(e) => println!("Error: {}", e),
    }
}

fn print_tasks(schedule: &Schedule) {
    if schedule.tasks().is_empty() {
        println!("No tasks submitted.");
        return;
    }
    for (idx, task) in schedule.tasks().iter().enumerate() {
        let hours = task
            .duration_hours
            .map(|h| h.to_string())
            .unwrap_or_else(|| "-".to_string());
        let done = if schedule.completed().contains(&task.name) { " [done]" } else { "" };
        match task.dependency_name() {
            Some(dep) => println!("{:>3}. {} ({}h) after {}{}", idx + 1, task.name, hours, dep, done),
            None => println!("{:>3}. {} ({}h){}", idx + 1, task.name, hours, done),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_logging(args.log_level)?;
    let config = ScheduleConfig::load_or_default(args.config.as_deref())?;
    let mut schedule = Schedule::with_config(config);

    println!("NexFlow (CLI) - type 'help' for commands\n");

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
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => print_schedule(&schedule),
            "timeline" => match parts.next().map(str::parse::<usize>) {
                None => print_timeline(&schedule, DEFAULT_TIMELINE_WIDTH),
                Some(Ok(width)) if width > 0 => print_timeline(&schedule, width),
                Some(_) => println!("Usage: timeline [width]"),
            },
            "tasks" => print_tasks(&schedule),
            "add" => {
                let name = parts.next();
                let hours_s = parts.next();
                let dependency = parts.next();
                match (name, hours_s) {
                    (Some(name), Some(hours_s)) => {
                        let hours: f64 = match hours_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid hours");
                                continue;
                            }
                        };
                        match schedule.add(name, hours, dependency) {
                            Ok(_) => {
                                println!("Task added.");
                                print_schedule(&schedule);
                            }
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: add <name> <hours> [dependency]"),
                }
            }
            "done" => {
                let Some(name) = parts.next() else {
                    println!("Usage: done <name>");
                    continue;
                };
                match schedule.mark_done(name, now()) {
                    Ok(_) => {
                        println!("'{}' marked as completed.", name);
                        print_schedule(&schedule);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "undo" => {
                let Some(name) = parts.next() else {
                    println!("Usage: undo <name>");
                    continue;
                };
                if schedule.unmark(name) {
                    println!("'{}' is no longer completed.", name);
                    print_schedule(&schedule);
                } else {
                    println!("'{}' was not marked as completed.", name);
                }
            }
            "summary" => match schedule.refresh(now()) {
                Ok(summary) => println!("{}", summary.to_cli_summary()),
                Err(e) => println!("Error: {}", e),
            },
            "meta" => match parts.next() {
                Some("show") | None => print_metadata(&schedule),
                Some("name") => {
                    let text: Vec<&str> = parts.collect();
                    if text.is_empty() {
                        println!("Usage: meta name <text...>");
                    } else {
                        schedule.set_project_name(text.join(" "));
                        print_metadata(&schedule);
                    }
                }
                Some("desc") => {
                    let text: Vec<&str> = parts.collect();
                    if text.is_empty() {
                        println!("Usage: meta desc <text...>");
                    } else {
                        schedule.set_project_description(text.join(" "));
                        print_metadata(&schedule);
                    }
                }
                Some(other) => {
                    println!("Unknown meta command '{}'.", other);
                    println!("Usage: meta show|name|desc ...");
                }
            },
            "save" => {
                let format = parts.next();
                let path = parts.next();
                match (format, path) {
                    (Some("json"), Some(path)) => match save_schedule_to_json(&schedule, path) {
                        Ok(_) => println!("Session saved to {}.", path),
                        Err(e) => println!("Error saving session: {}", e),
                    },
                    (Some("csv"), Some(path)) => match save_schedule_to_csv(&schedule, path) {
                        Ok(_) => println!("Session saved to {}.", path),
                        Err(e) => println!("Error saving session: {}", e),
                    },
                    _ => println!("Usage: save <json|csv> <path>"),
                }
            }
            "load" => {
                let format = parts.next();
                let path = parts.next();
                let loaded = match (format, path) {
                    (Some("json"), Some(path)) => load_schedule_from_json(path),
                    (Some("csv"), Some(path)) => load_schedule_from_csv(path),
                    _ => {
                        println!("Usage: load <json|csv> <path>");
                        continue;
                    }
                };
                match loaded {
                    Ok(mut loaded) => {
                        loaded.set_config(schedule.config().clone());
                        schedule = loaded;
                        println!("Session loaded from {}.", path.unwrap_or_default());
                        print_schedule(&schedule);
                    }
                    Err(e) => println!("Error loading session: {}", e),
                }
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
    Ok(())
}
