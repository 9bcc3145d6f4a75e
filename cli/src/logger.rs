use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;
use surfacelink_core::paths;

/// Console + file logger. The console gets colors and per-target tints, the file gets plain text.
pub struct SurfaceLinkLogger {
    level: LevelFilter,
    log_file: Mutex<Option<File>>,
    target_colors: Mutex<HashMap<String, usize>>,
    next_color_index: AtomicUsize,
}

impl SurfaceLinkLogger {
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            level: level_filter(quiet, verbose),
            log_file: Mutex::new(open_log_file()),
            target_colors: Mutex::new(HashMap::new()),
            next_color_index: AtomicUsize::new(0),
        }
    }

    fn color_for_target(&self, target: &str) -> ColoredString {
        let colors: &[fn(&str) -> ColoredString] = &[
            |s| s.green(),
            |s| s.yellow(),
            |s| s.blue(),
            |s| s.magenta(),
            |s| s.cyan(),
        ];

        let color_index = *self
            .target_colors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(target.to_string())
            .or_insert_with(|| self.next_color_index.fetch_add(1, Ordering::SeqCst) % colors.len());

        colors[color_index](target)
    }

    fn format_record(&self, record: &Record, colored: bool) -> String {
        let level_str = match record.level() {
            Level::Error => "[E]",
            Level::Warn => "[W]",
            Level::Info => "[I]",
            Level::Debug => "[D]",
            Level::Trace => "[T]",
        };

        // Relays happen on the UI thread and rendering on the worker, so name the thread.
        let thread = thread::current();
        let thread_name = thread.name().unwrap_or("?");

        let short_target = record
            .target()
            .split("::")
            .last()
            .unwrap_or(record.target());

        if !colored {
            return format!(
                "{} [{}] [{}] {}",
                level_str,
                thread_name,
                short_target,
                record.args()
            );
        }

        let message = format!(
            "{} [{}] [{}] {}",
            level_str,
            thread_name.dimmed(),
            self.color_for_target(short_target).dimmed(),
            record.args()
        );

        match record.level() {
            Level::Error => message.red().bold().to_string(),
            Level::Warn => message.yellow().bold().to_string(),
            level => {
                let colored_level = match level {
                    Level::Info => level_str.green().bold(),
                    Level::Debug => level_str.blue().bold(),
                    _ => level_str.white().bold(),
                };
                message.replacen(level_str, &colored_level.to_string(), 1)
            }
        }
    }
}

fn level_filter(quiet: bool, verbose: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Info
    } else if verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    }
}

fn open_log_file() -> Option<File> {
    paths::ensure_data_dir()?;
    let path = paths::log_file_path()?;
    match OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)
    {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Warning: Failed to open log file at {:?}: {}", path, e);
            None
        }
    }
}

impl Log for SurfaceLinkLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        println!("{}", self.format_record(record, true));

        let mut log_file = self.log_file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(file) = log_file.as_mut() {
            let _ = writeln!(file, "{}", self.format_record(record, false));
        }
    }

    fn flush(&self) {
        let mut log_file = self.log_file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(file) = log_file.as_mut() {
            let _ = file.flush();
        }
    }
}

pub fn init_logger(quiet: bool, verbose: bool) -> Result<(), log::SetLoggerError> {
    let logger = SurfaceLinkLogger::new(quiet, verbose);
    let level = logger.level;
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(())
}
