use colored::Colorize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
}

static QUIET_MODE: AtomicBool = AtomicBool::new(false);

pub fn set_quiet(quiet: bool) {
    QUIET_MODE.store(quiet, Ordering::Relaxed);
}

fn quiet() -> bool {
    QUIET_MODE.load(Ordering::Relaxed)
}

fn label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Info => "[i]",
        MessageKind::Success => "[✓]",
        MessageKind::Warning => "[!]",
        MessageKind::Error => "[x]",
    }
}

fn emit(kind: MessageKind, message: impl fmt::Display) {
    if quiet() && kind == MessageKind::Info {
        return;
    }
    let tag = label(kind);
    let line = format!("{tag} {message}");
    match kind {
        MessageKind::Info => println!("{}", line.cyan()),
        MessageKind::Success => println!("{}", line.green()),
        MessageKind::Warning => println!("{}", line.yellow()),
        MessageKind::Error => eprintln!("{}", line.red()),
    }
}

pub fn info(message: impl fmt::Display) {
    emit(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    emit(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    emit(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    emit(MessageKind::Error, message);
}
