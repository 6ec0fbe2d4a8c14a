//! Colored user-facing status lines (startup banners, config notices, final summary).
//! Colors are enabled only when stdout is a TTY; review-loop output goes through
//! the console's own writer instead.

use owo_colors::{AnsiColors, OwoColorize};

fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn tag(label: &str, color: AnsiColors) -> String {
    if is_tty() {
        label.color(color).bold().to_string()
    } else {
        label.to_string()
    }
}

pub fn print_info(msg: &str) {
    println!("{} {}", tag("info:", AnsiColors::Cyan), msg);
}

pub fn print_success(msg: &str) {
    println!("{} {}", tag("ok:", AnsiColors::Green), msg);
}

pub fn print_warn(msg: &str) {
    eprintln!("{} {}", tag("warn:", AnsiColors::Yellow), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", tag("error:", AnsiColors::Red), msg);
}

/// List the letters bound at startup, e.g. "k -> /photos/keep".
pub fn print_bindings<'a>(bindings: impl Iterator<Item = (char, &'a std::path::Path)>) {
    for (key, folder) in bindings {
        print_info(&format!("[{key}/{}] -> {}", key.to_ascii_uppercase(), folder.display()));
    }
}
