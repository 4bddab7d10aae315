/* src/cli/src/ui.rs */

// Terminal output helpers shared by the subcommands.

pub const DIM: &str = "\x1b[2m";
pub const GREEN: &str = "\x1b[32m";
pub const RESET: &str = "\x1b[0m";

pub fn step(message: &str) {
  println!("{message}");
}

pub fn detail_ok(message: &str) {
  println!("  {GREEN}\u{2713}{RESET} {message}");
}

pub fn done(message: &str) {
  println!("{GREEN}done{RESET} {DIM}{message}{RESET}");
}
