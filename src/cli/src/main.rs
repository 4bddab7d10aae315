/* src/cli/src/main.rs */

mod build;
#[allow(clippy::print_stdout)]
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "glide", version, about = "Build tooling for the Glide navigation runtime")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Convert full HTML pages into SPA fragments plus a per-page asset manifest
  Build(BuildArgs),
}

#[derive(Args)]
struct BuildArgs {
  /// Directory containing the source HTML pages
  #[arg(long, default_value = "www")]
  pages: PathBuf,

  /// Output directory for fragments and generated assets
  #[arg(long, default_value = ".glide")]
  out: PathBuf,

  /// Class of the content-root element inside each page
  #[arg(long, default_value = "app-container")]
  content_class: String,

  /// Shell script name to strip from pages (repeatable); these stay in the
  /// host page and must never be replayed per fragment
  #[arg(long = "global-script")]
  global_scripts: Vec<String>,
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  match cli.command {
    Command::Build(args) => {
      let options = build::BuildOptions {
        pages_dir: args.pages,
        out_dir: args.out,
        content_class: args.content_class,
        global_scripts: args.global_scripts,
      };
      let summary = build::run(&options)?;
      ui::done(&format!(
        "{} page(s) -> {} fragment(s), {} inline script file(s)",
        summary.pages, summary.pages, summary.script_files
      ));
      Ok(())
    }
  }
}
