use anyhow::{anyhow, Context, Result};
use cli::{Cli, Commands};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::process::ExitCode;

mod book;
mod bundle;
mod cli;
mod config_wizard;
mod convert_ascii;
mod convert_mermaid;
mod detection;
mod error;
mod fences;
mod file_ordering;
mod flexible;
mod highlight;
mod kindle;
mod markdown;
mod sinks;
mod volume;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    if let Err(e) = try_main() {
        eprintln!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn progress_bar() -> ProgressBar {
    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("can parse progress style")
            .progress_chars("#>-"),
    );
    progress
}

/// `"  label: path (12.3 KiB)"`
fn print_artifact(label: &str, path: &Path) {
    let size = std::fs::metadata(path)
        .map(|m| {
            byte_unit::Byte::from_u64(m.len())
                .get_appropriate_unit(byte_unit::UnitType::Binary)
                .to_string()
        })
        .unwrap_or_else(|_| "unknown size".to_string());
    println!(
        "  {label:<10} {} ({size})",
        console::style(path.display()).green()
    );
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();

    match cli.command {
        Commands::Config => config_wizard::run(),
        Commands::Ascii(args) => {
            let report = convert_ascii::run(&args.input, &args.output_dir)
                .with_context(|| "Failed to convert ASCII art")?;
            println!();
            println!("Converted {} diagram(s):", report.pages.len());
            for page in &report.pages {
                print_artifact("Page:", page);
            }
            print_artifact("Index:", &report.index);
            if report.skipped > 0 {
                println!("  Skipped {} empty file(s)", report.skipped);
            }
            Ok(())
        }
        Commands::Mermaid(args) => {
            let report = convert_mermaid::run(&args.input, &args.output_dir)
                .with_context(|| "Failed to convert mermaid diagrams")?;
            println!();
            println!(
                "Converted {} diagram(s) from {} file(s):",
                report.diagrams,
                report.pages.len()
            );
            for page in &report.pages {
                print_artifact("Page:", page);
            }
            print_artifact("Index:", &report.index);
            if report.skipped > 0 {
                println!("  Skipped {} file(s) without diagrams", report.skipped);
            }
            Ok(())
        }
        Commands::Bundle(args) => {
            let files = if args.files.is_empty() {
                bundle::STAGE_FILES.iter().map(|f| f.to_string()).collect()
            } else {
                args.files
            };
            let report = bundle::run(&args.dir, &files, &args.output, args.theme)
                .with_context(|| "Failed to bundle guidelines")?;
            println!();
            println!(
                "Bundled {} of {} document(s):",
                report.included.len(),
                report.included.len() + report.missing.len()
            );
            print_artifact("HTML:", &report.output);
            println!();
            println!("To make a PDF, open the file in a browser and print it to PDF (A4, with background graphics).");
            Ok(())
        }
        Commands::Html(args) => {
            let options = flexible::HtmlOptions {
                input: args.input,
                dir: args.dir,
                separate: args.separate,
                output: args.output,
                toc: !args.no_toc,
                title: args.title,
                theme: args.theme,
            };
            let report = flexible::run(&options).with_context(|| "Failed to generate HTML")?;
            println!();
            for page in &report.pages {
                print_artifact("HTML:", page);
            }
            if let Some(index) = &report.index {
                print_artifact("Index:", index);
            }
            println!(
                "  Table of contents: {}",
                if options.toc { "included" } else { "disabled" }
            );
            Ok(())
        }
        Commands::Epub(args) => {
            let mut options = match (args.input, args.dir) {
                (_, Some(dir)) => {
                    let mut options = kindle::KindleOptions::new(dir);
                    options.dir = true;
                    options
                }
                (Some(input), None) => kindle::KindleOptions::new(input),
                (None, None) => return Err(anyhow!("No input given, pass a file or --dir")),
            };
            options.output = args.output;
            options.title = args.title;
            options.author = args.author;
            options.theme = args.theme;

            let progress = progress_bar();
            let report =
                kindle::run(&options, &progress).with_context(|| "Failed to generate EPUB")?;
            println!();
            println!("{} ({} chapter(s))", report.title, report.chapters);
            print_artifact("EPUB:", &report.output);
            Ok(())
        }
        Commands::Volume(args) => {
            let options = args.resolve()?;
            let progress = progress_bar();
            let report =
                volume::run(&options, &progress).with_context(|| "Failed to build master volume")?;
            println!();
            println!(
                "{} ({} chapter(s))",
                console::style(&report.title).bold(),
                report.chapters
            );
            if let Some(html) = &report.html {
                print_artifact("HTML:", html);
            }
            if let Some(epub) = &report.epub {
                print_artifact("EPUB:", epub);
            }
            Ok(())
        }
    }
}
