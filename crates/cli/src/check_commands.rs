//! `agent-sops check` — validate SOP directories.
//!
//! Scans each directory and prints a report with `[ok]`, `[warn]`, or
//! `[fail]` per document and per unusable directory.

use std::path::PathBuf;

use {
    anyhow::Result,
    sops_config::SopsConfig,
    sops_registry::{
        SourceTier,
        discover::{FsSopDiscoverer, SopDiscoverer},
        loader::DirectoryScan,
    },
};

// ── ANSI helpers ────────────────────────────────────────────────────────────

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    Warn,
    Fail,
}

impl Status {
    fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Warn => "warn",
            Self::Fail => "fail",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Self::Ok => GREEN,
            Self::Warn => YELLOW,
            Self::Fail => RED,
        }
    }
}

struct CheckItem {
    status: Status,
    message: String,
}

struct Section {
    title: String,
    items: Vec<CheckItem>,
}

impl Section {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
        }
    }

    fn push(&mut self, status: Status, message: impl Into<String>) {
        self.items.push(CheckItem {
            status,
            message: message.into(),
        });
    }
}

// ── Building ────────────────────────────────────────────────────────────────

fn section_for(dir: &std::path::Path, tier: SourceTier, scan: &DirectoryScan) -> Section {
    let mut section = Section::new(format!("{tier}: {}", dir.display()));
    for doc in &scan.documents {
        section.push(Status::Ok, format!("{} — {}", doc.name, doc.description));
    }
    for failure in &scan.failures {
        let status = if failure.error.is_expected() {
            Status::Warn
        } else {
            Status::Fail
        };
        let message = if failure.path == dir {
            failure.error.to_string()
        } else {
            format!("{}: {}", failure.path.display(), failure.error)
        };
        section.push(status, message);
    }
    if scan.documents.is_empty() && scan.failures.is_empty() {
        section.push(Status::Warn, "no *.sop.md files");
    }
    section
}

fn search_paths(config: &SopsConfig, dirs: Vec<PathBuf>) -> Vec<(PathBuf, SourceTier)> {
    if dirs.is_empty() {
        return FsSopDiscoverer::default_paths(config);
    }
    dirs.into_iter()
        .enumerate()
        .map(|(idx, dir)| (dir, SourceTier::External(idx)))
        .collect()
}

async fn build_report(search_paths: Vec<(PathBuf, SourceTier)>) -> Vec<Section> {
    let discoverer = FsSopDiscoverer::new(search_paths);
    let scans = discoverer.discover().await;
    discoverer
        .search_paths()
        .iter()
        .zip(&scans)
        .map(|((dir, tier), scan)| section_for(dir, *tier, scan))
        .collect()
}

// ── Printing ────────────────────────────────────────────────────────────────

fn print_report(sections: &[Section]) -> (usize, usize) {
    let mut errors = 0usize;
    let mut warnings = 0usize;

    for section in sections {
        println!("{BOLD}{}{RESET}", section.title);
        for item in &section.items {
            let color = item.status.color();
            let label = item.status.label();
            println!("  [{color}{label}{RESET}]  {}", item.message);
            match item.status {
                Status::Fail => errors += 1,
                Status::Warn => warnings += 1,
                Status::Ok => {},
            }
        }
        println!();
    }

    (errors, warnings)
}

// ── Entry point ─────────────────────────────────────────────────────────────

pub async fn handle_check(config: &SopsConfig, dirs: Vec<PathBuf>) -> Result<()> {
    let sections = build_report(search_paths(config, dirs)).await;
    let (errors, warnings) = print_report(&sections);

    println!("{BOLD}Summary:{RESET} {errors} error(s), {warnings} warning(s)");

    if errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}
