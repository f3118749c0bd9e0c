//! Layering rules, checked by scanning the source tree.
//!
//! `domain` is pure, `application` sees only `domain` and its ports, and
//! `infra` never reaches into presentation code.

use std::path::{Path, PathBuf};

fn src_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src")
}

fn rust_sources(dir: &Path, into: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            rust_sources(&path, into);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            into.push(path);
        }
    }
}

/// Test modules sit at the end of each file, so production code is
/// everything above the first `#[cfg(...test...)]` attribute.
fn production_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| {
            let line = line.trim_start();
            !(line.starts_with("#[cfg(") && line.contains("test"))
        })
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
}

/// `file:line` for every production line under `dir` that mentions one of
/// `forbidden`.
fn scan(dir: &Path, forbidden: &[&str]) -> Vec<String> {
    let mut files = Vec::new();
    rust_sources(dir, &mut files);
    files.sort();

    let mut hits = Vec::new();
    for file in files {
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        let shown = file.strip_prefix(src_dir()).unwrap_or(&file).display().to_string();
        for (index, line) in production_lines(&content) {
            hits.extend(
                forbidden
                    .iter()
                    .filter(|needle| line.contains(*needle))
                    .map(|needle| format!("{shown}:{}: `{needle}`: {}", index + 1, line.trim())),
            );
        }
    }
    hits
}

// ── Domain purity ─────────────────────────────────────────────────────────────

#[test]
fn domain_performs_no_io_and_imports_no_outer_layer() {
    let violations = scan(&src_dir().join("domain"), &[
        "crate::infra",
        "crate::application",
        "crate::commands",
        "crate::output",
        "tokio::",
        "std::fs",
        "std::process",
        "std::net",
        "println!",
    ]);
    assert!(
        violations.is_empty(),
        "domain/ must stay pure:\n{}",
        violations.join("\n")
    );
}

// ── Application boundaries ────────────────────────────────────────────────────

#[test]
fn application_does_not_import_infra_or_presentation() {
    let violations = scan(&src_dir().join("application"), &[
        "crate::infra",
        "crate::commands",
        "crate::output",
        "println!",
        "eprintln!",
    ]);
    assert!(
        violations.is_empty(),
        "application/ must only depend on domain/ and its own ports:\n{}",
        violations.join("\n")
    );
}

#[test]
fn no_concrete_runner_types_in_service_signatures() {
    let services = src_dir().join("application").join("services");
    let violations = scan(&services, &["TokioCommandRunner", "TempSandbox", "Transport::"]);
    assert!(
        violations.is_empty(),
        "services must take trait bounds, not concrete adapters:\n{}",
        violations.join("\n")
    );
}

// ── Infra boundaries ──────────────────────────────────────────────────────────

#[test]
fn infra_has_no_imports_from_commands_or_output() {
    let violations = scan(&src_dir().join("infra"), &["crate::commands", "crate::output"]);
    assert!(
        violations.is_empty(),
        "infra/ must not import from commands/ or output/:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_print_macros_outside_tests() {
    let violations = scan(&src_dir().join("infra"), &["println!", "eprintln!"]);
    assert!(
        violations.is_empty(),
        "infra/ must not use println!/eprintln! outside #[cfg(test)]:\n{}",
        violations.join("\n")
    );
}

#[test]
fn command_runners_are_only_built_in_infra() {
    let mut violations = Vec::new();
    for dir in ["application", "commands", "domain", "output"] {
        violations.extend(scan(&src_dir().join(dir), &["TokioCommandRunner::new"]));
    }
    assert!(
        violations.is_empty(),
        "TokioCommandRunner::new outside infra/; build transports with Transport::from_config:\n{}",
        violations.join("\n")
    );
}

// ── Presentation ──────────────────────────────────────────────────────────────

#[test]
fn no_inline_json_branching_in_commands() {
    let violations = scan(&src_dir().join("commands"), &["json: bool", "if json", "if !json"]);
    assert!(
        violations.is_empty(),
        "commands/ must branch on app.is_json(), not a json flag:\n{}",
        violations.join("\n")
    );
}
