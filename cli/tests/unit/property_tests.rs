//! Property-based tests for artifact naming, option ordering and quoting.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use habprov_cli::domain::artifact::{matches_artifact_pattern, parse_artifact_name};
use habprov_cli::domain::dialect::{Posix, PowerShell, SINGLE_QUOTES, ShellDialect};
use habprov_cli::domain::options::{service_options, supervisor_options};
use habprov_cli::domain::{Platform, ProvisionConfig};

// ============================================================================
// Artifact names
// ============================================================================

fn origin() -> impl Strategy<Value = String> {
    "[a-z0-9_]{1,10}"
}

/// Package names with up to three hyphen-separated segments, each starting
/// with a letter.
fn package_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,8}(-[a-z][a-z0-9]{0,6}){0,2}"
}

fn version() -> impl Strategy<Value = String> {
    "[0-9]{1,3}(\\.[0-9]{1,3}){0,2}"
}

fn target() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["x86_64-linux", "x86_64-linux-kernel2", "x86_64-windows"])
}

proptest! {
    /// A generated artifact name parses back to the identity it was built from.
    #[test]
    fn prop_artifact_name_parses_to_its_identity(
        origin in origin(),
        name in package_name(),
        version in version(),
        release in "[0-9]{14}",
        target in target(),
    ) {
        let file = format!("{origin}-{name}-{version}-{release}-{target}.hart");
        let id = parse_artifact_name(&file).expect("well-formed name parses");
        prop_assert_eq!(&id.origin, &origin);
        prop_assert_eq!(&id.name, &name);
        prop_assert_eq!(id.version.as_deref(), Some(version.as_str()));
        prop_assert_eq!(id.release.as_deref(), Some(release.as_str()));
        prop_assert_eq!(id.short_ident(), format!("{origin}/{name}"));
        prop_assert!(matches_artifact_pattern(&file, &origin, &name));
    }

    /// Anything without the `.hart` extension is rejected.
    #[test]
    fn prop_names_without_extension_are_rejected(
        origin in origin(),
        name in package_name(),
        version in version(),
        release in "[0-9]{14}",
    ) {
        let file = format!("{origin}-{name}-{version}-{release}-x86_64-linux.tar.gz");
        prop_assert!(parse_artifact_name(&file).is_err());
    }
}

// ============================================================================
// Option ordering
// ============================================================================

const SUPERVISOR_ORDER: &[&str] = &[
    "--listen-ctl",
    "--listen-gossip",
    "--listen-http",
    "--config-from",
    "--bind",
    "--peer",
    "--group",
    "--ring",
    "--topology",
    "--strategy",
    "--channel",
    "--event-stream-application",
    "--event-stream-environment",
    "--event-stream-site",
    "--event-stream-url",
    "--event-stream-token",
];

fn value() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[a-z0-9.:]{1,12}")
}

prop_compose! {
    fn arb_config()(
        listen in (value(), value(), value()),
        override_config in any::<bool>(),
        binds in proptest::collection::vec("[a-z]{1,6}:[a-z]{1,6}\\.default", 0..4),
        peers in proptest::collection::vec("10\\.0\\.0\\.[0-9]{1,3}", 0..4),
        membership in (value(), value()),
        service in (value(), value(), value()),
        stream in (value(), value(), value(), value(), value()),
    ) -> ProvisionConfig {
        ProvisionConfig {
            hab_sup_listen_ctl: listen.0,
            hab_sup_listen_gossip: listen.1,
            hab_sup_listen_http: listen.2,
            override_package_config: override_config,
            hab_sup_bind: binds,
            hab_sup_peer: peers,
            hab_sup_group: membership.0,
            hab_sup_ring: membership.1,
            service_topology: service.0,
            service_update_strategy: service.1,
            channel: service.2,
            event_stream_application: stream.0,
            event_stream_environment: stream.1,
            event_stream_site: stream.2,
            event_stream_url: stream.3,
            event_stream_token: stream.4,
            ..ProvisionConfig::default()
        }
    }
}

fn rank(flag: &str) -> usize {
    SUPERVISOR_ORDER
        .iter()
        .position(|f| *f == flag)
        .expect("flag is in the ordering table")
}

proptest! {
    /// Supervisor flags always follow the fixed table order.
    #[test]
    fn prop_supervisor_flags_follow_table_order(cfg in arb_config()) {
        let opts = supervisor_options(&cfg, Platform::Posix);
        let ranks: Vec<usize> = opts.iter().map(|o| rank(o.flag)).collect();
        prop_assert!(ranks.windows(2).all(|w| w[0] <= w[1]), "out of order: {}", opts);
    }

    /// Every bind and peer produces exactly one flag, duplicates included.
    #[test]
    fn prop_repeated_flags_match_input_length(cfg in arb_config()) {
        let opts = supervisor_options(&cfg, Platform::Posix);
        let count = |flag: &str| opts.iter().filter(|o| o.flag == flag).count();
        prop_assert_eq!(count("--bind"), cfg.hab_sup_bind.len());
        prop_assert_eq!(count("--peer"), cfg.hab_sup_peer.len());
        prop_assert_eq!(count("--config-from"), usize::from(cfg.override_package_config));
    }

    /// Service options never carry Supervisor-level flags.
    #[test]
    fn prop_service_options_are_a_subset(cfg in arb_config()) {
        let opts = service_options(&cfg);
        for o in opts.iter() {
            prop_assert!(
                matches!(o.flag, "--bind" | "--group" | "--topology" | "--strategy" | "--channel"),
                "unexpected service flag {}", o.flag
            );
        }
    }
}

// ============================================================================
// Quoting
// ============================================================================

/// Undo POSIX single-quote quoting: plain runs, `'...'` runs and `\'`.
fn sh_unquote(word: &str) -> Option<String> {
    let mut out = String::new();
    let mut chars = word.chars();
    while let Some(c) = chars.next() {
        match c {
            '\'' => loop {
                match chars.next()? {
                    '\'' => break,
                    other => out.push(other),
                }
            },
            '\\' => out.push(chars.next()?),
            ' ' | '\t' | '\n' | '$' | '`' | '"' | ';' | '&' | '|' | '<' | '>' | '(' | ')' => {
                return None;
            }
            other => out.push(other),
        }
    }
    Some(out)
}

/// Undo PowerShell single-quote quoting: plain words or `'...'` literals.
/// Any of the five single-quote characters delimits the literal; inside,
/// a quote character only survives when doubled.
fn ps_unquote(word: &str) -> Option<String> {
    let is_quote = |c: char| SINGLE_QUOTES.contains(&c);
    let mut chars = word.chars();
    match chars.next() {
        Some(c) if is_quote(c) => {}
        _ => {
            return word
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "_-./:=+".contains(c))
                .then(|| word.to_string());
        }
    }
    let mut out = String::new();
    while let Some(c) = chars.next() {
        if !is_quote(c) {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next) if is_quote(next) => out.push(next),
            None => return Some(out),
            Some(_) => return None,
        }
    }
    None
}

proptest! {
    /// A POSIX-quoted value reads back as exactly one word equal to the input.
    #[test]
    fn prop_posix_quote_is_a_single_literal_word(value in "\\PC{0,24}") {
        let quoted = Posix.quote(&value);
        prop_assert_eq!(sh_unquote(&quoted), Some(value.clone()), "quoted: {}", quoted);
    }

    /// A PowerShell-quoted value reads back as exactly one literal.
    #[test]
    fn prop_powershell_quote_is_a_single_literal(value in "\\PC{0,24}") {
        let quoted = PowerShell.quote(&value);
        prop_assert_eq!(ps_unquote(&quoted), Some(value.clone()), "quoted: {}", quoted);
    }

    /// Typographic quotes mixed into a value never end the literal early.
    #[test]
    fn prop_powershell_quote_survives_typographic_quotes(
        value in "[a-z ;'\u{2018}\u{2019}\u{201A}\u{201B}]{0,24}",
    ) {
        let quoted = PowerShell.quote(&value);
        prop_assert_eq!(ps_unquote(&quoted), Some(value.clone()), "quoted: {}", quoted);
    }
}
