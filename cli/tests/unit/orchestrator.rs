//! Tests for the provisioning orchestrator: phase order, failure handling
//! and sandbox staging.

#![allow(clippy::expect_used)]

use std::fs;

use habprov_cli::application::ports::SandboxWriter;
use habprov_cli::application::services::provision::{converge, run_phase, run_single};
use habprov_cli::domain::composer::compose_for;
use habprov_cli::domain::{Phase, ProvisionError};
use habprov_cli::infra::sandbox::TempSandbox;
use tempfile::TempDir;

use crate::helpers::{context_in, err_output, ok_output};
use crate::mocks::{RecordingReporter, RecordingTransport, TransportCall};

const DECLARED: &str = "
suite: web
platform: ubuntu-22.04
provisioner:
  package_origin: core
";

#[tokio::test]
async fn converge_runs_phases_in_order_with_upload_before_prepare() {
    let root = TempDir::new().expect("tempdir");
    let ctx = context_in(root.path(), DECLARED);
    let transport = RecordingTransport::new();
    let sandbox = TempSandbox::new().expect("sandbox");
    let reporter = RecordingReporter::new();

    converge(&ctx, &transport, &sandbox, &reporter)
        .await
        .expect("converge succeeds");

    assert_eq!(transport.calls(), vec![
        TransportCall::Script(compose_for(&ctx, Phase::Install)),
        TransportCall::Script(compose_for(&ctx, Phase::Init)),
        TransportCall::Upload {
            sandbox: sandbox.path().to_path_buf(),
            remote_root: "/tmp/kitchen".to_string(),
        },
        TransportCall::Script(compose_for(&ctx, Phase::Prepare)),
        TransportCall::Script(compose_for(&ctx, Phase::Run)),
    ]);
    assert_eq!(
        reporter.events().last().map(String::as_str),
        Some("success: core/web is running under the Supervisor")
    );
}

#[tokio::test]
async fn failing_phase_stops_the_run_with_its_exit_code() {
    let root = TempDir::new().expect("tempdir");
    let ctx = context_in(root.path(), DECLARED);
    let transport = RecordingTransport::with_responses(vec![
        ok_output(b""),
        err_output(3, b"useradd: permission denied\n"),
    ]);
    let sandbox = TempSandbox::new().expect("sandbox");
    let reporter = RecordingReporter::new();

    let err = converge(&ctx, &transport, &sandbox, &reporter)
        .await
        .expect_err("init fails");

    match err.downcast_ref::<ProvisionError>() {
        Some(ProvisionError::PhaseFailed {
            phase,
            code,
            stderr,
        }) => {
            assert_eq!(*phase, Phase::Init);
            assert_eq!(*code, 3);
            assert_eq!(stderr, "useradd: permission denied");
        }
        other => panic!("expected PhaseFailed, got {other:?}"),
    }
    assert_eq!(transport.calls().len(), 2, "nothing runs after init fails");
    assert!(
        !reporter
            .events()
            .iter()
            .any(|e| e.starts_with("success: core/web")),
        "no final success after a failure"
    );
}

#[tokio::test]
async fn upload_failure_skips_prepare_and_run() {
    let root = TempDir::new().expect("tempdir");
    let ctx = context_in(root.path(), DECLARED);
    let transport = RecordingTransport::failing_upload();
    let sandbox = TempSandbox::new().expect("sandbox");
    let reporter = RecordingReporter::new();

    let err = converge(&ctx, &transport, &sandbox, &reporter)
        .await
        .expect_err("upload fails");

    let msg = format!("{err:#}");
    assert!(msg.contains("uploading sandbox"), "got: {msg}");
    assert!(msg.contains("connection reset"), "got: {msg}");
    assert_eq!(transport.scripts().len(), 2);
}

#[tokio::test]
async fn phase_stdout_is_relayed_to_the_reporter() {
    let root = TempDir::new().expect("tempdir");
    let ctx = context_in(root.path(), DECLARED);
    let transport =
        RecordingTransport::with_responses(vec![ok_output(b"Habitat CLI already installed.\n")]);
    let reporter = RecordingReporter::new();

    run_phase(&ctx, Phase::Install, &transport, &reporter)
        .await
        .expect("install succeeds");

    let events = reporter.events();
    assert!(
        events.contains(&"output: Habitat CLI already installed.".to_string()),
        "got: {events:?}"
    );
    assert_eq!(events.last().map(String::as_str), Some("success: install complete"));
}

#[tokio::test]
async fn prepare_on_its_own_uploads_first() {
    let root = TempDir::new().expect("tempdir");
    let ctx = context_in(root.path(), DECLARED);
    let transport = RecordingTransport::new();
    let sandbox = TempSandbox::new().expect("sandbox");
    let reporter = RecordingReporter::new();

    run_single(&ctx, Phase::Prepare, &transport, &sandbox, &reporter)
        .await
        .expect("prepare succeeds");

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(calls[0], TransportCall::Upload { .. }));
    assert_eq!(
        calls[1],
        TransportCall::Script(compose_for(&ctx, Phase::Prepare))
    );
}

#[tokio::test]
async fn other_phases_on_their_own_do_not_upload() {
    let root = TempDir::new().expect("tempdir");
    let ctx = context_in(root.path(), DECLARED);
    let transport = RecordingTransport::new();
    let sandbox = TempSandbox::new().expect("sandbox");
    let reporter = RecordingReporter::new();

    run_single(&ctx, Phase::Run, &transport, &sandbox, &reporter)
        .await
        .expect("run succeeds");

    assert_eq!(transport.calls(), vec![TransportCall::Script(compose_for(
        &ctx,
        Phase::Run
    ))]);
}

#[tokio::test]
async fn latest_artifact_is_staged_and_installed_from_the_workspace() {
    let root = TempDir::new().expect("tempdir");
    let results = root.path().join("results");
    fs::create_dir(&results).expect("results dir");
    let artifact = "core-web-1.2.0-20240101000000-x86_64-linux.hart";
    fs::write(results.join(artifact), b"hart").expect("artifact");

    let ctx = context_in(
        root.path(),
        "
suite: web
platform: ubuntu-22.04
provisioner:
  package_origin: core
  install_latest_artifact: true
",
    );
    assert_eq!(ctx.package.ident(), "core/web/1.2.0/20240101000000");

    let transport = RecordingTransport::new();
    let sandbox = TempSandbox::new().expect("sandbox");
    let reporter = RecordingReporter::new();
    converge(&ctx, &transport, &sandbox, &reporter)
        .await
        .expect("converge succeeds");

    assert!(sandbox.path().join("results").join(artifact).is_file());
    let scripts = transport.scripts();
    let run = scripts.last().expect("run script");
    assert!(
        run.contains(&format!(
            "sudo -E hab pkg install /tmp/kitchen/results/{artifact} --channel stable"
        )),
        "got:\n{run}"
    );
    assert!(
        run.contains("sudo -E hab svc load core/web --force"),
        "got:\n{run}"
    );
}

#[tokio::test]
async fn user_toml_is_staged_and_copied_by_prepare() {
    let root = TempDir::new().expect("tempdir");
    let config = root.path().join("habitat-config");
    fs::create_dir(&config).expect("config dir");
    fs::write(config.join("user.toml"), b"port = 8080\n").expect("user.toml");

    let ctx = context_in(
        root.path(),
        "
suite: web
platform: ubuntu-22.04
provisioner:
  package_origin: core
  config_directory: habitat-config
",
    );
    assert!(ctx.user_toml.is_some());

    let transport = RecordingTransport::new();
    let sandbox = TempSandbox::new().expect("sandbox");
    let reporter = RecordingReporter::new();
    run_single(&ctx, Phase::Prepare, &transport, &sandbox, &reporter)
        .await
        .expect("prepare succeeds");

    let staged = sandbox.path().join("config").join("user.toml");
    assert_eq!(fs::read_to_string(staged).expect("staged"), "port = 8080\n");
    let prepare = transport.scripts().pop().expect("prepare script");
    assert!(
        prepare.contains("sudo -E cp /tmp/kitchen/config/user.toml /hab/user/web/config/user.toml"),
        "got:\n{prepare}"
    );
}
