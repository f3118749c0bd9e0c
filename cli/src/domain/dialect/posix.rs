//! POSIX `sh` with `sudo` and systemd.

use super::{
    InstallerPins, POLL_INTERVAL_SECS, ServiceLoad, ShellDialect, SupervisorService, is_plain,
    no_run_hook_message, options_suffix, timeout_message, waiting_message,
};
use crate::domain::options::OptionSet;
use crate::domain::platform::Platform;
use crate::domain::template::{fill, indent};

pub const INSTALLER_URL: &str =
    "https://raw.githubusercontent.com/habitat-sh/habitat/main/components/hab/install.sh";

pub const SUPERVISOR_UNIT_PATH: &str = "/etc/systemd/system/hab-supervisor.service";

const INSTALL_CLI: &str = r#"if command -v hab >/dev/null 2>&1
then
  echo "Habitat CLI already installed."
else
  curl -o /tmp/install.sh '{{installer_url}}'
  sudo -E bash /tmp/install.sh{{pins}}
fi"#;

const ENSURE_USER: &str = "\
id -u hab >/dev/null 2>&1 || sudo -E useradd hab >/dev/null 2>&1
getent group hab >/dev/null 2>&1 || sudo -E groupadd hab >/dev/null 2>&1";

// The heredoc delimiter is quoted so nothing inside the unit is expanded.
const SUPERVISOR_SERVICE: &str = r#"if [ -f {{unit_path}} ]
then
  echo "Habitat Supervisor service already exists."
else
  sudo -E hab pkg install {{ident}}
  sudo tee {{unit_path}} >/dev/null <<'HABPROV_UNIT'
[Unit]
Description=The Habitat Supervisor

[Service]
{{environment}}ExecStart=/bin/hab sup run{{options}}

[Install]
WantedBy=default.target
HABPROV_UNIT
  sudo systemctl daemon-reload
  sudo systemctl enable hab-supervisor.service
fi
sudo systemctl start hab-supervisor.service"#;

const WAIT_FOR_STATUS: &str = r#"elapsed=0
until sudo -E hab svc status{{service}} >/dev/null 2>&1
do
  if [ "$elapsed" -ge {{timeout}} ]
  then
    echo {{timeout_message}} >&2
    exit 1
  fi
  echo {{waiting_message}}
  sleep {{interval}}
  elapsed=$((elapsed + {{interval}}))
done"#;

const LOAD_SERVICE: &str = r#"if [ -f "$(sudo -E hab pkg path {{ident}})/hooks/run" ]
then
  sudo -E hab svc load {{load_ident}} --force{{options}}
{{wait}}
else
  echo {{no_hook_message}}
fi"#;

/// POSIX shell dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Posix;

impl Posix {
    /// One `Environment=` line for a systemd unit.
    fn systemd_environment(key: &str, value: &str) -> String {
        let escaped = value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('%', "%%");
        format!("Environment=\"{key}={escaped}\"\n")
    }

    /// One argument on an `ExecStart=` line. systemd expands `%` specifiers
    /// and `$` variables there and splits words with its own quoting rules.
    fn systemd_arg(value: &str) -> String {
        let escaped = value.replace('%', "%%").replace('$', "$$");
        if is_plain(value, &[',', '@', '%']) {
            return escaped;
        }
        let escaped = escaped
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n");
        format!("\"{escaped}\"")
    }

    /// ` --flag value ...` for the Supervisor unit's `ExecStart=`.
    fn exec_start_options(options: &OptionSet) -> String {
        options
            .iter()
            .map(|o| match &o.value {
                Some(v) => format!(" {} {}", o.flag, Self::systemd_arg(v)),
                None => format!(" {}", o.flag),
            })
            .collect()
    }
}

impl ShellDialect for Posix {
    fn platform(&self) -> Platform {
        Platform::Posix
    }

    fn preamble(&self) -> &'static str {
        "set -e"
    }

    fn quote(&self, value: &str) -> String {
        if is_plain(value, &[',', '@', '%']) {
            value.to_string()
        } else {
            format!("'{}'", value.replace('\'', r"'\''"))
        }
    }

    fn export_env(&self, key: &str, value: &str) -> String {
        format!("export {key}={}", self.quote(value))
    }

    fn user_config_dir(&self, package_name: &str) -> String {
        format!("/hab/user/{package_name}/config")
    }

    fn install_cli(&self, pins: InstallerPins<'_>) -> String {
        let mut args = String::new();
        if let Some(v) = pins.version {
            args.push_str(&format!(" -v {}", self.quote(v)));
        }
        if let Some(c) = pins.channel {
            args.push_str(&format!(" -c {}", self.quote(c)));
        }
        fill(INSTALL_CLI, &[("installer_url", INSTALLER_URL), ("pins", &args)])
    }

    fn ensure_hab_user(&self) -> Option<String> {
        Some(ENSURE_USER.to_string())
    }

    fn reset_workspace(&self, root: &str, create_config_dir: bool) -> String {
        let mut lines = vec![
            format!("rm -rf {}", self.quote(root)),
            format!("mkdir -p {}", self.quote(&self.join_path(root, "results"))),
        ];
        if create_config_dir {
            lines.push(format!(
                "mkdir -p {}",
                self.quote(&self.join_path(root, "config"))
            ));
        }
        lines.join("\n")
    }

    fn ensure_supervisor_service(&self, service: SupervisorService<'_>) -> String {
        let environment: String = service
            .environment
            .iter()
            .map(|(k, v)| Self::systemd_environment(k, v))
            .collect();
        fill(SUPERVISOR_SERVICE, &[
            ("unit_path", SUPERVISOR_UNIT_PATH),
            ("ident", &self.quote(service.ident)),
            ("environment", &environment),
            ("options", &Self::exec_start_options(service.options)),
        ])
    }

    fn stage_user_toml(&self, source: &str, dest_dir: &str) -> String {
        let dest = self.join_path(dest_dir, "user.toml");
        [
            format!("sudo -E mkdir -p {}", self.quote(dest_dir)),
            format!("sudo -E rm -f {}", self.quote(&dest)),
            format!("sudo -E cp {} {}", self.quote(source), self.quote(&dest)),
        ]
        .join("\n")
    }

    fn wait_for_status(&self, service: Option<&str>, timeout_secs: u64) -> String {
        let target = service.map_or_else(String::new, |s| format!(" {}", self.quote(s)));
        fill(WAIT_FOR_STATUS, &[
            ("service", &target),
            ("timeout", &timeout_secs.to_string()),
            (
                "timeout_message",
                &self.quote(&timeout_message(service, timeout_secs)),
            ),
            ("waiting_message", &self.quote(&waiting_message(service))),
            ("interval", &POLL_INTERVAL_SECS.to_string()),
        ])
    }

    fn install_package(&self, target: &str, channel: &str) -> String {
        format!(
            "sudo -E hab pkg install {} --channel {}",
            self.quote(target),
            self.quote(channel)
        )
    }

    fn load_service(&self, load: ServiceLoad<'_>) -> String {
        let wait = self.wait_for_status(Some(load.load_ident), load.timeout_secs);
        fill(LOAD_SERVICE, &[
            ("ident", &self.quote(load.ident)),
            ("load_ident", &self.quote(load.load_ident)),
            ("options", &options_suffix(load.options, self)),
            ("wait", &indent(&wait, 2)),
            ("no_hook_message", &self.quote(&no_run_hook_message(load.ident))),
        ])
    }
}
