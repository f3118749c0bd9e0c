//! Windows PowerShell with the Habitat Windows service.

use super::{
    InstallerPins, POLL_INTERVAL_SECS, ServiceLoad, ShellDialect, SupervisorService, is_plain,
    no_run_hook_message, options_suffix, timeout_message, waiting_message,
};
use crate::domain::platform::Platform;
use crate::domain::template::{fill, indent};

pub const INSTALLER_URL: &str =
    "https://raw.githubusercontent.com/habitat-sh/habitat/main/components/hab/install.ps1";

pub const SERVICE_NAME: &str = "Habitat";

const SERVICE_CONFIG_PATH: &str = r"C:\hab\svc\windows-service\HabService.dll.config";
const SERVICE_REGISTRY_KEY: &str = r"HKLM:\SYSTEM\CurrentControlSet\Services\Habitat";

/// Native commands do not trip `$ErrorActionPreference`; check explicitly.
const CHECK_EXIT: &str = "if ($LASTEXITCODE -ne 0) { exit $LASTEXITCODE }";

const INSTALL_CLI: &str = r"if (Get-Command hab -ErrorAction SilentlyContinue) {
  Write-Host 'Habitat CLI already installed.'
} else {
  Set-ExecutionPolicy Bypass -Scope Process -Force
  [System.Net.ServicePointManager]::SecurityProtocol = [System.Net.ServicePointManager]::SecurityProtocol -bor 3072
  $installer = Join-Path $env:TEMP 'install.ps1'
  Invoke-WebRequest -UseBasicParsing -Uri '{{installer_url}}' -OutFile $installer
  & $installer{{pins}}
  $env:Path = [System.Environment]::GetEnvironmentVariable('Path', 'Machine') + ';' + $env:Path
}";

const SUPERVISOR_SERVICE: &str = r"if (Get-Service -Name {{service_name}} -ErrorAction SilentlyContinue) {
  Write-Host 'Habitat Supervisor service already exists.'
} else {
  hab pkg install {{ident}}
  {{check}}
  hab pkg install core/windows-service
  {{check}}
  hab pkg exec core/windows-service install
  {{check}}
  $svcConfig = '{{config_path}}'
  [xml]$xml = Get-Content $svcConfig
  $launcher = $xml.configuration.appSettings.add | Where-Object { $_.key -eq 'launcherArgs' }
  $launcher.value = {{launcher_args}}
  $xml.Save($svcConfig)
{{environment}}}
Start-Service -Name {{service_name}}";

const WAIT_FOR_STATUS: &str = r"$elapsed = 0
while ($true) {
  hab svc status{{service}} *> $null
  if ($LASTEXITCODE -eq 0) { break }
  if ($elapsed -ge {{timeout}}) {
    [Console]::Error.WriteLine({{timeout_message}})
    exit 1
  }
  Write-Host {{waiting_message}}
  Start-Sleep -Seconds {{interval}}
  $elapsed += {{interval}}
}";

const LOAD_SERVICE: &str = r"if (Test-Path (Join-Path (hab pkg path {{ident}}) 'hooks\run')) {
  hab svc load {{load_ident}} --force{{options}}
  {{check}}
{{wait}}
} else {
  Write-Host {{no_hook_message}}
}";

/// PowerShell dialect for Windows targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerShell;

/// Characters PowerShell accepts as a single-quote delimiter.
pub const SINGLE_QUOTES: [char; 5] = ['\'', '\u{2018}', '\u{2019}', '\u{201A}', '\u{201B}'];

impl PowerShell {
    /// Single-quoted literal regardless of content. Every quote-like
    /// character inside is doubled so it cannot end the literal.
    fn literal(value: &str) -> String {
        let mut out = String::with_capacity(value.len() + 2);
        out.push('\'');
        for c in value.chars() {
            if SINGLE_QUOTES.contains(&c) {
                out.push(c);
            }
            out.push(c);
        }
        out.push('\'');
        out
    }
}

impl ShellDialect for PowerShell {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    fn preamble(&self) -> &'static str {
        "$ErrorActionPreference = 'Stop'\n$ProgressPreference = 'SilentlyContinue'"
    }

    fn quote(&self, value: &str) -> String {
        if is_plain(value, &[]) {
            value.to_string()
        } else {
            Self::literal(value)
        }
    }

    fn export_env(&self, key: &str, value: &str) -> String {
        format!("$env:{key} = {}", Self::literal(value))
    }

    fn user_config_dir(&self, package_name: &str) -> String {
        format!(r"C:\hab\user\{package_name}\config")
    }

    fn install_cli(&self, pins: InstallerPins<'_>) -> String {
        let mut args = String::new();
        if let Some(v) = pins.version {
            args.push_str(&format!(" -Version {}", self.quote(v)));
        }
        if let Some(c) = pins.channel {
            args.push_str(&format!(" -Channel {}", self.quote(c)));
        }
        fill(INSTALL_CLI, &[("installer_url", INSTALLER_URL), ("pins", &args)])
    }

    fn ensure_hab_user(&self) -> Option<String> {
        None
    }

    fn reset_workspace(&self, root: &str, create_config_dir: bool) -> String {
        let root_q = Self::literal(root);
        let mut lines = vec![
            format!("if (Test-Path {root_q}) {{ Remove-Item -Recurse -Force {root_q} }}"),
            format!(
                "New-Item -ItemType Directory -Force -Path {} | Out-Null",
                Self::literal(&self.join_path(root, "results"))
            ),
        ];
        if create_config_dir {
            lines.push(format!(
                "New-Item -ItemType Directory -Force -Path {} | Out-Null",
                Self::literal(&self.join_path(root, "config"))
            ));
        }
        lines.join("\n")
    }

    fn ensure_supervisor_service(&self, service: SupervisorService<'_>) -> String {
        let environment = if service.environment.is_empty() {
            String::new()
        } else {
            let values = service
                .environment
                .iter()
                .map(|(k, v)| Self::literal(&format!("{k}={v}")))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "  New-ItemProperty -Path '{SERVICE_REGISTRY_KEY}' -Name Environment -PropertyType MultiString -Value @({values}) -Force | Out-Null\n"
            )
        };
        fill(SUPERVISOR_SERVICE, &[
            ("service_name", SERVICE_NAME),
            ("ident", &self.quote(service.ident)),
            ("check", CHECK_EXIT),
            ("config_path", SERVICE_CONFIG_PATH),
            ("launcher_args", &Self::literal(&service.options.to_string())),
            ("environment", &environment),
        ])
    }

    fn stage_user_toml(&self, source: &str, dest_dir: &str) -> String {
        let dest = self.join_path(dest_dir, "user.toml");
        [
            format!(
                "New-Item -ItemType Directory -Force -Path {} | Out-Null",
                Self::literal(dest_dir)
            ),
            format!(
                "Remove-Item -Force -ErrorAction SilentlyContinue {}",
                Self::literal(&dest)
            ),
            format!(
                "Copy-Item {} {}",
                Self::literal(source),
                Self::literal(&dest)
            ),
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
                &Self::literal(&timeout_message(service, timeout_secs)),
            ),
            ("waiting_message", &Self::literal(&waiting_message(service))),
            ("interval", &POLL_INTERVAL_SECS.to_string()),
        ])
    }

    fn install_package(&self, target: &str, channel: &str) -> String {
        format!(
            "hab pkg install {} --channel {}\n{CHECK_EXIT}",
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
            ("check", CHECK_EXIT),
            ("wait", &indent(&wait, 2)),
            (
                "no_hook_message",
                &Self::literal(&no_run_hook_message(load.ident)),
            ),
        ])
    }
}
