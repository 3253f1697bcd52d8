//! Platform detection: OS family, package manager, privilege level.

use std::env;
use std::fmt;
use std::fs;

use crate::runner::Runner;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OsFamily {
    Linux,
    MacOs,
    /// Anything else, carrying `std::env::consts::OS`.
    Unsupported(String),
}

impl OsFamily {
    pub fn from_os(os: &str) -> Self {
        match os {
            "linux" => OsFamily::Linux,
            "macos" => OsFamily::MacOs,
            other => OsFamily::Unsupported(other.to_string()),
        }
    }

    pub fn current() -> Self {
        Self::from_os(env::consts::OS)
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, OsFamily::Unsupported(_))
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsFamily::Linux => f.write_str("linux"),
            OsFamily::MacOs => f.write_str("macos"),
            OsFamily::Unsupported(os) => write!(f, "{} (unsupported)", os),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Apt,
    Dnf,
    Yum,
    Brew,
}

impl PackageManager {
    /// Candidates in priority order for an OS family.
    pub fn candidates(os: &OsFamily) -> &'static [PackageManager] {
        match os {
            OsFamily::Linux => &[
                PackageManager::Apt,
                PackageManager::Dnf,
                PackageManager::Yum,
                PackageManager::Brew,
            ],
            OsFamily::MacOs => &[PackageManager::Brew],
            OsFamily::Unsupported(_) => &[],
        }
    }

    /// Executable probed on `PATH` and invoked for installs.
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Apt => "apt-get",
            PackageManager::Dnf => "dnf",
            PackageManager::Yum => "yum",
            PackageManager::Brew => "brew",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PackageManager::Apt => "apt",
            PackageManager::Dnf => "dnf",
            PackageManager::Yum => "yum",
            PackageManager::Brew => "brew",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: OsFamily,
    pub arch: String,
    /// `ID=` from `/etc/os-release` on Linux.
    pub distro: Option<String>,
    /// First available candidate, if any.
    pub package_manager: Option<PackageManager>,
    /// Effective uid is 0; privileged steps skip `sudo`.
    pub is_root: bool,
}

impl Platform {
    pub fn detect(runner: &dyn Runner) -> Self {
        let os = OsFamily::current();
        let distro = if os == OsFamily::Linux {
            detect_linux_distro()
        } else {
            None
        };

        let mut platform = Self::detect_for(os, runner);
        platform.distro = distro;
        platform.is_root = is_effective_root();

        tracing::debug!(?platform, "detected platform");
        platform
    }

    /// Probe package managers for a given OS family.
    pub fn detect_for(os: OsFamily, runner: &dyn Runner) -> Self {
        let package_manager = PackageManager::candidates(&os)
            .iter()
            .copied()
            .find(|pm| runner.locate(pm.program()).is_some());

        Self {
            os,
            arch: env::consts::ARCH.to_string(),
            distro: None,
            package_manager,
            is_root: false,
        }
    }
}

fn detect_linux_distro() -> Option<String> {
    let content = fs::read_to_string("/etc/os-release").ok()?;
    content
        .lines()
        .find_map(|line| line.strip_prefix("ID="))
        .map(|id| id.trim_matches('"').to_string())
}

#[cfg(unix)]
fn is_effective_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
fn is_effective_root() -> bool {
    false
}
