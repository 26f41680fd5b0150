//! Registry-based suite discovery.
//!
//! Every Visual Studio release since 2010 leaves a key under
//! `HKLM\SOFTWARE\Microsoft\VisualStudio\<major>.0`. A 32-bit process sees a
//! redirected view of `SOFTWARE`, so both views are probed.

use crate::builder::errors::ProbeError;

use super::{SuiteSource, ToolchainVersion};

/// Suite year and the `HKEY_LOCAL_MACHINE` key that marks it as installed.
pub const SUITE_REGISTRY_KEYS: &[(&str, &str)] = &[
    ("2010", r"SOFTWARE\Microsoft\VisualStudio\10.0"),
    ("2012", r"SOFTWARE\Microsoft\VisualStudio\11.0"),
    ("2013", r"SOFTWARE\Microsoft\VisualStudio\12.0"),
    ("2015", r"SOFTWARE\Microsoft\VisualStudio\14.0"),
    ("2017", r"SOFTWARE\Microsoft\VisualStudio\15.0"),
    ("2019", r"SOFTWARE\Microsoft\VisualStudio\16.0"),
    ("2022", r"SOFTWARE\Microsoft\VisualStudio\17.0"),
];

/// Map a product major version (`17`) to its suite year (`2022`).
pub fn year_for_major(major: &str) -> Option<&'static str> {
    SUITE_REGISTRY_KEYS
        .iter()
        .find(|(_, key)| {
            key.rsplit('\\')
                .next()
                .and_then(|leaf| leaf.strip_suffix(".0"))
                == Some(major)
        })
        .map(|(year, _)| *year)
}

/// Product major version of a suite year (`2022` is `17`).
pub fn major_for_year(year: &str) -> Option<u64> {
    SUITE_REGISTRY_KEYS
        .iter()
        .find(|(y, _)| *y == year)
        .and_then(|(_, key)| key.rsplit('\\').next())
        .and_then(|leaf| leaf.strip_suffix(".0"))
        .and_then(|major| major.parse().ok())
}

/// Registry view to open a key in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryView {
    /// `KEY_WOW64_64KEY`
    Bits64,
    /// `KEY_WOW64_32KEY`
    Bits32,
}

impl RegistryView {
    pub const ALL: [RegistryView; 2] = [RegistryView::Bits64, RegistryView::Bits32];
}

/// Outcome of opening a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyStatus {
    Present,
    Missing,
    Denied,
    Failed(String),
}

/// Read-only access to a registry hive.
pub trait RegistryHive {
    /// Try to open `path` in `view`.
    ///
    /// Returns `Err` only when the registry cannot be used at all.
    fn open(&self, path: &str, view: RegistryView) -> Result<KeyStatus, ProbeError>;
}

/// `HKEY_LOCAL_MACHINE` of the running host.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalMachine;

#[cfg(windows)]
impl RegistryHive for LocalMachine {
    fn open(&self, path: &str, view: RegistryView) -> Result<KeyStatus, ProbeError> {
        Ok(win::open_key(path, view))
    }
}

#[cfg(not(windows))]
impl RegistryHive for LocalMachine {
    fn open(&self, _path: &str, _view: RegistryView) -> Result<KeyStatus, ProbeError> {
        Err(ProbeError::RegistryUnsupported)
    }
}

#[cfg(windows)]
mod win {
    use windows::core::PCWSTR;
    use windows::Win32::Foundation::{
        ERROR_ACCESS_DENIED, ERROR_FILE_NOT_FOUND, ERROR_PATH_NOT_FOUND, ERROR_SUCCESS,
    };
    use windows::Win32::System::Registry::{
        RegCloseKey, RegOpenKeyExW, HKEY, HKEY_LOCAL_MACHINE, KEY_READ, KEY_WOW64_32KEY,
        KEY_WOW64_64KEY,
    };

    use super::{KeyStatus, RegistryView};

    pub(super) fn open_key(path: &str, view: RegistryView) -> KeyStatus {
        let wide: Vec<u16> = path.encode_utf16().chain(Some(0)).collect();
        let access = match view {
            RegistryView::Bits64 => KEY_READ | KEY_WOW64_64KEY,
            RegistryView::Bits32 => KEY_READ | KEY_WOW64_32KEY,
        };

        let mut key = HKEY::default();
        // SAFETY: `wide` is nul-terminated and outlives the call; `key` is a
        // valid out-pointer.
        let status =
            unsafe { RegOpenKeyExW(HKEY_LOCAL_MACHINE, PCWSTR(wide.as_ptr()), 0, access, &mut key) };

        if status == ERROR_SUCCESS {
            // SAFETY: `key` was opened above and is closed exactly once.
            unsafe {
                let _ = RegCloseKey(key);
            }
            KeyStatus::Present
        } else if status == ERROR_FILE_NOT_FOUND || status == ERROR_PATH_NOT_FOUND {
            KeyStatus::Missing
        } else if status == ERROR_ACCESS_DENIED {
            KeyStatus::Denied
        } else {
            KeyStatus::Failed(format!("error code {}", status.0))
        }
    }
}

/// Finds suites by probing [`SUITE_REGISTRY_KEYS`].
#[derive(Debug, Clone, Default)]
pub struct RegistrySource<H = LocalMachine> {
    hive: H,
}

impl RegistrySource<LocalMachine> {
    pub fn local_machine() -> Self {
        RegistrySource { hive: LocalMachine }
    }
}

impl<H: RegistryHive> RegistrySource<H> {
    pub fn new(hive: H) -> Self {
        RegistrySource { hive }
    }
}

impl<H: RegistryHive> SuiteSource for RegistrySource<H> {
    fn name(&self) -> &str {
        "registry"
    }

    fn suites(&self) -> Result<Vec<ToolchainVersion>, ProbeError> {
        let mut found = Vec::new();

        for (year, key) in SUITE_REGISTRY_KEYS {
            for view in RegistryView::ALL {
                match self.hive.open(key, view)? {
                    KeyStatus::Present => {
                        tracing::debug!("found HKLM\\{} ({:?})", key, view);
                        found.push(ToolchainVersion::new(*year));
                        break;
                    }
                    KeyStatus::Missing => continue,
                    KeyStatus::Denied => {
                        tracing::warn!(
                            "permission denied accessing registry key for Visual Studio {}",
                            year
                        );
                    }
                    KeyStatus::Failed(reason) => {
                        tracing::warn!(
                            "error accessing registry for Visual Studio {}: {}",
                            year,
                            reason
                        );
                    }
                }
            }
        }

        Ok(found)
    }
}
