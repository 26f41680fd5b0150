//! Build modes, target architectures and the compiler/linker flag presets.
//!
//! Flags are kept in a [`FlagMap`]: an insertion-ordered map from flag to an
//! optional argument. Presets are laid down first, the architecture flag is
//! overlaid next, and caller overrides go last.

use std::fmt;
use std::str::FromStr;

use super::errors::BuildError;

/// Build mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Optimized build with whole-program optimization and LTCG.
    #[default]
    Release,
    /// Unoptimized build with debug info and runtime checks.
    Debug,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Release => "release",
            Mode::Debug => "debug",
        }
    }

    /// Preset compiler and linker flags for this mode.
    pub fn preset(&self) -> (FlagMap, FlagMap) {
        let (compiler, linker): (&[&str], &[&str]) = match self {
            Mode::Release => (
                &[
                    "/O2",
                    "/Ot",
                    "/GL",
                    "/Ob2",
                    "/Gm-",
                    "/GS-",
                    "/MP",
                    "/EHsc",
                    "/fp:precise",
                ],
                &["/LTCG", "/OPT:REF", "/OPT:ICF"],
            ),
            Mode::Debug => (
                &["/Zi", "/Od", "/RTC1", "/Gm", "/EHsc"],
                &["/DEBUG", "/OPT:NOREF", "/OPT:NOICF"],
            ),
        };

        (
            compiler.iter().map(|f| (*f, "")).collect(),
            linker.iter().map(|f| (*f, "")).collect(),
        )
    }
}

impl FromStr for Mode {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "release" => Ok(Mode::Release),
            "debug" => Ok(Mode::Debug),
            _ => Err(BuildError::InvalidMode {
                mode: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Architecture {
    #[default]
    X64,
    X86,
}

impl Architecture {
    /// The name used by `vcvarsall.bat` and the SDK directory layout.
    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::X64 => "x64",
            Architecture::X86 => "x86",
        }
    }

    /// The `/arch:` instruction-set flag for this architecture.
    pub fn simd_flag(&self) -> &'static str {
        match self {
            Architecture::X64 => "/arch:AVX2",
            Architecture::X86 => "/arch:SSE2",
        }
    }
}

impl FromStr for Architecture {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x64" => Ok(Architecture::X64),
            "x86" => Ok(Architecture::X86),
            _ => Err(BuildError::InvalidArchitecture {
                arch: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insertion-ordered map of flag to argument.
///
/// An empty argument means the flag is emitted on its own. Setting a flag
/// that is already present replaces its argument in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagMap {
    entries: Vec<(String, String)>,
}

impl FlagMap {
    pub fn new() -> Self {
        FlagMap {
            entries: Vec::new(),
        }
    }

    /// Set a flag, replacing the argument of an existing entry.
    pub fn set(&mut self, flag: impl Into<String>, value: impl Into<String>) {
        let flag = flag.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == flag) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((flag, value)),
        }
    }

    /// Overlay `other` onto this map; `other` wins on collision.
    pub fn merge(&mut self, other: &FlagMap) {
        for (flag, value) in other.iter() {
            self.set(flag, value);
        }
    }

    pub fn get(&self, flag: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == flag)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.get(flag).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a command-line flag spec: the first space separates the flag
    /// from its argument, e.g. `"/D NDEBUG"` or `"/favor:Intel64"`.
    pub fn parse_spec(spec: &str) -> (String, String) {
        match spec.trim().split_once(char::is_whitespace) {
            Some((flag, value)) => (flag.to_string(), value.trim().to_string()),
            None => (spec.trim().to_string(), String::new()),
        }
    }

    /// Render as a space-separated command-line fragment.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (flag, value) in self.iter() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(flag);
            if !value.is_empty() {
                out.push(' ');
                out.push_str(value);
            }
        }
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FlagMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FlagMap::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}

/// Resolve the final compiler and linker flags for a mode and architecture.
pub fn resolve_flags(
    mode: Mode,
    arch: Architecture,
    compiler_overrides: &FlagMap,
    linker_overrides: &FlagMap,
) -> (FlagMap, FlagMap) {
    let (mut compiler, mut linker) = mode.preset();
    compiler.set(arch.simd_flag(), "");
    compiler.merge(compiler_overrides);
    linker.merge(linker_overrides);
    (compiler, linker)
}
