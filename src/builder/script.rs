//! Rendering a build configuration as a Windows batch script.

use std::fmt;

use crate::util::fs::{file_stem, windows_display};

use super::configuration::BuildConfiguration;

const CONTINUATION: &str = " ^";
const INDENT: &str = "    ";

/// Ordered batch-script lines, without line terminators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSequence {
    lines: Vec<String>,
}

impl CommandSequence {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Script text with CRLF line endings, as `cmd` expects.
    pub fn to_script(&self) -> String {
        let mut script = self.lines.join("\r\n");
        script.push_str("\r\n");
        script
    }
}

impl fmt::Display for CommandSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Render the environment setup, the `cl` invocation and the link step.
///
/// The `cl` command spans several lines joined with `^`; every line but the
/// last carries the continuation.
pub fn render_command_sequence(config: &BuildConfiguration) -> CommandSequence {
    let mut lines = vec![
        format!("SET VCVARSALL_PATH={}", windows_display(&config.env_script)),
        String::new(),
        format!("CALL \"%VCVARSALL_PATH%\" {}", config.architecture),
        String::new(),
    ];

    let mut cl = vec![join_nonempty("cl", &config.compiler_flags.render())];

    cl.extend(
        config
            .include_paths
            .iter()
            .map(|dir| format!("{INDENT}/I\"{}\"", windows_display(dir))),
    );

    let object_dir = windows_display(&config.object_dir);
    let object_dir = object_dir.trim_end_matches('\\');
    match config.sources.as_slice() {
        [source] => cl.push(format!(
            "{INDENT}/Fo\"{}\\{}.obj\"",
            object_dir,
            file_stem(source)
        )),
        _ => cl.push(format!("{INDENT}/Fo\"{}\\\"", object_dir)),
    }
    cl.push(format!(
        "{INDENT}/Fe\"{}\"",
        windows_display(&config.binary_path)
    ));

    cl.extend(
        config
            .sources
            .iter()
            .map(|source| format!("{INDENT}\"{}\"", windows_display(source))),
    );

    cl.push(join_nonempty(
        &format!("{INDENT}/link"),
        &config.linker_flags.render(),
    ));
    cl.extend(
        config
            .lib_paths
            .iter()
            .map(|dir| format!("{INDENT}/LIBPATH:\"{}\"", windows_display(dir))),
    );

    let last = cl.len() - 1;
    lines.extend(cl.into_iter().enumerate().map(|(i, line)| {
        if i < last {
            line + CONTINUATION
        } else {
            line
        }
    }));

    CommandSequence { lines }
}

fn join_nonempty(head: &str, tail: &str) -> String {
    if tail.is_empty() {
        head.to_string()
    } else {
        format!("{} {}", head, tail)
    }
}
