//! Shell plugin installation.
//!
//! Copies the vendored plugin trees into the user-owned plugin directory,
//! regenerates the managed loader, and makes sure the user's `.zshrc`
//! sources it exactly once.

use std::fs;

use tracing::debug;

use super::{copy_dir_recursive, InstallError, InstallMode, Report};
use crate::paths::Paths;

/// Vendored plugins, in load order. Syntax highlighting must stay last.
pub const PLUGINS: &[&str] = &[
    "zsh-autosuggestions",
    "zsh-history-substring-search",
    "zsh-syntax-highlighting",
];

/// Substring that identifies our source line in a shell rc file.
const LOADER_HINT: &str = "zsh/glint.zsh";

pub struct PluginInstaller<'a> {
    paths: &'a Paths,
}

impl<'a> PluginInstaller<'a> {
    pub fn new(paths: &'a Paths) -> Self {
        Self { paths }
    }

    pub fn install(&self, mode: InstallMode) -> Result<Report, InstallError> {
        let vendor = self
            .paths
            .vendor_plugin_dir()
            .filter(|p| p.is_dir())
            .ok_or(InstallError::MissingResource("zsh plugin bundle"))?;

        let mut report = Report::default();
        let plugin_dir = self.paths.plugin_dir();
        fs::create_dir_all(&plugin_dir).map_err(|e| InstallError::io("create", &plugin_dir, e))?;

        let verb = match mode {
            InstallMode::Fresh => "installed",
            InstallMode::Update => "added by update",
        };

        for name in PLUGINS {
            let src = vendor.join(name);
            if !src.is_dir() {
                report.skipped(format!("{name}: missing from vendor bundle"));
                continue;
            }
            let dst = plugin_dir.join(name);
            // An existing directory counts as installed no matter what it
            // contains; user edits to a plugin tree are never clobbered.
            if dst.exists() {
                debug!("{name} already present at {}", dst.display());
                report.skipped(format!("{name}: already installed"));
                continue;
            }
            copy_dir_recursive(&src, &dst)?;
            report.applied(format!("{verb} {name}"));
        }

        self.write_loader(&mut report)?;
        self.ensure_rc_source_line(&mut report)?;
        Ok(report)
    }

    /// The loader is managed output and is regenerated whenever its
    /// content drifts from the expected text.
    fn write_loader(&self, report: &mut Report) -> Result<(), InstallError> {
        let loader = self.paths.loader_file();
        let body = self.loader_body();
        if fs::read_to_string(&loader).is_ok_and(|current| current == body) {
            report.skipped("loader already current");
            return Ok(());
        }
        fs::write(&loader, body).map_err(|e| InstallError::io("write", &loader, e))?;
        report.applied(format!("wrote loader {}", loader.display()));
        Ok(())
    }

    fn loader_body(&self) -> String {
        format!(
            r#"# Managed by glint-setup; regenerated on every install pass. Do not edit.
typeset -g GLINT_ZSH_DIR="{zsh_dir}"

if [[ -d "$GLINT_ZSH_DIR/bin" ]]; then
  export PATH="$GLINT_ZSH_DIR/bin:$PATH"
fi

# Load order matters: syntax highlighting hooks the line editor and must
# come last.
for rel in \
  zsh-autosuggestions/zsh-autosuggestions.zsh \
  zsh-history-substring-search/zsh-history-substring-search.zsh \
  zsh-syntax-highlighting/zsh-syntax-highlighting.zsh; do
  [[ -f "$GLINT_ZSH_DIR/plugins/$rel" ]] && source "$GLINT_ZSH_DIR/plugins/$rel"
done
"#,
            zsh_dir = self.paths.zsh_dir().display()
        )
    }

    /// Appends the source line unless some line already references the
    /// loader. Detection is by substring so a hand-edited variant counts.
    fn ensure_rc_source_line(&self, report: &mut Report) -> Result<(), InstallError> {
        let rc = &self.paths.zshrc;
        let current = match fs::read_to_string(rc) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(InstallError::io("read", rc, err)),
        };

        if current.lines().any(|line| line.contains(LOADER_HINT)) {
            report.skipped(format!("{} already sources the loader", rc.display()));
            return Ok(());
        }

        let loader = self.paths.loader_file();
        let mut updated = current;
        if !updated.is_empty() && !updated.ends_with('\n') {
            updated.push('\n');
        }
        updated.push_str(&format!(
            "[[ -f \"{loader}\" ]] && source \"{loader}\"\n",
            loader = loader.display()
        ));
        fs::write(rc, updated).map_err(|e| InstallError::io("write", rc, e))?;
        report.applied(format!("added loader source line to {}", rc.display()));
        Ok(())
    }
}
