// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 policygen contributors

//! Emission writer
//!
//! The document is written to a temporary file in the destination directory
//! and renamed over the output path, so readers only ever see the previous
//! file or the complete new one.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::{PolicygenError, PolicygenResult};
use crate::render::RenderedDocument;

/// Persist `document` at `output_path`, returning the written path
pub fn write(document: &RenderedDocument, output_path: &Path) -> PolicygenResult<PathBuf> {
    if output_path.is_dir() {
        return Err(PolicygenError::WriteError {
            path: output_path.to_path_buf(),
            error: "output path is a directory".into(),
            help: Some("Pass a file name, e.g. hardening.sh".into()),
        });
    }

    let parent = match output_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        return Err(PolicygenError::WriteError {
            path: output_path.to_path_buf(),
            error: format!("directory '{}' does not exist", parent.display()),
            help: Some("Create the destination directory first".into()),
        });
    }
    if !parent.is_dir() {
        return Err(PolicygenError::WriteError {
            path: output_path.to_path_buf(),
            error: format!("'{}' is not a directory", parent.display()),
            help: None,
        });
    }

    let fail = |e: std::io::Error| PolicygenError::write_failed(output_path, &e);

    // Removed on drop unless persisted
    let mut temp = tempfile::Builder::new()
        .prefix(".policygen-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(fail)?;
    debug!(temp = %temp.path().display(), "Writing temporary file");

    temp.write_all(document.as_str().as_bytes()).map_err(fail)?;
    temp.flush().map_err(fail)?;
    temp.as_file().sync_all().map_err(fail)?;
    set_mode(temp.path(), document.platform().file_mode()).map_err(fail)?;

    temp.persist(output_path).map_err(|e| fail(e.error))?;

    info!(
        path = %output_path.display(),
        bytes = document.as_str().len(),
        "Wrote {} document",
        document.platform()
    );
    Ok(output_path.to_path_buf())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Platform, RuleCatalog};
    use crate::config::UserConfig;
    use crate::render::Renderer;
    use tempfile::TempDir;

    fn document(platform: Platform) -> RenderedDocument {
        let standard = match platform {
            Platform::PowerShell => "CIS-Windows-11",
            _ => "CIS-Linux-v8",
        };
        Renderer::new(RuleCatalog::builtin())
            .render(standard, platform, &UserConfig::empty())
            .unwrap()
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_write_creates_file() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("harden.sh");
        let doc = document(Platform::Shell);

        let written = write(&doc, &output).unwrap();

        assert_eq!(written, output);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), doc.as_str());
        assert_eq!(entries(temp.path()), vec!["harden.sh"]);
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("site.yml");
        std::fs::write(&output, "old contents").unwrap();
        let doc = document(Platform::Ansible);

        write(&doc, &output).unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), doc.as_str());
        assert_eq!(entries(temp.path()), vec!["site.yml"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_modes() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let script = temp.path().join("harden.sh");
        let playbook = temp.path().join("harden.yml");
        write(&document(Platform::Shell), &script).unwrap();
        write(&document(Platform::Ansible), &playbook).unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&script), 0o755);
        assert_eq!(mode(&playbook), 0o644);
    }

    #[test]
    fn test_missing_directory_is_write_error() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("absent").join("harden.sh");

        let err = write(&document(Platform::Shell), &output).unwrap_err();

        assert!(matches!(err, PolicygenError::WriteError { .. }));
        assert!(entries(temp.path()).is_empty());
    }

    #[test]
    fn test_directory_output_is_write_error() {
        let temp = TempDir::new().unwrap();

        let err = write(&document(Platform::Shell), temp.path()).unwrap_err();

        assert!(matches!(err, PolicygenError::WriteError { .. }));
        assert!(entries(temp.path()).is_empty());
    }

    #[test]
    fn test_file_as_parent_is_write_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("not-a-dir");
        std::fs::write(&blocker, "plain file").unwrap();

        let err = write(&document(Platform::Shell), &blocker.join("harden.sh")).unwrap_err();

        match err {
            PolicygenError::WriteError { error, .. } => assert!(error.contains("not a directory")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(entries(temp.path()), vec!["not-a-dir"]);
        assert_eq!(std::fs::read_to_string(&blocker).unwrap(), "plain file");
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_directory_leaves_nothing_behind() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let locked = temp.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

        // Privileged users can still write; nothing to observe then
        let canary = locked.join("canary");
        if std::fs::write(&canary, b"").is_ok() {
            std::fs::remove_file(&canary).unwrap();
            return;
        }

        let err = write(&document(Platform::Shell), &locked.join("harden.sh")).unwrap_err();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        match err {
            PolicygenError::WriteError { help, .. } => assert!(help.is_some()),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(entries(&locked).is_empty());
    }
}
