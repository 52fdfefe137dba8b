use crate::error::{PreifyError, Result};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// 入力パスを絶対化し、親ディレクトリ・ベース名・拡張子に分解した結果。
#[derive(Debug)]
pub struct ResolvedPath {
    /// Absolute path of the entry to rename (`parent` joined with the final segment).
    pub absolute: PathBuf,
    pub parent: PathBuf,
    /// Final segment without its extension.
    pub base: OsString,
    /// Everything from the last `.` of the final segment, dot included; empty if none.
    pub extension: OsString,
    pub metadata: fs::Metadata,
}

/// 入力パスの存在を確認し、絶対パスへ解決して分解する。
pub fn resolve(input: &Path) -> Result<ResolvedPath> {
    let metadata = fs::metadata(input).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            PreifyError::NotFound {
                path: input.to_path_buf(),
            }
        } else {
            PreifyError::io("cannot stat", input, e)
        }
    })?;

    let absolute = absolutize(input)?;
    let (parent, file_name) = match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => (parent.to_path_buf(), name),
        _ => {
            return Err(PreifyError::io(
                "cannot rename",
                &absolute,
                io::Error::new(io::ErrorKind::InvalidInput, "path has no final segment"),
            ));
        }
    };

    let (base, extension) = split_file_name(file_name);
    Ok(ResolvedPath {
        base: base.to_os_string(),
        extension: extension.to_os_string(),
        absolute: parent.join(file_name),
        parent,
        metadata,
    })
}

/// Splits a final path segment at its last `.`.
///
/// `report.txt` gives `("report", ".txt")`, `data` gives `("data", "")` and a
/// dot file such as `.bashrc` gives `("", ".bashrc")`.
#[cfg(unix)]
pub fn split_file_name(name: &OsStr) -> (&OsStr, &OsStr) {
    use std::os::unix::ffi::OsStrExt;

    let bytes = name.as_bytes();
    match bytes.iter().rposition(|&b| b == b'.') {
        Some(idx) => (
            OsStr::from_bytes(&bytes[..idx]),
            OsStr::from_bytes(&bytes[idx..]),
        ),
        None => (name, OsStr::new("")),
    }
}

/// Splits a final path segment at its last `.`.
///
/// Names that are not valid Unicode are kept whole with no extension.
#[cfg(not(unix))]
pub fn split_file_name(name: &OsStr) -> (&OsStr, &OsStr) {
    match name.to_str().and_then(|s| s.rfind('.').map(|idx| s.split_at(idx))) {
        Some((base, ext)) => (OsStr::new(base), OsStr::new(ext)),
        None => (name, OsStr::new("")),
    }
}

/// 親ディレクトリのみ正規化し、最終要素はそのまま残す。
fn absolutize(input: &Path) -> Result<PathBuf> {
    let joined = std::path::absolute(input)
        .map_err(|e| PreifyError::io("cannot resolve absolute path of", input, e))?;

    match (joined.parent(), joined.file_name()) {
        // Keep the final segment as given so a symlink argument renames the link itself.
        (Some(parent), Some(name)) => {
            let parent = fs::canonicalize(parent)
                .map_err(|e| PreifyError::io("cannot resolve absolute path of", input, e))?;
            Ok(parent.join(name))
        }
        // `..` or the root: nothing to preserve, resolve it whole.
        _ => fs::canonicalize(&joined)
            .map_err(|e| PreifyError::io("cannot resolve absolute path of", input, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn split(name: &str) -> (&str, &str) {
        let (base, ext) = split_file_name(OsStr::new(name));
        (
            base.to_str().expect("utf-8 base"),
            ext.to_str().expect("utf-8 extension"),
        )
    }

    #[test]
    fn split_keeps_last_extension_only() {
        assert_eq!(split("report.txt"), ("report", ".txt"));
        assert_eq!(split("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split("data"), ("data", ""));
        assert_eq!(split(".bashrc"), ("", ".bashrc"));
        assert_eq!(split("trailing."), ("trailing", "."));
    }

    #[test]
    fn split_parts_rebuild_original_segment() {
        for name in ["report.txt", "archive.tar.gz", "data", ".bashrc", "a.b.c.d"] {
            let (base, ext) = split(name);
            assert_eq!(format!("{base}{ext}"), name);
        }
    }

    #[cfg(unix)]
    #[test]
    fn split_works_on_raw_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let (base, ext) = split_file_name(OsStr::from_bytes(b"caf\xe9.t\xfft"));
        assert_eq!(base.as_bytes(), b"caf\xe9");
        assert_eq!(ext.as_bytes(), b".t\xfft");
    }

    #[cfg(unix)]
    #[test]
    fn resolve_stat_failure_other_than_missing_is_io() {
        // ファイル配下のパスは ENOTDIR となり、NotFound ではなく I/O エラーに分類されることを確認する。
        let temp_dir = tempdir().expect("create tmp dir");
        let file = temp_dir.path().join("plain.txt");
        File::create(&file).expect("create file");

        let err = resolve(&file.join("child")).expect_err("stat under a file must fail");
        assert!(
            matches!(err, PreifyError::Io { context: "cannot stat", .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn resolve_missing_path_is_not_found() {
        let temp_dir = tempdir().expect("create tmp dir");
        let missing = temp_dir.path().join("missing.txt");

        let err = resolve(&missing).expect_err("missing path must fail");
        assert!(matches!(err, PreifyError::NotFound { path } if path == missing));
    }

    #[test]
    fn resolve_splits_existing_file() {
        let temp_dir = tempdir().expect("create tmp dir");
        let dir = temp_dir.path().canonicalize().expect("canonicalize tmp dir");
        File::create(dir.join("report.txt")).expect("create file");

        let resolved = resolve(&temp_dir.path().join("report.txt")).expect("resolve file");
        assert_eq!(resolved.parent, dir);
        assert_eq!(resolved.absolute, dir.join("report.txt"));
        assert_eq!(resolved.base, "report");
        assert_eq!(resolved.extension, ".txt");
        assert!(resolved.metadata.is_file());
    }

    #[test]
    fn resolve_normalizes_dot_dot_in_parent() {
        let temp_dir = tempdir().expect("create tmp dir");
        let dir = temp_dir.path().canonicalize().expect("canonicalize tmp dir");
        fs::create_dir(dir.join("sub")).expect("create sub dir");
        File::create(dir.join("notes.md")).expect("create file");

        let resolved = resolve(&dir.join("sub").join("..").join("notes.md")).expect("resolve");
        assert_eq!(resolved.absolute, dir.join("notes.md"));
    }

    #[test]
    fn resolve_trailing_dot_dot_names_the_directory() {
        let temp_dir = tempdir().expect("create tmp dir");
        let dir = temp_dir.path().canonicalize().expect("canonicalize tmp dir");
        fs::create_dir_all(dir.join("outer").join("inner")).expect("create dirs");

        let resolved =
            resolve(&dir.join("outer").join("inner").join("..")).expect("resolve directory");
        assert_eq!(resolved.absolute, dir.join("outer"));
        assert_eq!(resolved.base, "outer");
        assert_eq!(resolved.extension, "");
        assert!(resolved.metadata.is_dir());
    }

    #[test]
    fn resolve_root_has_no_final_segment() {
        let err = resolve(Path::new("/")).expect_err("root cannot be renamed");
        assert!(matches!(err, PreifyError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn resolve_keeps_symlink_as_final_segment() {
        let temp_dir = tempdir().expect("create tmp dir");
        let dir = temp_dir.path().canonicalize().expect("canonicalize tmp dir");
        File::create(dir.join("target.txt")).expect("create target");
        std::os::unix::fs::symlink(dir.join("target.txt"), dir.join("link.txt"))
            .expect("create symlink");

        let resolved = resolve(&dir.join("link.txt")).expect("resolve link");
        assert_eq!(resolved.absolute, dir.join("link.txt"));
        assert_eq!(resolved.base, "link");
    }

    #[cfg(unix)]
    #[test]
    fn resolve_dangling_symlink_is_not_found() {
        let temp_dir = tempdir().expect("create tmp dir");
        let link = temp_dir.path().join("dangling");
        std::os::unix::fs::symlink(temp_dir.path().join("nowhere"), &link)
            .expect("create symlink");

        let err = resolve(&link).expect_err("dangling link must fail");
        assert!(matches!(err, PreifyError::NotFound { .. }));
    }
}
