use crate::clock::Clock;
use crate::error::{PreifyError, Result};
use crate::logging::LogLevel;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

pub mod args;
pub mod path;
pub mod stamp;

use args::Args;
use stamp::{StampFormat, TimeSource};

/// Exit status for every failure (`-1` as the platform reports it).
pub const EXIT_FAILURE: i32 = 255;

/// 起動時に一度だけ組み立て、以降は参照で渡す実行設定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub filename: PathBuf,
    pub include_time: bool,
    pub mod_time: bool,
    pub print_only: bool,
    pub log_level: LogLevel,
}

impl From<Args> for Options {
    fn from(args: Args) -> Self {
        Self {
            filename: args.filename,
            include_time: args.include_time,
            mod_time: args.mod_time,
            print_only: args.print_only,
            log_level: args.log_level,
        }
    }
}

/// preify 全体を実行し、結果に応じて終了コードを返す。
pub fn run(options: &Options, clock: &dyn Clock) -> i32 {
    let stdout = io::stdout();
    match preify(options, clock, &mut stdout.lock()) {
        Ok(_) => 0,
        Err(e) => {
            error!("{e}");
            EXIT_FAILURE
        }
    }
}

/// パス解決・時刻選択・名前合成を行い、表示またはリネームする。
///
/// Returns the destination path whether or not it was actually renamed to.
pub fn preify(options: &Options, clock: &dyn Clock, out: &mut impl Write) -> Result<PathBuf> {
    debug!(input = %options.filename.display(), "resolving path");
    let resolved = path::resolve(&options.filename)?;
    debug!(path = %resolved.absolute.display(), "resolved absolute path");

    let source = TimeSource::from_mod_time(options.mod_time);
    let time = stamp::select_time(source, &resolved, clock)?;
    debug!(?source, %time, "selected stamp time");

    let stamp = stamp::format_stamp(&time, StampFormat::from_include_time(options.include_time));
    let new_name = stamp::compose_name(&resolved.base, &stamp, &resolved.extension);
    let destination = resolved.parent.join(&new_name);
    debug!(name = %Path::new(&new_name).display(), "composed new name");

    if options.print_only {
        if path_entry_exists(&destination) {
            warn!(
                "'{}' already exists; renaming would fail",
                destination.display()
            );
        }
        // Raw bytes, so names that are not valid UTF-8 print unchanged.
        out.write_all(destination.as_os_str().as_encoded_bytes())
            .and_then(|()| out.write_all(b"\n"))
            .map_err(|e| PreifyError::io("cannot print", &destination, e))?;
        return Ok(destination);
    }

    rename_no_clobber(&resolved.absolute, &destination)?;
    info!(
        "renamed '{}' to '{}'",
        resolved.absolute.display(),
        destination.display()
    );
    Ok(destination)
}

/// 既存エントリを上書きせずにリネームする。
fn rename_no_clobber(from: &Path, to: &Path) -> Result<()> {
    if path_entry_exists(to) {
        return Err(PreifyError::DestinationExists {
            path: to.to_path_buf(),
        });
    }

    fs::rename(from, to).map_err(|source| PreifyError::Rename {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

/// ターゲット候補パスの存在をシンボリックリンクを含めて判定する。
fn path_entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
