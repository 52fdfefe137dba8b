use super::path::ResolvedPath;
use crate::clock::Clock;
use crate::error::{PreifyError, Result};
use chrono::{DateTime, Local, TimeDelta, Utc};
use std::ffi::{OsStr, OsString};
use std::io;
use std::time::{SystemTime, UNIX_EPOCH};

/// Literal placed between the base name and the formatted time.
pub const MARKER: &str = ".pre-";

/// スタンプの書式（日付のみ／日付と時刻）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampFormat {
    Date,
    DateTime,
}

impl StampFormat {
    pub fn from_include_time(include_time: bool) -> Self {
        if include_time {
            Self::DateTime
        } else {
            Self::Date
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            Self::Date => "%Y-%m-%d",
            Self::DateTime => "%Y-%m-%d_%H-%M-%S",
        }
    }
}

/// スタンプに使う時刻の取得元。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource {
    Now,
    Modified,
}

impl TimeSource {
    pub fn from_mod_time(mod_time: bool) -> Self {
        if mod_time {
            Self::Modified
        } else {
            Self::Now
        }
    }
}

/// 取得元に応じて現在時刻または最終更新時刻を返す。
pub fn select_time(
    source: TimeSource,
    resolved: &ResolvedPath,
    clock: &dyn Clock,
) -> Result<DateTime<Local>> {
    match source {
        TimeSource::Now => Ok(clock.now()),
        TimeSource::Modified => {
            let modified = resolved.metadata.modified().map_err(|e| {
                PreifyError::io("cannot read modification time of", &resolved.absolute, e)
            })?;
            system_time_to_local(modified).ok_or_else(|| {
                PreifyError::io(
                    "cannot read modification time of",
                    &resolved.absolute,
                    io::Error::new(
                        io::ErrorKind::InvalidData,
                        "modification time is out of range",
                    ),
                )
            })
        }
    }
}

/// `SystemTime` を範囲外でもパニックせずにローカル時刻へ変換する。
///
/// Returns `None` when the instant (or its local-offset neighborhood) falls
/// outside what chrono can represent.
fn system_time_to_local(time: SystemTime) -> Option<DateTime<Local>> {
    let utc = match time.duration_since(UNIX_EPOCH) {
        Ok(after) => {
            let secs = i64::try_from(after.as_secs()).ok()?;
            DateTime::<Utc>::from_timestamp(secs, after.subsec_nanos())?
        }
        Err(e) => {
            let before = e.duration();
            let secs = i64::try_from(before.as_secs()).ok()?;
            match before.subsec_nanos() {
                0 => DateTime::<Utc>::from_timestamp(secs.checked_neg()?, 0)?,
                nanos => DateTime::<Utc>::from_timestamp(
                    secs.checked_neg()?.checked_sub(1)?,
                    1_000_000_000 - nanos,
                )?,
            }
        }
    };

    // Leave room for any local offset so formatting never leaves chrono's range.
    let margin = TimeDelta::days(1);
    utc.checked_add_signed(margin)?;
    utc.checked_sub_signed(margin)?;
    Some(utc.with_timezone(&Local))
}

pub fn format_stamp(time: &DateTime<Local>, format: StampFormat) -> String {
    time.format(format.pattern()).to_string()
}

/// `base` + [`MARKER`] + `stamp` + `extension`. The extension already carries
/// its dot, so an empty one leaves no trailing dot.
pub fn compose_name(base: &OsStr, stamp: &str, extension: &OsStr) -> OsString {
    let mut name =
        OsString::with_capacity(base.len() + MARKER.len() + stamp.len() + extension.len());
    name.push(base);
    name.push(MARKER);
    name.push(stamp);
    name.push(extension);
    name
}
