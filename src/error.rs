//! Error types for remove-glob
//!
//! Defines RemoveError and the per-path failure record collected during deletion.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// 削除に失敗した単一パス
#[derive(Debug)]
pub struct PathFailure {
    pub path: PathBuf,
    pub error: io::Error,
}

impl fmt::Display for PathFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}

/// remove-glob のエラー型
#[derive(Debug)]
pub enum RemoveError {
    // 設定エラー（ファイルシステムに触れる前に検出）
    /// paths も glob も指定されていない
    MissingInput,
    /// paths と glob の同時指定
    MutuallyExclusive,
    /// glob パターンのコンパイル失敗
    InvalidPattern { pattern: String, reason: String },
    /// cwd が存在しない、またはディレクトリではない
    InvalidCwd(PathBuf),

    // 削除エラー
    /// 一部のパスの削除に失敗（残りは処理済み）
    PartialFailure {
        removed: usize,
        failures: Vec<PathFailure>,
    },

    // システムエラー
    /// I/O エラー
    Io(io::Error),
}

impl RemoveError {
    /// 終了コードを取得
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// 設定エラーかどうか（リトライ不可、ファイルシステム未変更）
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::MissingInput
                | Self::MutuallyExclusive
                | Self::InvalidPattern { .. }
                | Self::InvalidCwd(_)
        )
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::MissingInput => "Please make sure to provide file paths via command arguments or via `--glob` pattern, \
                 i.e.: \"remove dir\" or \"remove --glob dir/**/*.js\""
                .to_string(),
            Self::MutuallyExclusive => "Providing both `--paths` and `--glob` pattern at the same time is not supported, \
                 you must chose only one."
                .to_string(),
            Self::InvalidPattern { pattern, reason } => {
                format!("invalid glob pattern '{}': {}", pattern, reason)
            }
            Self::InvalidCwd(path) => {
                format!("cannot use '{}' as cwd: Not a directory", path.display())
            }
            Self::PartialFailure { removed, failures } => {
                let mut msg = format!("{} item(s) removed, {} failed", removed, failures.len());
                for failure in failures {
                    msg.push_str(&format!("\n  {}", failure));
                }
                msg
            }
            Self::Io(e) => format!("I/O error: {}", e),
        }
    }
}

impl fmt::Display for RemoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for RemoveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::PartialFailure { failures, .. } => failures
                .first()
                .map(|f| &f.error as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl From<io::Error> for RemoveError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
