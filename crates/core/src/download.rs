use serde::Serialize;

use crate::error::InputError;
use crate::language::Language;
use crate::session::Session;

pub const TEXT_PLAIN: &str = "text/plain";

/// A file ready to be saved locally
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadArtifact {
    pub filename: String,
    pub content: String,
    pub mime_type: &'static str,
}

/// Pick the name of the downloaded file
///
/// The server-provided name wins unmodified; otherwise a name is synthesized
/// from the timestamp (milliseconds since the epoch) and the language's
/// extension.
pub fn download_filename(server_filename: Option<&str>, language: &Language, now_millis: i64) -> String {
    match server_filename {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("generated_code_{}.{}", now_millis, language.extension()),
    }
}

/// Build the artifact for the session's generated code
pub fn prepare_download(
    session: &Session,
    language: &Language,
    now_millis: i64,
) -> Result<DownloadArtifact, InputError> {
    if !session.can_download() {
        return Err(InputError::NothingToDownload);
    }

    Ok(DownloadArtifact {
        filename: download_filename(session.current_filename(), language, now_millis),
        content: session.generated_code().to_string(),
        mime_type: TEXT_PLAIN,
    })
}
