use std::path::PathBuf;

#[derive(Debug, Clone)]
pub(crate) struct AppState {
    pub(crate) site_root: PathBuf,
    pub(crate) content_path: PathBuf,
}
