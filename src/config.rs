use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "LYNLOCKE_DATA_DIR";
pub const TEAMS_FILE: &str = "teams.json";
pub const CONTACTS_FILE: &str = "contacts.json";

/// Resolve the data directory: explicit flag, then env var, then the
/// platform local data dir.
pub fn data_dir(override_dir: Option<&Path>) -> PathBuf {
    override_dir
        .map(Path::to_path_buf)
        .or_else(|| {
            std::env::var_os(DATA_DIR_ENV)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        })
        .or_else(|| dirs_next::data_local_dir().map(|dir| dir.join("lynlocke")))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn teams_path(dir: &Path) -> PathBuf {
    dir.join(TEAMS_FILE)
}

pub fn contacts_path(dir: &Path) -> PathBuf {
    dir.join(CONTACTS_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins() {
        let dir = data_dir(Some(Path::new("/tmp/lynlocke-test")));
        assert_eq!(teams_path(&dir), PathBuf::from("/tmp/lynlocke-test/teams.json"));
        assert_eq!(contacts_path(&dir), PathBuf::from("/tmp/lynlocke-test/contacts.json"));
    }
}
