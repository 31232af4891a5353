//! Folder identity and the folder a store is bound to.

/// Opaque server identifier of a folder.
///
/// Entry ids are hex strings whose letter case is not significant, so two
/// ids compare equal regardless of case.
#[derive(Debug, Clone, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FolderId(String);

impl FolderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for FolderId {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl From<&str> for FolderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FolderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for FolderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The folder a store lists messages from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderBinding {
    /// Identity of the bound folder.
    pub id: FolderId,
    /// Label that records physically stored in this folder carry.
    pub label: String,
}

impl FolderBinding {
    pub fn new(id: impl Into<FolderId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_id_case_insensitive() {
        assert_eq!(FolderId::new("00ABCDEF"), FolderId::new("00abcdef"));
        assert_ne!(FolderId::new("00ABCDEF"), FolderId::new("00ABCDE0"));
    }
}
