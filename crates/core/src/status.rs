use serde::{Deserialize, Serialize};

/// Publication status of a content resource, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    /// Publicly visible.
    #[serde(rename = "publish")]
    Published,
    #[default]
    Draft,
    Pending,
    Private,
    Future,
    Trash,
}

impl ResourceStatus {
    /// Only published resources may serve as a login destination.
    pub fn is_published(self) -> bool {
        matches!(self, ResourceStatus::Published)
    }
}

impl core::fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            ResourceStatus::Published => "publish",
            ResourceStatus::Draft => "draft",
            ResourceStatus::Pending => "pending",
            ResourceStatus::Private => "private",
            ResourceStatus::Future => "future",
            ResourceStatus::Trash => "trash",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_publish_counts_as_published() {
        assert!(ResourceStatus::Published.is_published());
        for s in [
            ResourceStatus::Draft,
            ResourceStatus::Pending,
            ResourceStatus::Private,
            ResourceStatus::Future,
            ResourceStatus::Trash,
        ] {
            assert!(!s.is_published(), "{s} should not be published");
        }
    }

    #[test]
    fn serializes_with_host_names() {
        let json = serde_json::to_string(&ResourceStatus::Published).unwrap();
        assert_eq!(json, "\"publish\"");
        let draft: ResourceStatus = serde_json::from_str("\"draft\"").unwrap();
        assert_eq!(draft, ResourceStatus::Draft);
    }
}
