use std::env;

/// Workflow order used by [`StatusPolicy::Forward`].
pub const PENDING: &str = "Pending";
pub const ASSIGNED: &str = "Assigned";
pub const IN_PROGRESS: &str = "In Progress";
pub const COMPLETED: &str = "Completed";
pub const CANCELLED: &str = "Cancelled";

const FORWARD_ORDER: [&str; 4] = [PENDING, ASSIGNED, IN_PROGRESS, COMPLETED];

/// Which status rewrites an update may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Any status present in the lookup table may be written.
    #[default]
    Free,
    /// Moves only forward along the workflow; Completed and Cancelled are terminal.
    Forward,
}

impl StatusPolicy {
    pub fn from_env() -> Self {
        match env::var("STATUS_POLICY") {
            Ok(raw) => Self::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("Unknown STATUS_POLICY '{}', using free", raw);
                Self::Free
            }),
            Err(_) => Self::Free,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "free" => Some(Self::Free),
            "forward" => Some(Self::Forward),
            _ => None,
        }
    }

    /// `from`/`to` are status labels. Labels outside the known workflow are only
    /// reachable (and only left) under the free policy.
    pub fn allows(&self, from: &str, to: &str) -> bool {
        match self {
            Self::Free => true,
            Self::Forward => {
                if from == to {
                    return true;
                }
                if from == COMPLETED || from == CANCELLED {
                    return false;
                }
                if to == CANCELLED {
                    return FORWARD_ORDER.contains(&from);
                }
                match (rank(from), rank(to)) {
                    (Some(a), Some(b)) => b > a,
                    _ => false,
                }
            }
        }
    }
}

fn rank(label: &str) -> Option<usize> {
    FORWARD_ORDER.iter().position(|s| *s == label)
}
