use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Basic,
    Pro,
    Premium,
}

impl PlanTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Basic => "basic",
            PlanTier::Pro => "pro",
            PlanTier::Premium => "premium",
        }
    }

    /// Substring match over the stored plan name, case insensitive.
    /// Checked premium first so names like "Pro Premium" land in a
    /// single bucket.
    pub fn classify(plan_name: &str) -> Option<Self> {
        let name = plan_name.to_lowercase();
        if name.contains("premium") {
            Some(PlanTier::Premium)
        } else if name.contains("pro") {
            Some(PlanTier::Pro)
        } else if name.contains("basic") {
            Some(PlanTier::Basic)
        } else {
            None
        }
    }
}

impl Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
