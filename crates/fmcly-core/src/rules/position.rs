// ── Access rule placement hints ──
//
// Placement is only expressible in the submission query string, and it is
// fixed when the builder is created.

use strum::{Display, EnumString};
use url::form_urlencoded;

/// Policy section an access rule is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RuleSection {
    Mandatory,
    Default,
}

/// Where a new access rule lands inside its policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulePosition {
    pub category: Option<String>,
    pub insert_before: Option<u32>,
    pub insert_after: Option<u32>,
    pub section: Option<RuleSection>,
}

impl RulePosition {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.insert_before.is_none()
            && self.insert_after.is_none()
            && self.section.is_none()
    }

    /// `?category=..&insertBefore=..&insertAfter=..&section=..` with only the
    /// parameters that are set, or an empty string when none are.
    pub fn query_suffix(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(category) = &self.category {
            query.append_pair("category", category);
        }
        if let Some(before) = self.insert_before {
            query.append_pair("insertBefore", &before.to_string());
        }
        if let Some(after) = self.insert_after {
            query.append_pair("insertAfter", &after.to_string());
        }
        if let Some(section) = self.section {
            query.append_pair("section", &section.to_string());
        }
        format!("?{}", query.finish())
    }
}
