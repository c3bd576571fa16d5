use serde::{Deserialize, Serialize};

use super::field::{FieldError, validate_link, validate_remark};
use super::issue_list::Identity;

/// A link + remark pair attached to an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SolutionRecord")]
pub struct Solution {
    link: String,
    remark: String,
    primary: bool,
}

impl Solution {
    /// Create a non-primary solution from validated fields.
    pub fn new(link: &str, remark: &str) -> Result<Self, FieldError> {
        Ok(Solution {
            link: validate_link(link)?,
            remark: validate_remark(remark)?,
            primary: false,
        })
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn remark(&self) -> &str {
        &self.remark
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }

    /// Copy with the primary flag set to `primary`.
    pub fn with_primary(&self, primary: bool) -> Solution {
        Solution {
            primary,
            ..self.clone()
        }
    }

    /// Copy with the supplied fields replaced. The primary flag is kept.
    pub fn with_fields(
        &self,
        link: Option<&str>,
        remark: Option<&str>,
    ) -> Result<Solution, FieldError> {
        Ok(Solution {
            link: match link {
                Some(l) => validate_link(l)?,
                None => self.link.clone(),
            },
            remark: match remark {
                Some(r) => validate_remark(r)?,
                None => self.remark.clone(),
            },
            primary: self.primary,
        })
    }
}

impl Identity for Solution {
    /// Same link and same remark; the primary flag does not count.
    fn is_same(&self, other: &Self) -> bool {
        self.link == other.link && self.remark == other.remark
    }

    fn identity_key(&self) -> String {
        format!("{} ({})", self.link, self.remark)
    }
}

/// Unchecked on-disk shape, validated into a [`Solution`]
#[derive(Deserialize)]
struct SolutionRecord {
    link: String,
    remark: String,
    #[serde(default)]
    primary: bool,
}

impl TryFrom<SolutionRecord> for Solution {
    type Error = FieldError;

    fn try_from(record: SolutionRecord) -> Result<Self, Self::Error> {
        Ok(Solution::new(&record.link, &record.remark)?.with_primary(record.primary))
    }
}
