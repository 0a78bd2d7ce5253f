//! Category directory for one dialog session.

use shared::domain::{CategoryMap, CategoryRecord, SessionContext};
use tracing::{info, warn};

use crate::CategorySource;

/// Categories fetched when the dialog opened. Read-only for the rest of the
/// session and dropped when the dialog closes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDirectory {
    records: CategoryMap,
}

impl CategoryDirectory {
    pub fn new(records: CategoryMap) -> Self {
        Self { records }
    }

    /// Fetches the directory. A failed fetch is logged and yields an empty
    /// directory; the dialog still opens.
    pub async fn load(source: &dyn CategorySource, context: &SessionContext) -> Self {
        match source.fetch(context).await {
            Ok(records) => {
                info!(
                    employee_id = %context.employee_id,
                    categories = records.len(),
                    "category directory loaded"
                );
                Self::new(records)
            }
            Err(err) => {
                warn!(
                    employee_id = %context.employee_id,
                    "category directory unavailable, continuing with none: {err:#}"
                );
                Self::default()
            }
        }
    }

    pub fn get(&self, category: &str) -> Option<&CategoryRecord> {
        self.records.get(category)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True only for a known category whose policy is not the optional sentinel.
    pub fn requires_attachment(&self, category: &str) -> bool {
        self.get(category)
            .is_some_and(CategoryRecord::requires_attachment)
    }

    pub fn instructions(&self, category: &str) -> Option<&str> {
        self.get(category)?
            .attachment_message
            .as_deref()
            .filter(|message| !message.is_empty())
    }
}

impl FromIterator<(String, CategoryRecord)> for CategoryDirectory {
    fn from_iter<I: IntoIterator<Item = (String, CategoryRecord)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
