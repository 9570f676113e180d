/// Page outcome as recorded in the migration report
///
/// Only extracted pages get a report entry. Pages dropped after their fetch
/// attempts are exhausted are listed separately as failed URLs.
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    /// Page was fetched and extracted
    Success,
}
