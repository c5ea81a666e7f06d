use crate::error::Error;
use crate::wider::PodWithWider;

pub struct JsonFormatter;

impl JsonFormatter {
    pub fn format(records: &[PodWithWider<'_>]) -> Result<String, Error> {
        serde_json::to_string_pretty(records).map_err(|e| Error::serialization(e.to_string()))
    }
}
