use crate::error::Error;
use crate::wider::PodWithWider;

pub struct YamlFormatter;

impl YamlFormatter {
    pub fn format(records: &[PodWithWider<'_>]) -> Result<String, Error> {
        serde_yaml::to_string(records).map_err(|e| Error::serialization(e.to_string()))
    }
}
