//! Per-file download plan.

use super::range::{format_parts, partition, ByteRange};
use crate::error::DownloadError;
use crate::url_model::ResourceLocation;

/// What to fetch for one index entry: where, how big, and which ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPlan {
    pub resource: ResourceLocation,
    pub size: u64,
    pub ranges: Vec<ByteRange>,
}

impl DownloadPlan {
    pub fn new(
        resource: ResourceLocation,
        size: u64,
        workers: usize,
    ) -> Result<Self, DownloadError> {
        let ranges = partition(size, workers)?;
        Ok(Self {
            resource,
            size,
            ranges,
        })
    }

    pub fn parts_summary(&self) -> String {
        format_parts(&self.ranges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_carries_partition() {
        let loc = ResourceLocation::parse("example.com/f.txt").unwrap();
        let plan = DownloadPlan::new(loc.clone(), 1000, 4).unwrap();
        assert_eq!(plan.resource, loc);
        assert_eq!(plan.ranges.len(), 4);
        assert_eq!(
            plan.parts_summary(),
            "0 - 250 (251), 251 - 500 (250), 501 - 750 (250), 751 - 1000 (250)"
        );
    }

    #[test]
    fn plan_rejects_small_file() {
        let loc = ResourceLocation::parse("example.com/f.txt").unwrap();
        assert!(DownloadPlan::new(loc, 3, 5).is_err());
    }
}
