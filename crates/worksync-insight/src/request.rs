//! Payload sent to the insight service

use chrono::NaiveDate;
use serde::Serialize;
use worksync_api::AttendanceRecord;
use worksync_util::EmployeeId;

use crate::InsightResult;

/// Default number of trailing records sent for context
pub const DEFAULT_MAX_RECORDS: usize = 50;

const PROMPT_PREAMBLE: &str = "Analyze this employee work data and provide management insights \
for the CEO. Focus on team productivity, potential burnout, and work-life balance.";

/// One record reduced to what the service needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightSample {
    pub emp_id: EmployeeId,
    pub date: NaiveDate,
    /// `null` while the record is still open
    pub duration: Option<u32>,
}

impl From<&AttendanceRecord> for InsightSample {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            emp_id: record.employee_id.clone(),
            date: record.date,
            duration: record.duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InsightRequest {
    samples: Vec<InsightSample>,
}

impl InsightRequest {
    /// Keep the last `max` records in storage order
    pub fn from_records(records: &[AttendanceRecord], max: usize) -> Self {
        let start = records.len().saturating_sub(max);
        Self {
            samples: records[start..].iter().map(InsightSample::from).collect(),
        }
    }

    pub fn samples(&self) -> &[InsightSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Prompt text with the samples embedded as JSON
    pub fn prompt(&self) -> InsightResult<String> {
        let data = serde_json::to_string(&self.samples)?;
        Ok(format!("{}\nData: {}", PROMPT_PREAMBLE, data))
    }
}
