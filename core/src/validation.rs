use std::fmt;

use thiserror::Error;

use crate::allow_list::AllowList;
use crate::format::format_file_size;
use crate::selection::{DateRange, PickedFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangeProblem {
    MissingStart,
    MissingEnd,
    StartAfterEnd,
}

impl fmt::Display for DateRangeProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DateRangeProblem::MissingStart => "start date missing",
            DateRangeProblem::MissingEnd => "end date missing",
            DateRangeProblem::StartAfterEnd => "start date is after end date",
        };
        f.write_str(s)
    }
}

/// Why a submission or a file pick was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no operation selected")]
    MissingOperation,
    #[error("no function selected")]
    MissingFunction,
    #[error("no file chosen for upload")]
    MissingFile,
    #[error("no folder selected")]
    MissingFolder,
    #[error("no files selected in folder")]
    NoFilesSelected,
    #[error("file {name} exceeds the limit of {max} bytes")]
    FileTooLarge { name: String, max: u64 },
    #[error("file {name} has an unsupported type (allowed: {})", .allowed.join(", "))]
    UnsupportedType { name: String, allowed: Vec<String> },
    #[error("file {name} is empty")]
    EmptyFile { name: String },
    #[error("invalid date range: {0}")]
    InvalidDateRange(DateRangeProblem),
}

impl ValidationError {
    /// Stable snake_case identifier, used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingOperation => "missing_operation",
            ValidationError::MissingFunction => "missing_function",
            ValidationError::MissingFile => "missing_file",
            ValidationError::MissingFolder => "missing_folder",
            ValidationError::NoFilesSelected => "no_files_selected",
            ValidationError::FileTooLarge { .. } => "file_too_large",
            ValidationError::UnsupportedType { .. } => "unsupported_type",
            ValidationError::EmptyFile { .. } => "empty_file",
            ValidationError::InvalidDateRange(_) => "invalid_date_range",
        }
    }

    /// Toast text shown to the user.
    pub fn localized(&self) -> String {
        match self {
            ValidationError::MissingOperation => "กรุณาเลือก Operation ก่อน".to_string(),
            ValidationError::MissingFunction => "กรุณาเลือกฟังก์ชันก่อน".to_string(),
            ValidationError::MissingFile => "กรุณาเลือกไฟล์ก่อน".to_string(),
            ValidationError::MissingFolder => "กรุณาเลือกโฟลเดอร์ก่อน".to_string(),
            ValidationError::NoFilesSelected => "กรุณาเลือกไฟล์อย่างน้อย 1 ไฟล์".to_string(),
            ValidationError::FileTooLarge { name, max } => {
                format!("ไฟล์ \"{name}\" มีขนาดใหญ่เกินไป (สูงสุด {})", format_file_size(*max))
            }
            ValidationError::UnsupportedType { name, allowed } => {
                format!("ไฟล์ \"{name}\" ไม่ใช่ประเภทที่รองรับ ({})", allowed.join(", "))
            }
            ValidationError::EmptyFile { name } => format!("ไฟล์ \"{name}\" เป็นไฟล์ว่าง"),
            ValidationError::InvalidDateRange(DateRangeProblem::MissingStart) => {
                "กรุณาระบุวันที่เริ่มต้น".to_string()
            }
            ValidationError::InvalidDateRange(DateRangeProblem::MissingEnd) => {
                "กรุณาระบุวันที่สิ้นสุด".to_string()
            }
            ValidationError::InvalidDateRange(DateRangeProblem::StartAfterEnd) => {
                "วันที่เริ่มต้นต้องไม่มากกว่าวันที่สิ้นสุด".to_string()
            }
        }
    }
}

/// Checks one file: size limit first, then type, then emptiness.
pub fn validate_file(file: &PickedFile, max_size: u64, allowed: &AllowList) -> Result<(), ValidationError> {
    if file.size > max_size {
        return Err(ValidationError::FileTooLarge { name: file.name.clone(), max: max_size });
    }
    if !allowed.is_supported(&file.name) {
        return Err(ValidationError::UnsupportedType {
            name: file.name.clone(),
            allowed: allowed.extensions().to_vec(),
        });
    }
    if file.size == 0 {
        return Err(ValidationError::EmptyFile { name: file.name.clone() });
    }
    Ok(())
}

/// Validates files in order and stops at the first failure. Returns the file count.
pub fn validate_files(files: &[PickedFile], max_size: u64, allowed: &AllowList) -> Result<usize, ValidationError> {
    for file in files {
        validate_file(file, max_size, allowed)?;
    }
    Ok(files.len())
}

pub fn validate_date_range(range: &DateRange) -> Result<(), ValidationError> {
    match (range.start, range.end) {
        (None, _) => Err(ValidationError::InvalidDateRange(DateRangeProblem::MissingStart)),
        (_, None) => Err(ValidationError::InvalidDateRange(DateRangeProblem::MissingEnd)),
        (Some(s), Some(e)) if s > e => Err(ValidationError::InvalidDateRange(DateRangeProblem::StartAfterEnd)),
        _ => Ok(()),
    }
}
