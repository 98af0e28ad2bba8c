//! State of the single-file "lookup last type" form.

use tracing::debug;

use crate::allow_list::AllowList;
use crate::selection::PickedFile;
use crate::validation::ValidationError;

pub const LOOKUP_EXTENSIONS: [&str; 2] = [".xlsx", ".xls"];

#[derive(Debug, Clone)]
pub struct LookupForm {
    file: Option<PickedFile>,
    max_file_size: u64,
    allowed: AllowList,
    submitting: bool,
}

impl LookupForm {
    pub fn new(max_file_size: u64) -> Self {
        Self {
            file: None,
            max_file_size,
            allowed: AllowList::from_extensions(LOOKUP_EXTENSIONS),
            submitting: false,
        }
    }

    pub fn accept_attr(&self) -> String {
        self.allowed.accept_attr()
    }

    /// Takes the first file of a pick or drop. Type is checked before size;
    /// a rejected file leaves the form empty and the input must be cleared.
    pub fn choose(&mut self, file: Option<PickedFile>) -> Result<Option<&PickedFile>, ValidationError> {
        self.file = None;
        let Some(file) = file else {
            return Ok(None);
        };
        if !self.allowed.is_supported(&file.name) {
            debug!(name = %file.name, "lookup file rejected by type");
            return Err(ValidationError::UnsupportedType {
                name: file.name,
                allowed: self.allowed.extensions().to_vec(),
            });
        }
        if file.size > self.max_file_size {
            debug!(name = %file.name, size = file.size, "lookup file too large");
            return Err(ValidationError::FileTooLarge { name: file.name, max: self.max_file_size });
        }
        self.file = Some(file);
        Ok(self.file.as_ref())
    }

    pub fn file(&self) -> Option<&PickedFile> {
        self.file.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        self.file.is_some() && !self.submitting
    }

    /// `None` while a submission is already running.
    pub fn begin_submit(&mut self) -> Option<Result<(), ValidationError>> {
        if self.submitting {
            return None;
        }
        if self.file.is_none() {
            return Some(Err(ValidationError::MissingFile));
        }
        self.submitting = true;
        Some(Ok(()))
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn reset_submitting(&mut self) {
        self.submitting = false;
    }

    pub fn clear(&mut self) {
        self.file = None;
    }
}
