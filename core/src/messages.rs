//! User-facing notices. Texts are Thai, matching the rest of the portal.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Success => "success",
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Level::Info => "fas fa-info-circle",
            Level::Success => "fas fa-check-circle",
            Level::Warning => "fas fa-exclamation-triangle",
            Level::Error => "fas fa-times-circle",
        }
    }
}

/// A toast or inline alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

impl Notice {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self { level, message: message.into() }
    }
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Level::Success, message)
    }
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level.as_str(), self.message)
    }
}

pub fn folders_load_failed() -> String {
    "ไม่สามารถโหลดรายการโฟลเดอร์ได้".to_string()
}

pub fn folder_files_failed() -> String {
    "ไม่สามารถโหลดรายการไฟล์ได้".to_string()
}

pub fn folder_files_error() -> String {
    "เกิดข้อผิดพลาดในการโหลดไฟล์".to_string()
}

pub fn folder_empty() -> String {
    "ไม่พบไฟล์ในโฟลเดอร์นี้".to_string()
}

pub fn data_all_failed() -> String {
    "ไม่สามารถโหลดไฟล์ใน data_all ได้".to_string()
}

pub fn files_chosen(count: usize) -> String {
    format!("เลือกไฟล์แล้ว: {count} ไฟล์")
}

pub fn upload_cancelled() -> String {
    "ยกเลิกการเลือกไฟล์".to_string()
}

pub fn selected_count(count: usize) -> String {
    format!("เลือกแล้ว: {count} ไฟล์")
}

pub fn function_selected(name: &str) -> String {
    format!("เลือกฟังก์ชัน: {name}")
}

pub fn preview_failed(detail: &str) -> String {
    format!("ไม่สามารถอ่านช่วงวันที่จากไฟล์ได้: {detail}")
}

pub fn processing() -> String {
    "กำลังประมวลผล...".to_string()
}

pub fn processing_failed() -> String {
    "เกิดข้อผิดพลาดในการประมวลผล กรุณาลองใหม่อีกครั้ง".to_string()
}

pub fn copied() -> String {
    "คัดลอกข้อมูลแล้ว".to_string()
}

pub fn copy_failed() -> String {
    "ไม่สามารถคัดลอกข้อมูลได้".to_string()
}

pub fn search_cleared() -> String {
    "ล้างการค้นหาแล้ว".to_string()
}

pub fn search_prompt() -> String {
    "กรุณาพิมพ์คำที่ต้องการค้นหา".to_string()
}

pub fn search_no_match(term: &str) -> String {
    format!("ไม่พบข้อมูลที่ตรงกับ \"{term}\"")
}

pub fn search_found(visible: usize, total: usize) -> String {
    format!("พบ {visible} รายการจาก {total} รายการทั้งหมด")
}

pub fn export_failed() -> String {
    "ไม่สามารถส่งออกข้อมูลได้".to_string()
}

pub fn filter_summary(active: usize, total: usize, visible: usize) -> String {
    format!("ใช้ตัวกรอง {active}/{total} แสดง {visible} รายการ")
}

pub fn filter_all(header: &str) -> String {
    format!("ทั้งหมด ({header})")
}

pub fn row_details_title() -> String {
    "รายละเอียดแถว".to_string()
}

pub fn ready_to_upload() -> String {
    "พร้อมอัปโหลด".to_string()
}

pub fn downloading() -> String {
    "กำลังดาวน์โหลดไฟล์...".to_string()
}
