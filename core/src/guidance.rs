//! Static operation → function table.
//!
//! Each function entry carries the accepted-file labels shown in the help panel.
//! The allow-list of a function is derived from those labels
//! (see [`crate::allow_list::AllowList::from_labels`]).

/// Help-panel data for one processing function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionGuidance {
    pub name: &'static str,
    pub accepted_files: &'static [&'static str],
    pub description: &'static str,
    pub example: &'static str,
}

/// One operation button and its functions, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationGuidance {
    pub name: &'static str,
    /// Font Awesome class of the operation button.
    pub icon: &'static str,
    pub functions: &'static [FunctionGuidance],
}

const SPREADSHEET_LABELS: &[&str] = &["Excel (.xlsx, .xls)", "CSV (.csv)"];

pub static GUIDANCE: &[OperationGuidance] = &[
    OperationGuidance {
        name: "Singulation",
        icon: "fas fa-cut",
        functions: &[FunctionGuidance {
            name: "LOGVIEW",
            accepted_files: &["TXT", "txt"],
            description: "ไฟล์ข้อมูล Singulation",
            example: "MC 12.txt",
        }],
    },
    OperationGuidance {
        name: "Pick & Place",
        icon: "fas fa-hand-paper",
        functions: &[
            FunctionGuidance {
                name: "PNP_CHANG_TYPE",
                accepted_files: SPREADSHEET_LABELS,
                description: "ไฟล์ข้อมูล Pick & Place ที่มีคอลั่ม assy_pack_type, bom_no ของแต่ละเดือน",
                example: "ตัวอย่าง: WF size Apr1-Apr30'23 (UTL1)",
            },
            FunctionGuidance {
                name: "PNP_AUTO_UPH",
                accepted_files: SPREADSHEET_LABELS,
                description: "ไฟล์ข้อมูล Pick & Place Auto UPH",
                example: "ตัวอย่าง: pnp_data.xlsx",
            },
        ],
    },
    OperationGuidance {
        name: "DA",
        icon: "fas fa-microchip",
        functions: &[FunctionGuidance {
            name: "DIE_ATTACK_AUTO_UPH",
            accepted_files: SPREADSHEET_LABELS,
            description: "ไฟล์ข้อมูล Die Attack Auto UPH",
            example: "ตัวอย่าง: die_attack_data.xlsx",
        }],
    },
    OperationGuidance {
        name: "WB",
        icon: "fas fa-link",
        functions: &[FunctionGuidance {
            name: "WB_AUTO_UPH",
            accepted_files: SPREADSHEET_LABELS,
            description: "ไฟล์ข้อมูล Wire Bond Auto UPH",
            example: "ตัวอย่าง: wb_data.xlsx",
        }],
    },
];

/// Functions whose help panel links to the "lookup last type" page.
pub const LOOKUP_FUNCTIONS: &[&str] = &["PNP_CHANG_TYPE"];

/// Functions that process a date window and need a start/end date.
pub const DATE_RANGE_FUNCTIONS: &[&str] = &["PNP_AUTO_UPH", "WB_AUTO_UPH"];

/// The function whose helper listing reads the server's `data_all` directory.
pub const DATA_ALL_FUNCTION: &str = "LOGVIEW";

pub fn operations() -> impl Iterator<Item = &'static OperationGuidance> {
    GUIDANCE.iter()
}

pub fn operation(name: &str) -> Option<&'static OperationGuidance> {
    GUIDANCE.iter().find(|op| op.name == name)
}

/// Function entries of `operation`, or `None` when the operation is unknown.
pub fn functions_for(operation_name: &str) -> Option<&'static [FunctionGuidance]> {
    operation(operation_name).map(|op| op.functions)
}

pub fn find(operation_name: &str, function: &str) -> Option<&'static FunctionGuidance> {
    functions_for(operation_name)?.iter().find(|f| f.name == function)
}

pub fn requires_lookup(function: &str) -> bool {
    LOOKUP_FUNCTIONS.contains(&function)
}

pub fn requires_date_range(function: &str) -> bool {
    DATE_RANGE_FUNCTIONS.contains(&function)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operations_keep_display_order() {
        let names: Vec<_> = operations().map(|op| op.name).collect();
        assert_eq!(names, vec!["Singulation", "Pick & Place", "DA", "WB"]);
    }

    #[test]
    fn pick_and_place_lists_both_functions() {
        let funcs: Vec<_> = functions_for("Pick & Place").unwrap().iter().map(|f| f.name).collect();
        assert_eq!(funcs, vec!["PNP_CHANG_TYPE", "PNP_AUTO_UPH"]);
    }

    #[test]
    fn unknown_operation_has_no_functions() {
        assert!(functions_for("Packing").is_none());
        assert!(find("Pick & Place", "WB_AUTO_UPH").is_none());
    }

    #[test]
    fn lookup_and_date_sets() {
        assert!(requires_lookup("PNP_CHANG_TYPE"));
        assert!(!requires_lookup("PNP_AUTO_UPH"));
        assert!(requires_date_range("PNP_AUTO_UPH"));
        assert!(requires_date_range("WB_AUTO_UPH"));
        assert!(!requires_date_range("DIE_ATTACK_AUTO_UPH"));
    }

    #[test]
    fn every_function_name_is_unique() {
        let mut names: Vec<_> = operations().flat_map(|op| op.functions.iter().map(|f| f.name)).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
