//! FILENAME: core/persistence/src/naming.rs
//! Export file names: `<report-name>_<yyyy-MM-dd>.xlsx`, dated at export time.

use chrono::{Local, NaiveDate};

pub fn export_file_name(report_name: &str, date: NaiveDate) -> String {
    let name: String = report_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let name = if name.is_empty() { "report" } else { name.as_str() };
    format!("{}_{}.xlsx", name, date.format("%Y-%m-%d"))
}

/// File name dated with the local calendar day.
pub fn export_file_name_today(report_name: &str) -> String {
    export_file_name(report_name, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(export_file_name("Продажи", date), "Продажи_2024-03-05.xlsx");
        assert_eq!(export_file_name("Заказы 1/2", date), "Заказы 1_2_2024-03-05.xlsx");
        assert_eq!(export_file_name("  ", date), "report_2024-03-05.xlsx");
    }

    #[test]
    fn test_export_file_name_today() {
        let name = export_file_name_today("Отчет");
        assert!(name.starts_with("Отчет_"));
        assert!(name.ends_with(".xlsx"));
        // "Отчет_" + "yyyy-MM-dd" + ".xlsx"
        assert_eq!(name.chars().count(), 6 + 10 + 5);
    }
}
