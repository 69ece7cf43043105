//! XLSX Export Module
//! Writes an aggregation to a two-sheet Excel workbook (percentage view and
//! absolute view) by generating the ZIP/XML package directly.

use crate::data::Aggregation;
use anyhow::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::FileOptions;
use zip::ZipWriter;

/// Excel restricts sheet names to 31 characters.
const MAX_SHEET_NAME_LEN: usize = 31;

/// Result of an export attempt. Write failures are reported here, never
/// propagated to the caller.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub success: bool,
    pub message: String,
}

impl ExportOutcome {
    fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Exports aggregations to multi-sheet Excel workbooks.
pub struct XlsxExporter;

impl XlsxExporter {
    /// Export the aggregation to `output_path`.
    ///
    /// Sheet `"<name> Pie"` holds each group's share of the total as a
    /// percentage rounded to one decimal; `"<name> Bar"` holds the absolute
    /// values. A zero total falls back to raw values on the percentage sheet
    /// instead of dividing by zero.
    pub fn save(aggregation: &Aggregation, output_path: &Path) -> ExportOutcome {
        match Self::write_workbook(aggregation, output_path) {
            Ok(()) => ExportOutcome::success("File saved successfully."),
            Err(e) => ExportOutcome::failure(e.to_string()),
        }
    }

    fn write_workbook(aggregation: &Aggregation, output_path: &Path) -> Result<()> {
        let file = File::create(output_path)?;
        let mut zip = ZipWriter::new(file);
        let options = FileOptions::default();

        let pie_sheet = Self::sheet_name(aggregation.name(), "Pie");
        let bar_sheet = Self::sheet_name(aggregation.name(), "Bar");

        // 1. [Content_Types].xml
        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(Self::content_types_xml().as_bytes())?;

        // 2. _rels/.rels
        zip.start_file("_rels/.rels", options)?;
        zip.write_all(Self::rels_xml().as_bytes())?;

        // 3. xl/workbook.xml
        zip.start_file("xl/workbook.xml", options)?;
        zip.write_all(Self::workbook_xml(&pie_sheet, &bar_sheet).as_bytes())?;

        // 4. xl/_rels/workbook.xml.rels
        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        zip.write_all(Self::workbook_rels_xml().as_bytes())?;

        // 5. xl/styles.xml
        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(Self::styles_xml().as_bytes())?;

        // 6. Worksheets: percentage view, then absolute view
        zip.start_file("xl/worksheets/sheet1.xml", options)?;
        zip.write_all(
            Self::worksheet_xml("Percentage", &Self::percentage_rows(aggregation)).as_bytes(),
        )?;

        zip.start_file("xl/worksheets/sheet2.xml", options)?;
        zip.write_all(Self::worksheet_xml("Revenue", aggregation.entries()).as_bytes())?;

        // 7. docProps
        zip.start_file("docProps/core.xml", options)?;
        zip.write_all(Self::core_props_xml().as_bytes())?;
        zip.start_file("docProps/app.xml", options)?;
        zip.write_all(Self::app_props_xml().as_bytes())?;

        zip.finish()?;
        Ok(())
    }

    /// `"<base> <suffix>"` clipped to the Excel limit.
    fn sheet_name(base: &str, suffix: &str) -> String {
        format!("{} {}", base, suffix)
            .chars()
            .take(MAX_SHEET_NAME_LEN)
            .collect()
    }

    /// Per-group share of the total, rounded to one decimal. Falls back to
    /// the raw values when the total is zero.
    fn percentage_rows(aggregation: &Aggregation) -> Vec<(String, f64)> {
        let total = aggregation.total();
        aggregation
            .entries()
            .iter()
            .map(|(label, value)| {
                let cell = if total != 0.0 {
                    (value / total * 1000.0).round() / 10.0
                } else {
                    *value
                };
                (label.clone(), cell)
            })
            .collect()
    }

    fn content_types_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/worksheets/sheet2.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
</Types>"#
    }

    fn rels_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#
    }

    fn workbook_xml(pie_sheet: &str, bar_sheet: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>
<sheet name="{}" sheetId="1" r:id="rId1"/>
<sheet name="{}" sheetId="2" r:id="rId2"/>
</sheets>
</workbook>"#,
            xml_escape(pie_sheet),
            xml_escape(bar_sheet)
        )
    }

    fn workbook_rels_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#
    }

    fn styles_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>
<borders count="1"><border/></borders>
<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
<cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>
</styleSheet>"#
    }

    /// Label column A, value column B, header in B1.
    fn worksheet_xml(header: &str, rows: &[(String, f64)]) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
"#,
        );

        xml.push_str(&format!(
            "<row r=\"1\"><c r=\"B1\" t=\"inlineStr\"><is><t>{}</t></is></c></row>\n",
            xml_escape(header)
        ));

        for (i, (label, value)) in rows.iter().enumerate() {
            let r = i + 2;
            xml.push_str(&format!(
                "<row r=\"{r}\"><c r=\"A{r}\" t=\"inlineStr\"><is><t>{}</t></is></c><c r=\"B{r}\"><v>{}</v></c></row>\n",
                xml_escape(label),
                value
            ));
        }

        xml.push_str("</sheetData>\n</worksheet>");
        xml
    }

    fn core_props_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/">
<dc:title>Sales Analysis</dc:title>
<dc:creator>Salesboard</dc:creator>
<cp:lastModifiedBy>Salesboard</cp:lastModifiedBy>
<cp:revision>1</cp:revision>
</cp:coreProperties>"#
    }

    fn app_props_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">
<Application>Salesboard</Application>
<AppVersion>0.1000</AppVersion>
</Properties>"#
    }
}

fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn aggregation(name: &str, entries: &[(&str, f64)]) -> Aggregation {
        Aggregation::new(
            name,
            entries
                .iter()
                .map(|(l, v)| (l.to_string(), *v))
                .collect(),
        )
    }

    fn read_part(path: &Path, part: &str) -> String {
        let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut content = String::new();
        archive
            .by_name(part)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    #[test]
    fn sheet_names_truncate_to_31_chars() {
        let name = XlsxExporter::sheet_name(
            "An Extremely Long Aggregation Name", // > 31 with suffix
            "Pie",
        );
        assert_eq!(name.chars().count(), 31);
        assert!(name.starts_with("An Extremely Long Aggregation N"));
    }

    #[test]
    fn short_sheet_names_keep_suffix() {
        assert_eq!(XlsxExporter::sheet_name("Category", "Bar"), "Category Bar");
    }

    #[test]
    fn percentages_round_to_one_decimal() {
        let agg = aggregation("Category", &[("A", 1.0), ("B", 2.0)]);
        let rows = XlsxExporter::percentage_rows(&agg);
        assert_eq!(rows[0], ("A".to_string(), 33.3));
        assert_eq!(rows[1], ("B".to_string(), 66.7));
    }

    #[test]
    fn zero_total_falls_back_to_raw_values() {
        let agg = aggregation("Category", &[("A", 0.0), ("B", 0.0)]);
        let rows = XlsxExporter::percentage_rows(&agg);
        assert_eq!(rows[0].1, 0.0);
        assert_eq!(rows[1].1, 0.0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero.xlsx");
        let outcome = XlsxExporter::save(&agg, &path);
        assert!(outcome.success, "{}", outcome.message);
    }

    #[test]
    fn save_writes_two_sheet_workbook() {
        let agg = aggregation("Country", &[("Germany", 100.0), ("France", 300.0)]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let outcome = XlsxExporter::save(&agg, &path);
        assert!(outcome.success, "{}", outcome.message);

        let workbook = read_part(&path, "xl/workbook.xml");
        assert!(workbook.contains("Country Pie"));
        assert!(workbook.contains("Country Bar"));

        let pie_sheet = read_part(&path, "xl/worksheets/sheet1.xml");
        assert!(pie_sheet.contains("<v>25</v>"));
        assert!(pie_sheet.contains("<v>75</v>"));

        let bar_sheet = read_part(&path, "xl/worksheets/sheet2.xml");
        assert!(bar_sheet.contains("<v>100</v>"));
        assert!(bar_sheet.contains("<v>300</v>"));
    }

    #[test]
    fn labels_are_xml_escaped() {
        let agg = aggregation("Category", &[("Food & Drink", 10.0)]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("escaped.xlsx");

        assert!(XlsxExporter::save(&agg, &path).success);
        let sheet = read_part(&path, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("Food &amp; Drink"));
    }

    #[test]
    fn unwritable_path_reports_failure() {
        let agg = aggregation("Category", &[("A", 1.0)]);
        let outcome = XlsxExporter::save(&agg, Path::new("/nonexistent/dir/out.xlsx"));
        assert!(!outcome.success);
        assert!(!outcome.message.is_empty());
    }
}
