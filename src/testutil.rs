//! Test Fixture Workbooks
//! Writes minimal .xlsx workbooks for tests.
//!
//! Uses direct ZIP/XML generation with inline strings, so no shared string
//! table or style sheet is needed.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::ZipWriter;

/// One fixture cell.
#[derive(Debug, Clone)]
pub enum Cell {
    Num(f64),
    Text(String),
    Empty,
}

/// A worksheet: header row plus data rows.
#[derive(Debug, Clone)]
pub struct SheetSpec {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl SheetSpec {
    pub fn new(name: &str, header: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, cells: Vec<Cell>) -> Self {
        self.rows.push(cells);
        self
    }

    pub fn numbers(self, values: &[f64]) -> Self {
        self.row(values.iter().map(|&v| Cell::Num(v)).collect())
    }
}

/// Write a workbook with the given sheets, creating parent directories.
pub fn write_workbook(path: &Path, sheets: &[SheetSpec]) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let file = File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default();

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(content_types_xml(sheets.len()).as_bytes())
        .unwrap();

    zip.start_file("_rels/.rels", options).unwrap();
    zip.write_all(ROOT_RELS_XML.as_bytes()).unwrap();

    zip.start_file("xl/workbook.xml", options).unwrap();
    zip.write_all(workbook_xml(sheets).as_bytes()).unwrap();

    zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
    zip.write_all(workbook_rels_xml(sheets.len()).as_bytes())
        .unwrap();

    for (idx, sheet) in sheets.iter().enumerate() {
        zip.start_file(format!("xl/worksheets/sheet{}.xml", idx + 1), options)
            .unwrap();
        zip.write_all(sheet_xml(sheet).as_bytes()).unwrap();
    }

    zip.finish().unwrap();
    path.to_path_buf()
}

/// Create an empty placeholder file (catalog tests never parse it).
pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap();
}

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

fn content_types_xml(sheet_count: usize) -> String {
    let overrides: String = (1..=sheet_count)
        .map(|i| {
            format!(
                r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>{}</Types>"#,
        overrides
    )
}

fn workbook_xml(sheets: &[SheetSpec]) -> String {
    let entries: String = sheets
        .iter()
        .enumerate()
        .map(|(i, sheet)| {
            format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape(&sheet.name),
                i + 1,
                i + 1
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{}</sheets></workbook>"#,
        entries
    )
}

fn workbook_rels_xml(sheet_count: usize) -> String {
    let rels: String = (1..=sheet_count)
        .map(|i| {
            format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i, i
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
        rels
    )
}

fn sheet_xml(sheet: &SheetSpec) -> String {
    let mut rows = String::new();

    // No header means a blank sheet
    if !sheet.header.is_empty() {
        let header: Vec<Cell> = sheet.header.iter().cloned().map(Cell::Text).collect();
        rows.push_str(&row_xml(1, &header));
    }
    for (i, cells) in sheet.rows.iter().enumerate() {
        rows.push_str(&row_xml(i + 2, cells));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
        rows
    )
}

fn row_xml(row_num: usize, cells: &[Cell]) -> String {
    let body: String = cells
        .iter()
        .enumerate()
        .map(|(col, cell)| {
            let cell_ref = format!("{}{}", column_letter(col), row_num);
            match cell {
                Cell::Num(v) => format!(r#"<c r="{}"><v>{}</v></c>"#, cell_ref, v),
                Cell::Text(s) => format!(
                    r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    cell_ref,
                    escape(s)
                ),
                Cell::Empty => String::new(),
            }
        })
        .collect();
    format!(r#"<row r="{}">{}</row>"#, row_num, body)
}

fn column_letter(mut idx: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (idx % 26) as u8) as char);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    letters.iter().rev().collect()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
