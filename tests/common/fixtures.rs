//! Test fixtures and PDF builders.
//!
//! Provides builders for creating test documents with specific personal
//! information, following the Builder pattern for clean test setup.

use anyhow::Result;
use printpdf::*;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Builder for creating single-page test PDFs, one text line per entry.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// # use anyhow::Result;
/// # fn main() -> Result<()> {
/// let pdf = TestPdfBuilder::new()
///     .with_title("Lab Report")
///     .with_name("Jane Doe")
///     .with_email("jane.doe@example.com")
///     .with_line("Results are attached.")
///     .build(Path::new("/tmp/test.pdf"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TestPdfBuilder {
    title: String,
    lines: Vec<String>,
    font_size: f32,
    page_width: Mm,
    page_height: Mm,
}

impl TestPdfBuilder {
    /// Creates a new test PDF builder with default settings.
    pub fn new() -> Self {
        Self {
            title: "Test Document".to_string(),
            lines: Vec::new(),
            font_size: 12.0,
            page_width: Mm(210.0),  // A4 width
            page_height: Mm(297.0), // A4 height
        }
    }

    /// Sets the document title, which is also the first line.
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Adds a `Name:` header line.
    pub fn with_name(self, name: &str) -> Self {
        self.with_line(&format!("Name: {}", name))
    }

    /// Adds an `Email:` line.
    pub fn with_email(self, email: &str) -> Self {
        self.with_line(&format!("Email: {}", email))
    }

    /// Adds a `Phone:` line.
    pub fn with_phone(self, phone: &str) -> Self {
        self.with_line(&format!("Phone: {}", phone))
    }

    /// Adds a free-form line.
    pub fn with_line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    /// Returns the text lines in page order, title first.
    pub fn lines(&self) -> Vec<String> {
        std::iter::once(self.title.clone())
            .chain(self.lines.iter().cloned())
            .collect()
    }

    /// Builds the PDF and writes it to the specified path.
    pub fn build(self, output_path: &Path) -> Result<PathBuf> {
        let (doc, page1, layer1) =
            PdfDocument::new(&self.title, self.page_width, self.page_height, "Layer 1");
        let current_layer = doc.get_page(page1).get_layer(layer1);
        let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

        let mut y = 270.0;
        for line in self.lines() {
            current_layer.use_text(line, self.font_size, Mm(20.0), Mm(y), &font);
            y -= 10.0;
        }

        doc.save(&mut BufWriter::new(fs::File::create(output_path)?))?;
        Ok(output_path.to_path_buf())
    }

    /// Builds the PDF and returns its bytes.
    pub fn build_bytes(self, dir: &Path) -> Result<Vec<u8>> {
        let path = self.build(&dir.join("fixture.pdf"))?;
        Ok(fs::read(path)?)
    }
}

impl Default for TestPdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A short student report with one of each common identifier.
pub const STUDENT_REPORT: &str = "\
Lab Report - Semester 5
Submitted by: Aditee Srivastava
Reg No: 23BCE11417
Email: aditee.s@example.com
Phone: 9876543210
Address: 12/4, Sector 7, Rohini
The bank pin is 4821 and must not be shared.
";

/// Quick helper to create a report PDF with a name, email and phone line.
pub fn create_report_pdf(path: &Path, name: &str, email: &str, phone: &str) -> Result<PathBuf> {
    TestPdfBuilder::new()
        .with_title("Quarterly Report")
        .with_name(name)
        .with_email(email)
        .with_phone(phone)
        .with_line("Summary: all milestones reached")
        .build(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_pattern() {
        let builder = TestPdfBuilder::new()
            .with_title("Test")
            .with_name("Jane Doe")
            .with_phone("9876543210");

        assert_eq!(
            builder.lines(),
            vec!["Test", "Name: Jane Doe", "Phone: 9876543210"]
        );
    }
}
