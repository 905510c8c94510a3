use std::path::Path;

use pdf_extract::{Document, OutputError, PlainTextOutput};

use crate::extract::{ExtractError, TextExtractor};

/// PDF variant: per-page text in document order.
///
/// Pages are concatenated with no separator added at page boundaries. Any
/// page that fails to render fails the whole document.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = std::fs::read(path)?;
        let mut doc = Document::load_mem(&bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?;
        if doc.is_encrypted() {
            doc.decrypt("")
                .map_err(|e| ExtractError::Pdf(format!("encrypted PDF: {e}")))?;
        }

        let pages = collect_pages(doc.get_pages().into_keys(), |page_num| {
            page_text(&doc, page_num)
        })?;
        Ok(join_pages(pages))
    }
}

fn page_text(doc: &Document, page_num: u32) -> Result<String, OutputError> {
    let mut text = String::new();
    {
        let mut output = PlainTextOutput::new(&mut text);
        pdf_extract::output_doc_page(doc, &mut output, page_num)?;
    }
    Ok(text)
}

/// Renders every page, stopping at the first failure.
fn collect_pages<I, F>(page_nums: I, mut render: F) -> Result<Vec<String>, ExtractError>
where
    I: IntoIterator<Item = u32>,
    F: FnMut(u32) -> Result<String, OutputError>,
{
    page_nums
        .into_iter()
        .map(|page_num| {
            render(page_num)
                .map(|text| strip_layout_lead(&text).to_string())
                .map_err(|e| ExtractError::Pdf(format!("page {page_num}: {e}")))
        })
        .collect()
}

/// `PlainTextOutput` starts each page with up to two newlines for the jump
/// from its initial pen position to the first glyph.
fn strip_layout_lead(page: &str) -> &str {
    page.strip_prefix("\n\n")
        .or_else(|| page.strip_prefix('\n'))
        .unwrap_or(page)
}

pub fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = String>,
{
    pages.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use std::path::PathBuf;

    /// Writes a minimal PDF with one Courier text line per page.
    fn write_pdf(dir: &Path, pages: &[&str]) -> PathBuf {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let path = dir.join("fixture.pdf");
        doc.save(&path).unwrap();
        path
    }

    #[test]
    fn test_join_pages_adds_no_separator() {
        let pages = vec!["first page end".to_string(), "second".to_string()];
        assert_eq!(join_pages(pages), "first page endsecond");
    }

    #[test]
    fn test_join_pages_empty_document() {
        assert_eq!(join_pages(Vec::<String>::new()), "");
    }

    #[test]
    fn test_strip_layout_lead() {
        assert_eq!(strip_layout_lead("\n\nCurriculum"), "Curriculum");
        assert_eq!(strip_layout_lead("\nCurriculum"), "Curriculum");
        assert_eq!(strip_layout_lead("Curriculum"), "Curriculum");
        assert_eq!(strip_layout_lead("\n\n\nGap"), "\nGap");
        assert_eq!(strip_layout_lead("line one\nline two"), "line one\nline two");
    }

    #[test]
    fn test_page_failure_fails_the_document() {
        let mut rendered = Vec::new();
        let result = collect_pages([1, 2, 3], |page_num| {
            rendered.push(page_num);
            if page_num == 2 {
                Err(OutputError::FormatError(std::fmt::Error))
            } else {
                Ok(format!("\n\npage {page_num}"))
            }
        });

        match result {
            Err(ExtractError::Pdf(msg)) => assert!(msg.starts_with("page 2:"), "{msg}"),
            other => panic!("expected a PDF error, got {other:?}"),
        }
        assert_eq!(rendered, vec![1, 2]);
    }

    #[test]
    fn test_collect_pages_strips_each_page() {
        let pages = collect_pages([1, 2], |page_num| Ok(format!("\n\nP{page_num}"))).unwrap();
        assert_eq!(pages, vec!["P1".to_string(), "P2".to_string()]);
    }

    #[test]
    fn test_extracts_single_page_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), &["Curriculum"]);

        let text = PdfExtractor.extract(&path).unwrap();
        assert_eq!(text, "Curriculum");
    }

    #[test]
    fn test_pages_keep_document_order_without_separator() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), &["Alpha", "Omega"]);

        let text = PdfExtractor.extract(&path).unwrap();
        assert_eq!(text, "AlphaOmega");
    }

    #[test]
    fn test_corrupt_pdf_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let err = PdfExtractor.extract(&path).unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PdfExtractor.extract(&dir.path().join("gone.pdf")).unwrap_err();
        assert!(matches!(err, ExtractError::Io(_)));
    }
}
