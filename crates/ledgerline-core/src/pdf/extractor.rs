//! Page geometry extraction using lopdf.

use std::path::Path;

use lopdf::{Document, Object, ObjectId};
use tracing::{debug, trace};

use super::content::PageInterpreter;
use super::object::{inherited, number, page_resources};
use super::{GeometrySource, PageGeometry, Result};
use crate::error::{LedgerError, PdfError};
use crate::models::geometry::Rect;

/// US Letter, used when a page carries no usable MediaBox.
const DEFAULT_MEDIA_BOX: Rect = Rect {
    x0: 0.0,
    y0: 0.0,
    x1: 612.0,
    y1: 792.0,
};

/// Page geometry extractor over an lopdf document.
pub struct PdfGeometryExtractor {
    document: Option<Document>,
}

impl PdfGeometryExtractor {
    /// Create an extractor with no document loaded.
    pub fn new() -> Self {
        Self { document: None }
    }

    /// Load a PDF from bytes.
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    /// Open and load a PDF file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let data = std::fs::read(path)?;
        let mut extractor = Self::new();
        extractor
            .load(&data)
            .map_err(|source| LedgerError::Document {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(extractor)
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))
    }

    fn page_id(&self, doc: &Document, number: u32) -> Result<ObjectId> {
        doc.get_pages()
            .get(&number)
            .copied()
            .ok_or(PdfError::InvalidPage(number))
    }

    fn media_box(doc: &Document, page_id: ObjectId) -> Rect {
        let values: Option<Vec<f64>> = inherited(doc, page_id, b"MediaBox")
            .and_then(|o| o.as_array().ok())
            .map(|arr| arr.iter().filter_map(number).collect());

        match values.as_deref() {
            Some([a, b, c, d]) => Rect::new(a.min(*c), b.min(*d), a.max(*c), b.max(*d)),
            _ => {
                trace!("Page has no usable MediaBox, assuming Letter");
                DEFAULT_MEDIA_BOX
            }
        }
    }
}

impl Default for PdfGeometryExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometrySource for PdfGeometryExtractor {
    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn page(&self, number: u32) -> Result<PageGeometry> {
        let doc = self.document()?;
        let page_id = self.page_id(doc, number)?;
        let media_box = Self::media_box(doc, page_id);

        let content = doc.get_page_content(page_id).map_err(|e| PdfError::Content {
            page: number,
            reason: e.to_string(),
        })?;
        let resources = page_resources(doc, page_id);

        let (fragments, lines) =
            PageInterpreter::new(doc, number, media_box).interpret(&content, resources)?;

        Ok(PageGeometry::new(number, media_box.width(), media_box.height())
            .with_fragments(fragments)
            .with_lines(lines))
    }
}

/// Build a one-page PDF in memory. Shared by the tests of this crate.
#[cfg(test)]
pub(crate) fn sample_pdf(operations: Vec<lopdf::content::Operation>) -> Vec<u8> {
    use lopdf::content::Content;
    use lopdf::{Stream, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().unwrap_or_default(),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut data = Vec::new();
    doc.save_to(&mut data).unwrap();
    data
}
