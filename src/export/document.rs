//! Document assembly
//!
//! Pages are described as a list of draw instructions in millimetres with the
//! origin at the top-left corner of the page, then serialized to PDF with
//! lopdf. Images are embedded once and shared by every page that draws them.

use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use super::geometry::{PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::error::{ReportError, ReportResult};

/// Points per millimetre
const MM_TO_PT: f64 = 72.0 / 25.4;

/// Resource name of the single text font
const FONT_NAME: &[u8] = b"F1";

/// Handle to an image embedded in a [`PdfDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRef(usize);

/// A single drawing instruction
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Place an image; `y` is its top edge and may be negative
    Image {
        image: ImageRef,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Place a line of text; `y` is the baseline
    Text {
        x: f64,
        y: f64,
        font_size: f32,
        text: String,
    },
}

/// One page of draw instructions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    ops: Vec<DrawOp>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw_image(&mut self, image: ImageRef, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::Image {
            image,
            x,
            y,
            width,
            height,
        });
    }

    pub fn draw_text(&mut self, x: f64, y: f64, font_size: f32, text: impl Into<String>) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            font_size,
            text: text.into(),
        });
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Text lines on this page, top to bottom in emission order
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Image { .. } => None,
        })
    }
}

/// An in-memory multi-page document
#[derive(Debug, Clone)]
pub struct PdfDocument {
    title: String,
    page_width: f64,
    page_height: f64,
    images: Vec<RgbImage>,
    pages: Vec<Page>,
}

impl PdfDocument {
    /// An empty document with the given page size in millimetres
    pub fn new(title: impl Into<String>, page_width: f64, page_height: f64) -> Self {
        Self {
            title: title.into(),
            page_width,
            page_height,
            images: Vec::new(),
            pages: Vec::new(),
        }
    }

    /// An empty portrait A4 document
    pub fn a4(title: impl Into<String>) -> Self {
        Self::new(title, PAGE_WIDTH_MM, PAGE_HEIGHT_MM)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn page_width(&self) -> f64 {
        self.page_width
    }

    pub fn page_height(&self) -> f64 {
        self.page_height
    }

    /// Embed an image so pages can draw it
    pub fn add_image(&mut self, image: RgbImage) -> ImageRef {
        self.images.push(image);
        ImageRef(self.images.len() - 1)
    }

    pub fn image(&self, image: ImageRef) -> Option<&RgbImage> {
        self.images.get(image.0)
    }

    pub fn push_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serialize to PDF bytes
    pub fn to_bytes(&self) -> ReportResult<Vec<u8>> {
        if self.pages.is_empty() {
            return Err(ReportError::Document("document has no pages".into()));
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });

        let mut xobjects = Dictionary::new();
        for (index, image) in self.images.iter().enumerate() {
            let image_id = doc.add_object(image_stream(image));
            xobjects.set(image_name(ImageRef(index)), image_id);
        }

        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
            "XObject" => xobjects,
        });

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let content = Content {
                operations: self.page_operations(page),
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id: ObjectId = doc.add_object(dictionary! {
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
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(to_pt(self.page_width)),
                    Object::Real(to_pt(self.page_height)),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(encode_text(&self.title)),
            "Producer" => Object::string_literal(concat!("finreport ", env!("CARGO_PKG_VERSION"))),
        });
        doc.trailer.set("Info", info_id);

        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }

    fn page_operations(&self, page: &Page) -> Vec<Operation> {
        let mut ops = Vec::new();

        for op in page.ops() {
            match op {
                DrawOp::Image {
                    image,
                    x,
                    y,
                    width,
                    height,
                } => {
                    // PDF origin is bottom-left; flip around the page height.
                    let bottom = self.page_height - (y + height);
                    ops.push(Operation::new("q", vec![]));
                    ops.push(Operation::new(
                        "cm",
                        vec![
                            Object::Real(to_pt(*width)),
                            Object::Integer(0),
                            Object::Integer(0),
                            Object::Real(to_pt(*height)),
                            Object::Real(to_pt(*x)),
                            Object::Real(to_pt(bottom)),
                        ],
                    ));
                    ops.push(Operation::new(
                        "Do",
                        vec![Object::Name(image_name(*image).into_bytes())],
                    ));
                    ops.push(Operation::new("Q", vec![]));
                }
                DrawOp::Text {
                    x,
                    y,
                    font_size,
                    text,
                } => {
                    ops.push(Operation::new("BT", vec![]));
                    ops.push(Operation::new(
                        "Tf",
                        vec![Object::Name(FONT_NAME.to_vec()), Object::Real(*font_size)],
                    ));
                    ops.push(Operation::new(
                        "Td",
                        vec![
                            Object::Real(to_pt(*x)),
                            Object::Real(to_pt(self.page_height - y)),
                        ],
                    ));
                    ops.push(Operation::new(
                        "Tj",
                        vec![Object::String(encode_text(text), StringFormat::Literal)],
                    ));
                    ops.push(Operation::new("ET", vec![]));
                }
            }
        }

        ops
    }
}

fn to_pt(mm: f64) -> f32 {
    (mm * MM_TO_PT) as f32
}

fn image_name(image: ImageRef) -> String {
    format!("Im{}", image.0)
}

fn image_stream(image: &RgbImage) -> Stream {
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width() as i64,
            "Height" => image.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8i64,
        },
        image.as_raw().clone(),
    )
}

/// Encode text for the standard Helvetica font (WinAnsiEncoding)
///
/// Characters the encoding lacks become `?`.
pub fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' => b' ',
            '€' => 0x80,
            '‚' => 0x82,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            c if (c as u32) < 0x20 => b'?',
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}
