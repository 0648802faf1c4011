//! 题目 PDF 输出
//!
//! 排版分两步：先把题目排成带坐标的行（[`layout_questions`]），
//! 再用 `lopdf` 写成 A4 文档（[`render_questions`]）。

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::path::Path;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::QuestionSet;

/// 每行最多字符数
pub const MAX_LINE_CHARS: usize = 90;
/// 空类别的占位文字
pub const EMPTY_PLACEHOLDER: &str = "No questions generated.";
pub const TITLE: &str = "Generated Questions";

// A4，单位 pt
const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 50.0;
const LINE_HEIGHT: f32 = 18.0;
const INDENT: f32 = 20.0;

const TITLE_SIZE: f32 = 16.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

impl FontStyle {
    /// 页面资源中的字体名
    fn resource_name(self) -> &'static str {
        match self {
            FontStyle::Regular => "F1",
            FontStyle::Bold => "F2",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            FontStyle::Regular => "Helvetica",
            FontStyle::Bold => "Helvetica-Bold",
        }
    }
}

/// 已确定位置的一行文字
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub font: FontStyle,
    pub size: f32,
    pub x: f32,
    pub y: f32,
    pub text: String,
}

/// 按页收集文字行，光标低于下边距时换页
struct PageLayout {
    pages: Vec<Vec<PlacedLine>>,
    current: Vec<PlacedLine>,
    y: f32,
}

impl PageLayout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn write_line(&mut self, font: FontStyle, size: f32, x: f32, text: impl Into<String>) {
        if self.y < MARGIN {
            self.pages.push(std::mem::take(&mut self.current));
            self.y = PAGE_HEIGHT - MARGIN;
        }
        self.current.push(PlacedLine {
            font,
            size,
            x,
            y: self.y,
            text: text.into(),
        });
        self.y -= LINE_HEIGHT;
    }

    fn skip_line(&mut self) {
        self.y -= LINE_HEIGHT;
    }

    fn finish(mut self) -> Vec<Vec<PlacedLine>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

/// 贪心换行：按单词装行，不拆分单词
///
/// 超过宽度的单词独占一行；不会产生空行。
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// 排版：标题，然后每个类别的小节标题和编号题目（或占位文字）
pub fn layout_questions(questions: &QuestionSet) -> Vec<Vec<PlacedLine>> {
    let mut layout = PageLayout::new();

    layout.write_line(FontStyle::Bold, TITLE_SIZE, MARGIN, TITLE);
    layout.skip_line();

    for (category, items) in questions.iter() {
        layout.write_line(FontStyle::Bold, HEADING_SIZE, MARGIN, category.heading());

        if items.is_empty() {
            layout.write_line(FontStyle::Regular, BODY_SIZE, MARGIN + INDENT, EMPTY_PLACEHOLDER);
        } else {
            for (i, question) in items.iter().enumerate() {
                let numbered = format!("{}. {}", i + 1, question);
                for line in wrap_text(&numbered, MAX_LINE_CHARS) {
                    layout.write_line(FontStyle::Regular, BODY_SIZE, MARGIN + INDENT, line);
                }
            }
        }

        // 小节之间空一行
        layout.skip_line();
    }

    layout.finish()
}

/// 把题目集合写成 PDF 文件
pub fn render_questions(questions: &QuestionSet, output: &Path) -> AppResult<()> {
    let pages = layout_questions(questions);
    let output_name = output.display().to_string();

    let mut doc = build_document(&pages).map_err(|e| AppError::render_failed(&output_name, e))?;
    doc.save(output)
        .map_err(|e| AppError::render_failed(&output_name, e))?;

    debug!("已写入 {} 页: {}", pages.len(), output_name);
    Ok(())
}

fn build_document(pages: &[Vec<PlacedLine>]) -> lopdf::Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = add_font(&mut doc, FontStyle::Regular);
    let bold_id = add_font(&mut doc, FontStyle::Bold);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FontStyle::Regular.resource_name() => regular_id,
            FontStyle::Bold.resource_name() => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for lines in pages {
        let content = Content {
            operations: page_operations(lines),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let media_box: Vec<Object> = vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()];
    let page_count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => media_box,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

fn add_font(doc: &mut Document, style: FontStyle) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => style.base_font(),
        "Encoding" => "WinAnsiEncoding",
    })
}

fn page_operations(lines: &[PlacedLine]) -> Vec<Operation> {
    let mut operations = Vec::with_capacity(lines.len() * 5);
    for line in lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![line.font.resource_name().into(), line.size.into()],
        ));
        operations.push(Operation::new("Td", vec![line.x.into(), line.y.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(&line.text), StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    operations
}

/// 标准 14 字体只认 WinAnsi；编码不了的字符替换成 `?`
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => ch as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}
