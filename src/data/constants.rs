//! Style identifiers, namespaces and package part templates
//!
//! The style identifiers here are the only styles the converter references;
//! `STYLES_XML` defines all of them so the produced package is self-contained.

/// WordprocessingML main namespace
pub const W_NAMESPACE: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Office Math Markup Language namespace
pub const M_NAMESPACE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/math";

/// XML declaration used by every package part
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Paragraph style for chapter-level headings
pub const STYLE_HEADING1: &str = "Heading1";
/// Paragraph style for section-level headings
pub const STYLE_HEADING2: &str = "Heading2";
/// Paragraph style for subsubsection-level headings
pub const STYLE_HEADING3: &str = "Heading3";
/// Paragraph style for list items
pub const STYLE_LIST_BULLET: &str = "ListBullet";

/// File name offered for the generated archive
pub const DEFAULT_OUTPUT_NAME: &str = "Thesis_Output.docx";

/// Environments whose begin/end markers toggle list mode
pub const LIST_ENVIRONMENTS: &[&str] = &["itemize", "enumerate"];

/// Environments rendered as a centered display equation
pub const DISPLAY_MATH_ENVIRONMENTS: &[&str] = &[
    "equation",
    "equation*",
    "align",
    "align*",
    "displaymath",
    "gather",
    "gather*",
];

/// Environments rendered as an image placeholder plus caption
pub const FIGURE_ENVIRONMENTS: &[&str] = &["figure", "figure*"];

/// Part names inside the package
pub mod parts {
    pub const CONTENT_TYPES: &str = "[Content_Types].xml";
    pub const ROOT_RELS: &str = "_rels/.rels";
    pub const DOCUMENT: &str = "word/document.xml";
    pub const STYLES: &str = "word/styles.xml";
}

/// `[Content_Types].xml` for a document with a styles part
pub const CONTENT_TYPES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
    r#"</Types>"#,
);

/// `_rels/.rels` pointing at the main document part
pub const ROOT_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"</Relationships>"#,
);

/// `word/styles.xml` defining the four referenced paragraph styles
pub const STYLES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    r#"<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:rPr><w:b/><w:sz w:val="48"/><w:szCs w:val="48"/></w:rPr></w:style>"#,
    r#"<w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:rPr><w:b/><w:sz w:val="36"/><w:szCs w:val="36"/></w:rPr></w:style>"#,
    r#"<w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/><w:rPr><w:b/><w:sz w:val="28"/><w:szCs w:val="28"/></w:rPr></w:style>"#,
    r#"<w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/><w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:style>"#,
    r#"</w:styles>"#,
);

/// Check whether `name` is a list environment
pub fn is_list_environment(name: &str) -> bool {
    LIST_ENVIRONMENTS.contains(&name)
}

/// Check whether `name` is a display-math environment
pub fn is_display_math_environment(name: &str) -> bool {
    DISPLAY_MATH_ENVIRONMENTS.contains(&name)
}

/// Check whether `name` is a figure environment
pub fn is_figure_environment(name: &str) -> bool {
    FIGURE_ENVIRONMENTS.contains(&name)
}
