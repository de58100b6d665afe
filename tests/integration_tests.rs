//! Integration tests for texdocx document conversion

use std::io::{Cursor, Read};

use texdocx::{
    check_latex, classify_document, latex_to_document_xml, latex_to_docx_body,
    latex_to_docx_bytes, latex_to_docx_with_diagnostics, process_inline, render_math,
    substitute_symbols, DocxOptions, WarningKind,
};

fn run(text: &str) -> String {
    format!("<w:r><w:t xml:space=\"preserve\">{}</w:t></w:r>", text)
}

// ============================================================================
// Math Rendering
// ============================================================================

mod math {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fraction_node() {
        assert_eq!(
            render_math(r"\frac{1}{2}"),
            "<m:oMath><m:f><m:num><m:r><m:t>1</m:t></m:r></m:num><m:den><m:r><m:t>2</m:t></m:r></m:den></m:f></m:oMath>"
        );
    }

    #[test]
    fn test_scripts() {
        assert_eq!(
            render_math("x_i"),
            "<m:oMath><m:sSub><m:e><m:r><m:t>x</m:t></m:r></m:e><m:sub><m:r><m:t>i</m:t></m:r></m:sub></m:sSub></m:oMath>"
        );
        assert_eq!(
            render_math("x^2"),
            "<m:oMath><m:sSup><m:e><m:r><m:t>x</m:t></m:r></m:e><m:sup><m:r><m:t>2</m:t></m:r></m:sup></m:sSup></m:oMath>"
        );
    }

    #[test]
    fn test_symbol_pass() {
        assert_eq!(substitute_symbols(r"\alpha + \beta"), "α + β");
        assert!(render_math(r"\alpha + \beta").contains("α + β"));
    }

    #[test]
    fn test_partial_not_corrupted_by_shorter_keys() {
        assert_eq!(substitute_symbols(r"\partial f"), "∂ f");
        assert_eq!(substitute_symbols(r"\pm \times \infty"), "± × ∞");
    }

    #[test]
    fn test_nested_fraction_is_well_formed() {
        let out = render_math(r"\frac{\frac{a}{b}}{c}");
        assert_eq!(out.matches("<m:f>").count(), 2);
        assert_eq!(out.matches("</m:f>").count(), 2);
    }

    #[test]
    fn test_always_one_container() {
        let inputs = [
            "",
            "   ",
            "{",
            "}",
            r"\frac{1}",
            "x_",
            "^^",
            r"\text{",
            r"\sqrt",
            "<&>",
        ];
        for input in inputs {
            let out = render_math(input);
            assert!(out.starts_with("<m:oMath>") && out.ends_with("</m:oMath>"), "{:?} -> {}", input, out);
            assert_eq!(out.matches("<m:oMath>").count(), 1, "{:?}", input);
            assert_ne!(out, "<m:oMath></m:oMath>", "{:?}", input);
        }
    }

    #[test]
    fn test_math_text_is_escaped() {
        let out = render_math("a < b");
        assert!(out.contains("a &lt; b"));
    }
}

// ============================================================================
// Inline Content
// ============================================================================

mod inline {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_span_order() {
        let out = process_inline(r"Value is $x_i$ and \ref{eq1}.");
        let value = out.find("Value is ").unwrap();
        let math = out.find("<m:oMath>").unwrap();
        let and = out.find(" and ").unwrap();
        let reference = out.find("<w:b/>").unwrap();
        let dot = out.rfind(">.</w:t>").unwrap();
        assert!(value < math && math < and && and < reference && reference < dot);
    }

    #[test]
    fn test_empty_reference() {
        assert_eq!(
            process_inline(r"\ref{}"),
            "<w:r><w:rPr><w:b/></w:rPr><w:t xml:space=\"preserve\">??</w:t></w:r>"
        );
    }

    #[test]
    fn test_paren_math() {
        assert!(process_inline(r"where \(a^2\) holds").contains("<m:sSup>"));
    }

    #[test]
    fn test_math_after_line_break() {
        let out = process_inline(r"line\\$x_i$ end");
        assert!(out.starts_with(&run(r"line\\")), "{}", out);
        assert!(out.contains("<m:oMath><m:sSub>"), "{}", out);
    }
}

// ============================================================================
// Block Classification
// ============================================================================

mod blocks {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_section_heading() {
        let paragraphs = classify_document(r"\section{Intro}", &DocxOptions::default());
        assert_eq!(
            paragraphs,
            vec![format!(
                "<w:p><w:pPr><w:pStyle w:val=\"Heading2\"/></w:pPr>{}</w:p>",
                run("Intro")
            )]
        );
    }

    #[test]
    fn test_heading_levels_with_chapters() {
        let src = "\\chapter{C}\n\n\\section{S}\n\n\\subsection{SS}\n\n\\subsubsection{SSS}";
        let paragraphs = classify_document(src, &DocxOptions::default());
        let styles: Vec<&str> = paragraphs
            .iter()
            .map(|p| {
                let start = p.find("w:val=\"").unwrap() + 7;
                let end = start + p[start..].find('"').unwrap();
                &p[start..end]
            })
            .collect();
        assert_eq!(styles, vec!["Heading1", "Heading2", "Heading3", "Heading3"]);
    }

    #[test]
    fn test_subsection_without_chapters() {
        let body = latex_to_docx_body("\\section{S}\n\n\\subsection{SS}");
        assert_eq!(body.matches("Heading2").count(), 2);
    }

    #[test]
    fn test_itemize_list() {
        let src = "\\begin{itemize}\n\\item First point\n\\item Second\n\\end{itemize}";
        let paragraphs = classify_document(src, &DocxOptions::default());
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(
            paragraphs[0],
            format!(
                "<w:p><w:pPr><w:pStyle w:val=\"ListBullet\"/></w:pPr>{}{}</w:p>",
                run("• "),
                run("First point")
            )
        );
    }

    #[test]
    fn test_enumerate_numbers_restart() {
        let src = "\\begin{enumerate}\n\\item a\n\\item b\n\\end{enumerate}\n\n\\begin{enumerate}\n\\item c\n\\end{enumerate}";
        let paragraphs = classify_document(src, &DocxOptions::default());
        assert!(paragraphs[0].contains(&run("1. ")));
        assert!(paragraphs[1].contains(&run("2. ")));
        assert!(paragraphs[2].contains(&run("1. ")));
    }

    #[test]
    fn test_equation_environment() {
        let src = "\\begin{equation}\n\\frac{a}{b}\n\\label{eq:ab}\n\\end{equation}";
        let paragraphs = classify_document(src, &DocxOptions::default());
        assert_eq!(paragraphs.len(), 1);
        assert!(paragraphs[0].starts_with("<w:p><w:pPr><w:jc w:val=\"center\"/></w:pPr><m:oMath><m:f>"));
        assert!(!paragraphs[0].contains("eq:ab"));
    }

    #[test]
    fn test_figure_environment() {
        let src = "\\begin{figure}[h]\n\\centering\n\\includegraphics[width=\\linewidth]{img/arch.png}\n\\caption{Architecture}\n\\end{figure}";
        let paragraphs = classify_document(src, &DocxOptions::default());
        assert_eq!(paragraphs.len(), 2);
        assert!(paragraphs[0].contains("<w:rPr><w:i/></w:rPr><w:t xml:space=\"preserve\">[IMAGE PLACEHOLDER: img/arch.png]</w:t>"));
        assert!(paragraphs[1].contains(&run("Fig: Architecture")));
    }

    #[test]
    fn test_display_math_environments() {
        for env in ["equation*", "align*", "gather", "gather*", "displaymath"] {
            let src = format!("\\begin{{{env}}}\nx^2\n\\end{{{env}}}", env = env);
            let paragraphs = classify_document(&src, &DocxOptions::default());
            assert_eq!(paragraphs.len(), 1, "{}", env);
            assert!(
                paragraphs[0].starts_with("<w:p><w:pPr><w:jc w:val=\"center\"/></w:pPr><m:oMath><m:sSup>"),
                "{}: {}",
                env,
                paragraphs[0]
            );
        }
    }

    #[test]
    fn test_starred_figure_environment() {
        let src = "\\begin{figure*}[t]\n\\includegraphics{wide.pdf}\n\\caption{Wide}\n\\end{figure*}";
        let paragraphs = classify_document(src, &DocxOptions::default());
        assert_eq!(paragraphs.len(), 2);
        assert!(paragraphs[0].contains("[IMAGE PLACEHOLDER: wide.pdf]"));
        assert!(paragraphs[1].contains(&run("Fig: Wide")));
    }

    #[test]
    fn test_section_with_short_title() {
        let body = latex_to_docx_body("\\section[Short]{A Longer Title}\nBody text.");
        assert_eq!(
            body,
            format!(
                "<w:body><w:p><w:pPr><w:pStyle w:val=\"Heading2\"/></w:pPr>{}</w:p><w:p>{}</w:p></w:body>",
                run("A Longer Title"),
                run("Body text.")
            )
        );
    }

    #[test]
    fn test_item_mentioned_in_prose() {
        let paragraphs =
            classify_document("Use the \\item command to add entries.", &DocxOptions::default());
        assert_eq!(paragraphs.len(), 1);
        assert!(!paragraphs[0].contains("ListBullet"));
    }

    #[test]
    fn test_figure_defaults() {
        let paragraphs = classify_document("\\begin{figure}\n\\end{figure}", &DocxOptions::default());
        assert!(paragraphs[0].contains("[IMAGE PLACEHOLDER: ]"));
        assert!(paragraphs[1].contains(&run("Fig: Figure")));
    }

    #[test]
    fn test_unrecognized_command_dropped() {
        let paragraphs =
            classify_document("\\maketitle\n\n\\tableofcontents\n\nText", &DocxOptions::default());
        assert_eq!(paragraphs.len(), 1);
        assert!(paragraphs[0].contains("Text"));
    }

    #[test]
    fn test_lenient_keeps_unrecognized() {
        let paragraphs = classify_document("\\maketitle\n\nText", &DocxOptions::lenient());
        assert_eq!(paragraphs.len(), 2);
    }

    #[test]
    fn test_paragraph_starting_with_ref() {
        let paragraphs =
            classify_document(r"\ref{fig1} shows the setup.", &DocxOptions::default());
        assert_eq!(paragraphs.len(), 1);
        assert!(paragraphs[0].starts_with("<w:p><w:r><w:rPr><w:b/>"));
    }
}

// ============================================================================
// Whole Documents
// ============================================================================

mod document {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_end_to_end() {
        let body = latex_to_docx_body("\\section{Intro}\n\nValue is $x_i$ and \\ref{eq1}.");
        let expected = format!(
            "<w:body><w:p><w:pPr><w:pStyle w:val=\"Heading2\"/></w:pPr>{}</w:p><w:p>{}{}{}{}{}</w:p></w:body>",
            run("Intro"),
            run("Value is "),
            render_math("x_i"),
            run(" and "),
            "<w:r><w:rPr><w:b/></w:rPr><w:t xml:space=\"preserve\">eq1</w:t></w:r>",
            run("."),
        );
        assert_eq!(body, expected);
    }

    #[test]
    fn test_thesis_chapter() {
        let src = r"\chapter{Method}
% internal note: rewrite later
We model the loss as $L = \sum_i \ell_i$.

\section{Setup}\label{sec:setup}
\begin{itemize}
\item Learning rate $\eta = 0.1$
\item Batch size 32
\end{itemize}

\begin{equation}
\nabla_\theta L = 0
\end{equation}

See \eqref{eq:grad} and Figure \ref{fig:arch}.
";
        let output = latex_to_docx_with_diagnostics(src, &DocxOptions::default());
        assert!(!output.has_warnings(), "{:?}", output.warnings);
        let doc = output.content;
        assert!(!doc.contains("internal note"));
        assert!(!doc.contains("sec:setup"));
        assert!(doc.contains("Heading1"));
        assert_eq!(doc.matches("ListBullet").count(), 2);
        assert!(doc.contains("η"));
        assert!(doc.contains("∇"));
        assert!(doc.contains(">(eq:grad)</w:t>"));
    }

    #[test]
    fn test_xml_special_characters() {
        let body = latex_to_docx_body("Tom & Jerry <3");
        assert!(body.contains("Tom &amp; Jerry &lt;3"));
    }

    #[test]
    fn test_control_characters_removed() {
        let body = latex_to_docx_body("page one\u{c}page two");
        assert!(!body.contains('\u{c}'));
        assert!(body.contains(&run("page one page two")));
    }

    #[test]
    fn test_document_part_namespaces() {
        let doc = latex_to_document_xml("x");
        assert!(doc.contains("xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\""));
        assert!(doc.contains("xmlns:m=\"http://schemas.openxmlformats.org/officeDocument/2006/math\""));
    }

    #[test]
    fn test_conversions_are_independent() {
        let first = latex_to_docx_with_diagnostics("\\begin{itemize}\n\\item x", &DocxOptions::default());
        assert_eq!(first.warnings[0].kind, WarningKind::UnclosedList);
        let second = latex_to_docx_body("\\item y");
        assert!(second.contains(&run("• ")));
    }

    #[test]
    fn test_unmatched_list_end_tolerated() {
        let output = latex_to_docx_with_diagnostics("\\end{itemize}\n\nText", &DocxOptions::default());
        assert_eq!(output.warnings[0].kind, WarningKind::UnmatchedListEnd);
        assert!(output.content.contains("Text"));
    }
}

// ============================================================================
// Packaging
// ============================================================================

mod package {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_docx_archive() {
        let bytes = latex_to_docx_bytes("\\section{Intro}\n\nHello $x$").unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 4);

        let mut types = String::new();
        archive
            .by_name("[Content_Types].xml")
            .unwrap()
            .read_to_string(&mut types)
            .unwrap();
        assert!(types.contains("/word/document.xml"));
        assert!(types.contains("/word/styles.xml"));

        let mut doc = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut doc)
            .unwrap();
        assert_eq!(doc, latex_to_document_xml("\\section{Intro}\n\nHello $x$"));
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

mod diagnostics {
    use super::*;

    #[test]
    fn test_clean_input() {
        assert!(check_latex("\\section{A}\n\nText $x$.").is_empty());
    }

    #[test]
    fn test_reports_problems_with_lines() {
        let result = check_latex("\\section{A}\n\n\\begin{itemize}\n\\item $x\n");
        assert!(result.has_errors());
        assert!(result.warnings >= 1);
        assert!(result.diagnostics.iter().all(|d| d.line.is_some()));
    }
}
