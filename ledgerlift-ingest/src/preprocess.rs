//! PDF pre-processing before extraction.
//!
//! Chase statements open with several pages of marketing and account
//! summaries. When one is detected and the transaction section starts deep in
//! the document, the leading pages are dropped to cut model noise and tokens.
//! Everything here is best effort: on any failure the original file is used.

use anyhow::{anyhow, Result};
use regex::Regex;

use crate::types::SourceDocument;

/// Only the first pages are searched for the bank marker and activity header
pub const MAX_SCAN_PAGES: usize = 15;

/// Trimming only kicks in when activity starts after this (1-based) page
const MIN_TRIM_START_PAGE: u32 = 3;

const ACTIVITY_PATTERNS: &[&str] = &[
    r"(?i)account\s+activity",
    r"(?i)transaction\s+detail",
    r"(?i)activity\s+detail",
    r"(?i)checking\s+summary",
    r"(?i)electronic\s+withdrawals",
    r"(?i)detail\s+of\s+activity",
];

/// What the page scan found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageScan {
    pub is_chase: bool,
    /// 1-based page where the transaction section begins
    pub activity_start_page: Option<u32>,
}

impl PageScan {
    /// First page (1-based) to keep, or `None` to leave the document whole.
    ///
    /// One page before the detected start is kept as margin.
    pub fn keep_from_page(&self) -> Option<u32> {
        match self.activity_start_page {
            Some(start) if self.is_chase && start > MIN_TRIM_START_PAGE => {
                Some(start.saturating_sub(1).max(1))
            }
            _ => None,
        }
    }
}

/// Scan page texts for the Chase marker and the start of the activity section.
pub fn scan_pages<S: AsRef<str>>(pages: &[S]) -> Result<PageScan> {
    let chase_re = Regex::new(r"(?i)Chase|JPMorgan")?;
    let activity_res = ACTIVITY_PATTERNS
        .iter()
        .map(|p| Regex::new(p))
        .collect::<Result<Vec<_>, _>>()?;

    let mut scan = PageScan::default();

    for (i, page) in pages.iter().take(MAX_SCAN_PAGES).enumerate() {
        let text = page.as_ref();

        if !scan.is_chase && chase_re.is_match(text) {
            scan.is_chase = true;
        }

        if scan.activity_start_page.is_none() && activity_res.iter().any(|re| re.is_match(text)) {
            scan.activity_start_page = Some(i as u32 + 1);
        }

        if scan.is_chase && scan.activity_start_page.is_some() {
            break;
        }
    }

    Ok(scan)
}

/// Return the document to send for extraction: trimmed when it is a Chase
/// statement with a late activity section, otherwise unchanged.
pub fn preprocess(doc: &SourceDocument) -> SourceDocument {
    match try_trim(doc) {
        Ok(Some(bytes)) => doc.with_bytes(bytes),
        Ok(None) => doc.clone(),
        Err(e) => {
            tracing::warn!(file = %doc.name, error = %e, "pdf preprocessing failed; using original file");
            doc.clone()
        }
    }
}

fn try_trim(doc: &SourceDocument) -> Result<Option<Vec<u8>>> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(&doc.bytes)
        .map_err(|e| anyhow!("read pdf text: {e}"))?;
    let scan = scan_pages(&pages)?;

    let Some(keep_from) = scan.keep_from_page() else {
        return Ok(None);
    };

    tracing::info!(
        file = %doc.name,
        keep_from,
        "Chase statement detected; trimming leading pages"
    );

    let mut pdf = lopdf::Document::load_mem(&doc.bytes)?;
    let leading: Vec<u32> = (1..keep_from).collect();
    pdf.delete_pages(&leading);
    pdf.prune_objects();

    let mut out = Vec::new();
    pdf.save_to(&mut out)?;
    Ok(Some(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    fn pages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    /// One line of Helvetica text per page
    fn build_pdf(page_texts: &[&str]) -> Vec<u8> {
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

        let mut kids: Vec<Object> = Vec::new();
        for text in page_texts {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 18.into()]),
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
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    fn page_count(bytes: &[u8]) -> usize {
        Document::load_mem(bytes).unwrap().get_pages().len()
    }

    const CHASE_STATEMENT: &[&str] = &[
        "JPMorgan Chase Bank N.A. Welcome",
        "Important account information",
        "Rewards summary",
        "Special offers",
        "CHECKING SUMMARY Beginning Balance",
        "TRANSACTION DETAIL 04/22 Payroll",
    ];

    #[test]
    fn test_chase_with_late_activity_is_trimmed() {
        let p = pages(&[
            "JPMorgan Chase Bank, N.A. Welcome",
            "Important account information",
            "Rewards summary",
            "More offers",
            "CHECKING SUMMARY  Beginning Balance",
            "TRANSACTION DETAIL 04/22 ...",
        ]);
        let scan = scan_pages(&p).unwrap();
        assert!(scan.is_chase);
        assert_eq!(scan.activity_start_page, Some(5));
        assert_eq!(scan.keep_from_page(), Some(4));
    }

    #[test]
    fn test_early_activity_not_trimmed() {
        let p = pages(&["Chase statement", "ACCOUNT   ACTIVITY", "more"]);
        let scan = scan_pages(&p).unwrap();
        assert_eq!(scan.activity_start_page, Some(2));
        assert_eq!(scan.keep_from_page(), None);
    }

    #[test]
    fn test_non_chase_not_trimmed() {
        let p = pages(&["Capital One", "x", "y", "z", "Transaction Detail"]);
        let scan = scan_pages(&p).unwrap();
        assert!(!scan.is_chase);
        assert_eq!(scan.activity_start_page, Some(5));
        assert_eq!(scan.keep_from_page(), None);
    }

    #[test]
    fn test_activity_beyond_scan_window_ignored() {
        let mut texts = vec!["chase"; 1];
        texts.extend(std::iter::repeat("filler").take(MAX_SCAN_PAGES));
        texts.push("Detail of Activity");
        let scan = scan_pages(&texts).unwrap();
        assert!(scan.is_chase);
        assert_eq!(scan.activity_start_page, None);
    }

    #[test]
    fn test_chase_pdf_keeps_pages_from_one_before_activity() {
        let doc = SourceDocument::new("chase.pdf", build_pdf(CHASE_STATEMENT));
        assert_eq!(page_count(&doc.bytes), 6);

        let text = pdf_extract::extract_text_from_mem_by_pages(&doc.bytes).unwrap();
        assert_eq!(text.len(), 6);
        let scan = scan_pages(&text).unwrap();
        assert!(scan.is_chase);
        assert_eq!(scan.activity_start_page, Some(5));

        let out = preprocess(&doc);
        assert_eq!(out.name, "chase.pdf");
        assert_eq!(page_count(&out.bytes), 3);

        let kept = pdf_extract::extract_text_from_mem_by_pages(&out.bytes).unwrap();
        assert!(kept[0].contains("Special offers"));
        assert!(kept[1].contains("CHECKING SUMMARY"));
    }

    #[test]
    fn test_non_chase_pdf_is_left_whole() {
        let texts = ["Capital One", "x", "y", "z", "Transaction Detail"];
        let doc = SourceDocument::new("c1.pdf", build_pdf(&texts));
        let out = preprocess(&doc);
        assert_eq!(out, doc);
    }

    #[test]
    fn test_unreadable_pdf_passes_through() {
        let doc = SourceDocument::new("broken.pdf", b"not a pdf".to_vec());
        let out = preprocess(&doc);
        assert_eq!(out, doc);
    }
}
