//! Fill-to-stroke conversion of whole documents using lopdf

use std::io::Read;
use std::path::{Path, PathBuf};
use flate2::read::ZlibDecoder;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use crate::color::StrokeColor;
use crate::error::{Error, Result};
use crate::pdf::content::{join_streams, rewrite_paint_operators};

/// Options for converting fills to strokes
#[derive(Debug, Clone)]
pub struct StrokeOptions {
    /// Source PDF file path
    pub input_path: PathBuf,
    /// Output PDF file path (created or overwritten)
    pub output_path: PathBuf,
    /// Stroke color to set before every converted operator
    pub color: Option<StrokeColor>,
}

/// What a conversion changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrokeReport {
    /// Total number of fill operators rewritten
    pub replacements: usize,
    /// 1-based numbers of the pages with at least one replacement
    pub pages_changed: Vec<u32>,
}

/// Convert every fill operator in a PDF into a stroke and save the result
///
/// Pages whose content cannot be read are logged and left as they are; only
/// failing to open or save the document is an error.
///
/// # Example
///
/// ```no_run
/// use pdf_ruiner::color::StrokeColor;
/// use pdf_ruiner::pdf::{convert_fill_to_stroke, StrokeOptions};
/// use std::path::PathBuf;
///
/// let options = StrokeOptions {
///     input_path: PathBuf::from("input.pdf"),
///     output_path: PathBuf::from("ruined/input.pdf"),
///     color: Some(StrokeColor::from_hex("#FF0000").unwrap()),
/// };
///
/// let report = convert_fill_to_stroke(&options).expect("Failed to convert");
/// println!("{} fills converted", report.replacements);
/// ```
pub fn convert_fill_to_stroke(options: &StrokeOptions) -> Result<StrokeReport> {
    let mut doc = load_document(&options.input_path)?;

    let report = convert_document(&mut doc, options.color.as_ref());

    // The replaced streams are no longer referenced by any page
    doc.prune_objects();
    doc.compress();
    doc.save(&options.output_path)?;

    log::debug!(
        "{} fill operators converted in {}",
        report.replacements,
        options.output_path.display()
    );

    Ok(report)
}

/// Convert fills to strokes on every page of an already loaded document
///
/// Content streams are decoded page by page; a page whose streams do not
/// decode cleanly keeps its original content.
pub fn convert_document(doc: &mut Document, color: Option<&StrokeColor>) -> StrokeReport {
    let mut report = StrokeReport::default();

    let pages: Vec<(u32, ObjectId)> = doc.get_pages().into_iter().collect();

    for (page_num, page_id) in pages {
        log::debug!("Processing page {}...", page_num);

        match convert_page(doc, page_num, page_id, color) {
            Ok(0) => {}
            Ok(count) => {
                report.replacements += count;
                report.pages_changed.push(page_num);
            }
            Err(e) => {
                log::warn!("Could not process page {}: {}", page_num, e);
            }
        }
    }

    report
}

fn load_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    Document::load(path).map_err(|source| Error::DocumentOpen {
        path: path.to_path_buf(),
        source,
    })
}

/// Rewrite one page, replacing its content with a single new stream
fn convert_page(
    doc: &mut Document,
    page_num: u32,
    page_id: ObjectId,
    color: Option<&StrokeColor>,
) -> Result<usize> {
    let content_ids = page_content_ids(doc, page_num, page_id)?;
    if content_ids.is_empty() {
        return Ok(0);
    }

    let mut streams = Vec::with_capacity(content_ids.len());
    for id in content_ids {
        let stream = doc.get_object(id).and_then(Object::as_stream).map_err(|e| {
            Error::PageContent {
                page: page_num,
                reason: format!("content stream {} {} R: {}", id.0, id.1, e),
            }
        })?;
        streams.push(decode_content_stream(stream, page_num, id)?);
    }

    let rewrite = rewrite_paint_operators(&join_streams(streams), color);

    let new_stream_id = doc.add_object(Stream::new(Dictionary::new(), rewrite.content));
    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Contents", Object::Reference(new_stream_id));

    Ok(rewrite.replacements)
}

/// Decoded bytes of one content stream
///
/// Flate data is decoded strictly: corrupt data fails the page instead of
/// coming back truncated or empty.
fn decode_content_stream(stream: &Stream, page_num: u32, id: ObjectId) -> Result<Vec<u8>> {
    let failed = |reason: String| Error::PageContent {
        page: page_num,
        reason: format!("content stream {} {} R: {}", id.0, id.1, reason),
    };

    let filters: Vec<&[u8]> = match stream.dict.get(b"Filter") {
        Err(_) => return Ok(stream.content.clone()),
        Ok(Object::Name(name)) => vec![name.as_slice()],
        Ok(Object::Array(arr)) => arr
            .iter()
            .map(|obj| match obj {
                Object::Name(name) => Ok(name.as_slice()),
                _ => Err(failed("filter entry is not a name".to_string())),
            })
            .collect::<Result<_>>()?,
        Ok(_) => return Err(failed("malformed /Filter".to_string())),
    };

    if filters == [b"FlateDecode".as_slice()] && stream.dict.get(b"DecodeParms").is_err() {
        let mut decoded = Vec::new();
        ZlibDecoder::new(stream.content.as_slice())
            .read_to_end(&mut decoded)
            .map_err(|e| failed(format!("FlateDecode failed: {}", e)))?;
        return Ok(decoded);
    }

    let decoded = stream
        .decompressed_content()
        .map_err(|e| failed(format!("could not decode: {}", e)))?;
    if decoded.is_empty() && !stream.content.is_empty() {
        return Err(failed("decoded to nothing".to_string()));
    }
    Ok(decoded)
}

/// Content stream references of a page, in drawing order
///
/// `/Contents` may be a stream reference, an array of them, or a reference
/// to such an array. A missing `/Contents` means the page draws nothing and
/// yields no ids.
fn page_content_ids(doc: &Document, page_num: u32, page_id: ObjectId) -> Result<Vec<ObjectId>> {
    let page_dict = doc.get_dictionary(page_id)?;

    let contents = match page_dict.get(b"Contents") {
        Ok(contents) => contents,
        Err(_) => return Ok(vec![]),
    };

    let malformed = |what: &str| Error::PageContent {
        page: page_num,
        reason: format!("unsupported /Contents entry ({})", what),
    };

    let references = |arr: &[Object]| -> Result<Vec<ObjectId>> {
        arr.iter()
            .map(|obj| obj.as_reference().map_err(|_| malformed("array item is not a reference")))
            .collect()
    };

    match contents {
        // Anything but an array is checked when the stream is read
        Object::Reference(id) => match doc.get_object(*id) {
            Ok(Object::Array(arr)) => references(arr),
            _ => Ok(vec![*id]),
        },
        Object::Array(arr) => references(arr),
        _ => Err(malformed("not a reference or array")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    /// Build a document whose pages have the given content stream lists
    fn document_with_pages(pages: &[&[&[u8]]]) -> (Document, Vec<ObjectId>) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut page_ids = Vec::new();

        for streams in pages {
            let content_ids: Vec<Object> = streams
                .iter()
                .map(|bytes| {
                    Object::Reference(doc.add_object(Stream::new(dictionary! {}, bytes.to_vec())))
                })
                .collect();

            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
            };
            match content_ids.len() {
                0 => {}
                1 => page.set("Contents", content_ids[0].clone()),
                _ => page.set("Contents", Object::Array(content_ids)),
            }
            page_ids.push(doc.add_object(page));
        }

        let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_ids.len() as i64),
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        (doc, page_ids)
    }

    fn page_bytes(doc: &Document, page_id: ObjectId) -> Vec<u8> {
        let ids = doc.get_page_contents(page_id);
        assert_eq!(ids.len(), 1, "page should have exactly one content stream");
        doc.get_object(ids[0]).unwrap().as_stream().unwrap().content.clone()
    }

    #[test]
    fn test_single_stream_page() {
        let (mut doc, page_ids) = document_with_pages(&[&[b"0 0 10 10 re f\n"]]);

        let report = convert_document(&mut doc, None);

        assert_eq!(report.replacements, 1);
        assert_eq!(report.pages_changed, vec![1]);
        assert_eq!(page_bytes(&doc, page_ids[0]), b"0 0 10 10 re S\n".to_vec());
    }

    #[test]
    fn test_multiple_streams_joined_with_newline() {
        // The first stream ends right after the operator; joining adds the delimiter
        let (mut doc, page_ids) =
            document_with_pages(&[&[b"0 0 10 10 re f", b"1 1 5 5 re b*\n"]]);
        let red = StrokeColor::from_hex("FF0000").unwrap();

        let report = convert_document(&mut doc, Some(&red));

        assert_eq!(report.replacements, 2);
        assert_eq!(
            page_bytes(&doc, page_ids[0]),
            b"0 0 10 10 re 1.0 0.0 0.0 RG S\n1 1 5 5 re 1.0 0.0 0.0 RG s\n".to_vec()
        );
    }

    #[test]
    fn test_page_without_contents_untouched() {
        let (mut doc, page_ids) = document_with_pages(&[&[], &[b"0 0 1 1 re F\n"]]);

        let report = convert_document(&mut doc, None);

        assert_eq!(report.replacements, 1);
        assert_eq!(report.pages_changed, vec![2]);
        let first_page = doc.get_dictionary(page_ids[0]).unwrap();
        assert!(first_page.get(b"Contents").is_err());
    }

    #[test]
    fn test_broken_page_does_not_stop_others() {
        let (mut doc, page_ids) =
            document_with_pages(&[&[b"0 0 1 1 re f\n"], &[b"0 0 1 1 re B\n"]]);

        // Point page 1 at an object that does not exist
        doc.get_object_mut(page_ids[0])
            .unwrap()
            .as_dict_mut()
            .unwrap()
            .set("Contents", Object::Reference((9999, 0)));

        let report = convert_document(&mut doc, None);

        assert_eq!(report.replacements, 1);
        assert_eq!(report.pages_changed, vec![2]);
        let first_page = doc.get_dictionary(page_ids[0]).unwrap();
        assert_eq!(
            first_page.get(b"Contents").unwrap().as_reference().unwrap(),
            (9999, 0)
        );
    }

    fn zlib(bytes: &[u8]) -> Vec<u8> {
        use flate2::write::ZlibEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_corrupt_flate_stream_leaves_page_intact() {
        let (mut doc, page_ids) =
            document_with_pages(&[&[b"0 0 1 1 re f\n"], &[b"0 0 1 1 re B\n"]]);

        let stream_id = doc.get_page_contents(page_ids[0])[0];
        let corrupt = b"this is not zlib data".to_vec();
        doc.objects.insert(
            stream_id,
            Object::Stream(Stream::new(dictionary! { "Filter" => "FlateDecode" }, corrupt.clone())),
        );

        let report = convert_document(&mut doc, None);

        assert_eq!(report.replacements, 1);
        assert_eq!(report.pages_changed, vec![2]);
        assert_eq!(doc.get_page_contents(page_ids[0]), vec![stream_id]);
        let kept = doc.get_object(stream_id).unwrap().as_stream().unwrap();
        assert_eq!(kept.content, corrupt);
    }

    #[test]
    fn test_flate_stream_is_decoded_before_rewrite() {
        let (mut doc, page_ids) = document_with_pages(&[&[b"placeholder"]]);

        let stream_id = doc.get_page_contents(page_ids[0])[0];
        doc.objects.insert(
            stream_id,
            Object::Stream(Stream::new(
                dictionary! { "Filter" => "FlateDecode" },
                zlib(b"0 0 10 10 re f*\n"),
            )),
        );

        let report = convert_document(&mut doc, None);

        assert_eq!(report.replacements, 1);
        assert_eq!(page_bytes(&doc, page_ids[0]), b"0 0 10 10 re S\n".to_vec());
    }

    #[test]
    fn test_contents_reference_to_array_expanded() {
        let (mut doc, page_ids) = document_with_pages(&[&[]]);

        let first = doc.add_object(Stream::new(dictionary! {}, b"0 0 1 1 re f\n".to_vec()));
        let second = doc.add_object(Stream::new(dictionary! {}, b"2 2 1 1 re b\n".to_vec()));
        let array_id = doc.add_object(Object::Array(vec![
            Object::Reference(first),
            Object::Reference(second),
        ]));
        doc.get_object_mut(page_ids[0])
            .unwrap()
            .as_dict_mut()
            .unwrap()
            .set("Contents", Object::Reference(array_id));

        let report = convert_document(&mut doc, None);

        assert_eq!(report.replacements, 2);
        assert_eq!(report.pages_changed, vec![1]);
        assert_eq!(
            page_bytes(&doc, page_ids[0]),
            b"0 0 1 1 re S\n\n2 2 1 1 re s\n".to_vec()
        );
    }

    #[test]
    fn test_unchanged_page_not_reported() {
        let (mut doc, _) = document_with_pages(&[&[b"0 0 1 1 re S\n"]]);

        let report = convert_document(&mut doc, None);

        assert_eq!(report, StrokeReport::default());
    }

    #[test]
    fn test_missing_input_file() {
        let options = StrokeOptions {
            input_path: PathBuf::from("nonexistent.pdf"),
            output_path: PathBuf::from("out.pdf"),
            color: None,
        };

        let result = convert_fill_to_stroke(&options);
        assert!(matches!(result.unwrap_err(), Error::FileNotFound(_)));
    }
}
