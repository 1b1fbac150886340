use lopdf::content::Content;
use lopdf::xref::{Xref, XrefEntry, XrefType};
use lopdf::{Dictionary, Object, ObjectId, Stream, dictionary};
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Tracks how many bytes went through, so object offsets are known without `Seek`.
struct CountingWriter<W: Write> {
    inner: W,
    written: u64,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Writes a PDF file front to back. Large objects (content streams, font
/// programs, images) go out as soon as they are produced; the page tree,
/// catalog and other small dictionaries are buffered until [`finish`].
///
/// [`finish`]: StreamingPdfWriter::finish
pub struct StreamingPdfWriter<W: Write> {
    writer: CountingWriter<W>,
    xref: Xref,
    max_id: u32,
    pub catalog_id: ObjectId,
    pub pages_id: ObjectId,
    pub resources_id: ObjectId,
    page_ids: Vec<ObjectId>,
    info_id: Option<ObjectId>,
    buffered_objects: BTreeMap<ObjectId, Object>,
}

impl<W: Write> StreamingPdfWriter<W> {
    pub fn new(writer: W, version: &str) -> io::Result<Self> {
        let mut writer = CountingWriter { inner: writer, written: 0 };
        writer.write_all(format!("%PDF-{}\n%âãÏÓ\n", version).as_bytes())?;

        Ok(Self {
            writer,
            xref: Xref::new(0, XrefType::CrossReferenceTable),
            max_id: 3,
            resources_id: (1, 0),
            pages_id: (2, 0),
            catalog_id: (3, 0),
            page_ids: Vec::new(),
            info_id: None,
            buffered_objects: BTreeMap::new(),
        })
    }

    pub fn new_object_id(&mut self) -> ObjectId {
        self.max_id += 1;
        (self.max_id, 0)
    }

    /// Writes an object to the output immediately.
    pub fn write_object(&mut self, object: Object) -> io::Result<ObjectId> {
        let id = self.new_object_id();
        internal_writer::write_indirect_object(&mut self.writer, id, &object, &mut self.xref)?;
        Ok(id)
    }

    pub fn write_content_stream(&mut self, content: Content) -> io::Result<ObjectId> {
        for operation in &content.operations {
            operation
                .operands
                .iter()
                .try_for_each(internal_writer::ensure_finite)
                .map_err(|e| {
                    io::Error::new(e.kind(), format!("operator '{}': {}", operation.operator, e))
                })?;
        }
        let bytes = content
            .encode()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        self.write_object(Object::Stream(Stream::new(dictionary! {}, bytes)))
    }

    pub fn buffer_object(&mut self, object: Object) -> ObjectId {
        let id = self.new_object_id();
        self.buffered_objects.insert(id, object);
        id
    }

    pub fn buffer_object_at_id(&mut self, id: ObjectId, object: Object) {
        if id.0 > self.max_id {
            self.max_id = id.0;
        }
        self.buffered_objects.insert(id, object);
    }

    pub fn set_resources(&mut self, resources: Dictionary) {
        let id = self.resources_id;
        self.buffer_object_at_id(id, resources.into());
    }

    pub fn add_page_id(&mut self, page_id: ObjectId) {
        self.page_ids.push(page_id);
    }

    pub fn set_info(&mut self, info: Dictionary) {
        self.info_id = Some(self.buffer_object(info.into()));
    }

    /// Writes the buffered objects, the xref table and the trailer, then
    /// returns the underlying writer and the total number of bytes written.
    pub fn finish(mut self) -> io::Result<(W, u64)> {
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => self.page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<Object>>(),
            "Count" => self.page_ids.len() as i64,
        };
        self.buffer_object_at_id(self.pages_id, pages_dict.into());

        let catalog_dict = dictionary! { "Type" => "Catalog", "Pages" => self.pages_id };
        self.buffer_object_at_id(self.catalog_id, catalog_dict.into());

        if !self.buffered_objects.contains_key(&self.resources_id) {
            self.buffer_object_at_id(self.resources_id, Dictionary::new().into());
        }

        let buffered = std::mem::take(&mut self.buffered_objects);
        for (id, object) in &buffered {
            internal_writer::write_indirect_object(&mut self.writer, *id, object, &mut self.xref)?;
        }

        let xref_start = self.writer.written;
        self.xref.size = self.max_id + 1;
        internal_writer::write_xref(&mut self.writer, &self.xref)?;

        let mut trailer = dictionary! { "Size" => self.xref.size as i64, "Root" => self.catalog_id };
        if let Some(info_id) = self.info_id {
            trailer.set("Info", info_id);
        }
        writeln!(self.writer, "trailer")?;
        internal_writer::write_dictionary(&mut self.writer, &trailer)?;
        writeln!(self.writer, "\nstartxref")?;
        writeln!(self.writer, "{}", xref_start)?;
        write!(self.writer, "%%EOF")?;

        self.writer.flush()?;
        Ok((self.writer.inner, self.writer.written))
    }
}

mod internal_writer {
    use super::*;
    use lopdf::StringFormat;

    pub fn write_indirect_object<W: Write>(
        writer: &mut CountingWriter<W>,
        id: ObjectId,
        object: &Object,
        xref: &mut Xref,
    ) -> io::Result<()> {
        let offset = u32::try_from(writer.written).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidData, "PDF exceeds 4 GiB xref limit")
        })?;
        xref.insert(id.0, XrefEntry::Normal { offset, generation: id.1 });
        writeln!(writer, "{} {} obj", id.0, id.1)?;
        write_object(writer, object)?;
        writeln!(writer, "\nendobj")?;
        Ok(())
    }

    pub fn write_object(writer: &mut dyn Write, object: &Object) -> io::Result<()> {
        match object {
            Object::Null => writer.write_all(b"null"),
            Object::Boolean(b) => writer.write_all(if *b { b"true" } else { b"false" }),
            Object::Integer(i) => write!(writer, "{}", i),
            Object::Real(r) => {
                ensure_finite(object)?;
                write!(writer, "{}", format_real(*r))
            }
            Object::Name(n) => {
                writer.write_all(b"/")?;
                writer.write_all(n)
            }
            Object::String(s, format) => match format {
                StringFormat::Literal => {
                    writer.write_all(b"(")?;
                    for &byte in s {
                        if byte == b'(' || byte == b')' || byte == b'\\' {
                            writer.write_all(b"\\")?;
                        }
                        writer.write_all(&[byte])?;
                    }
                    writer.write_all(b")")
                }
                StringFormat::Hexadecimal => {
                    writer.write_all(b"<")?;
                    for byte in s {
                        write!(writer, "{:02X}", byte)?;
                    }
                    writer.write_all(b">")
                }
            },
            Object::Array(arr) => {
                writer.write_all(b"[")?;
                for (i, obj) in arr.iter().enumerate() {
                    if i > 0 {
                        writer.write_all(b" ")?;
                    }
                    write_object(writer, obj)?;
                }
                writer.write_all(b"]")
            }
            Object::Dictionary(dict) => write_dictionary(writer, dict),
            Object::Stream(stream) => {
                let mut dict = stream.dict.clone();
                dict.set("Length", stream.content.len() as i64);
                write_dictionary(writer, &dict)?;
                writer.write_all(b"\nstream\n")?;
                writer.write_all(&stream.content)?;
                writer.write_all(b"\nendstream")
            }
            Object::Reference(id) => write!(writer, "{} {} R", id.0, id.1),
        }
    }

    /// PDF has no representation for NaN or infinity.
    pub fn ensure_finite(object: &Object) -> io::Result<()> {
        match object {
            Object::Real(r) if !r.is_finite() => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("non-finite number {}", r),
            )),
            Object::Array(items) => items.iter().try_for_each(ensure_finite),
            Object::Dictionary(dict) => dict.iter().try_for_each(|(_, v)| ensure_finite(v)),
            _ => Ok(()),
        }
    }

    /// Fixed three-decimal form without trailing zeros.
    fn format_real(value: f32) -> String {
        let text = format!("{:.3}", value);
        let text = text.trim_end_matches('0').trim_end_matches('.');
        match text {
            "" | "-" | "-0" => "0".to_string(),
            other => other.to_string(),
        }
    }

    pub fn write_dictionary(writer: &mut dyn Write, dict: &Dictionary) -> io::Result<()> {
        writer.write_all(b"<<")?;
        let sorted_keys: BTreeMap<_, _> = dict.iter().collect();
        for (key, value) in sorted_keys {
            writer.write_all(b"/")?;
            writer.write_all(key)?;
            writer.write_all(b" ")?;
            write_object(writer, value)?;
            writer.write_all(b" ")?;
        }
        writer.write_all(b">>")
    }

    pub fn write_xref<W: Write>(writer: &mut W, xref: &Xref) -> io::Result<()> {
        writeln!(writer, "xref")?;
        writeln!(writer, "0 {}", xref.size)?;
        writeln!(writer, "0000000000 65535 f ")?;
        for id in 1..xref.size {
            match xref.get(id) {
                Some(XrefEntry::Normal { offset, generation }) => {
                    writeln!(writer, "{:010} {:05} n ", offset, generation)?
                }
                _ => writeln!(writer, "0000000000 65535 f ")?,
            }
        }
        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Operation;

    #[test]
    fn test_minimal_document_is_parseable() {
        let mut writer = StreamingPdfWriter::new(Vec::new(), "1.7").unwrap();
        let content = Content {
            operations: vec![Operation::new("g", vec![0.0.into()])],
        };
        let content_id = writer.write_content_stream(content).unwrap();
        let page = dictionary! {
            "Type" => "Page",
            "Parent" => writer.pages_id,
            "MediaBox" => vec![0.0.into(), 0.0.into(), 100.0.into(), 100.0.into()],
            "Contents" => content_id,
            "Resources" => writer.resources_id,
        };
        let page_id = writer.buffer_object(page.into());
        writer.add_page_id(page_id);
        writer.set_info(dictionary! { "Producer" => Object::string_literal("test") });

        let (bytes, written) = writer.finish().unwrap();
        assert_eq!(bytes.len() as u64, written);
        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(bytes.ends_with(b"%%EOF"));

        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        assert!(doc.trailer.get(b"Info").is_ok());
    }

    #[test]
    fn test_non_finite_numbers_are_refused() {
        let mut writer = StreamingPdfWriter::new(Vec::new(), "1.7").unwrap();
        let content = Content {
            operations: vec![Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Real(f32::INFINITY)])],
        };
        let err = writer.write_content_stream(content).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("Tf"));

        let err = writer
            .write_object(vec![Object::Real(0.0), Object::Real(f32::NAN)].into())
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_dictionary_keys_are_sorted() {
        let mut out = Vec::new();
        let dict = dictionary! { "Zeta" => 1i64, "Alpha" => 2i64 };
        internal_writer::write_dictionary(&mut out, &dict).unwrap();
        assert_eq!(out, b"<</Alpha 2 /Zeta 1 >>");
    }
}
