//! Font and image objects shared by all pages.

use crate::writer::StreamingPdfWriter;
use folio_layout::{FontProgram, ImageData, LoadedFont};
use lopdf::{Dictionary, Object, ObjectId, Stream, dictionary};
use std::io::{self, Write};

const FIRST_CHAR: usize = 32;
const LAST_CHAR: usize = 255;

// FontDescriptor flag bits.
const FIXED_PITCH: i64 = 1;
const NONSYMBOLIC: i64 = 1 << 5;
const ITALIC: i64 = 1 << 6;

/// Writes the objects for one font and returns its font dictionary.
pub fn font_dictionary<W: Write>(
    writer: &mut StreamingPdfWriter<W>,
    font: &LoadedFont,
) -> io::Result<Dictionary> {
    match &font.program {
        FontProgram::Standard(_) => Ok(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.postscript_name.clone(),
            "Encoding" => "WinAnsiEncoding",
        }),
        FontProgram::TrueType(data) => {
            let program = Stream::new(
                dictionary! { "Length1" => data.len() as i64 },
                data.as_ref().clone(),
            );
            let file_id = writer.write_object(Object::Stream(program))?;
            let descriptor_id = writer.buffer_object(font_descriptor(font, file_id).into());

            let widths: Vec<Object> = font.metrics.widths[FIRST_CHAR..=LAST_CHAR]
                .iter()
                .map(|w| Object::Integer(*w as i64))
                .collect();
            Ok(dictionary! {
                "Type" => "Font",
                "Subtype" => "TrueType",
                "BaseFont" => font.postscript_name.clone(),
                "Encoding" => "WinAnsiEncoding",
                "FirstChar" => FIRST_CHAR as i64,
                "LastChar" => LAST_CHAR as i64,
                "Widths" => widths,
                "FontDescriptor" => descriptor_id,
            })
        }
    }
}

fn font_descriptor(font: &LoadedFont, file_id: ObjectId) -> Dictionary {
    let metrics = &font.metrics;
    let mut flags = NONSYMBOLIC;
    if metrics.fixed_pitch {
        flags |= FIXED_PITCH;
    }
    if metrics.italic_angle != 0.0 {
        flags |= ITALIC;
    }
    let bbox: Vec<Object> = metrics.bbox.iter().map(|v| Object::Real(*v)).collect();
    dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => font.postscript_name.clone(),
        "Flags" => flags,
        "FontBBox" => bbox,
        "ItalicAngle" => metrics.italic_angle,
        "Ascent" => metrics.ascent,
        "Descent" => metrics.descent,
        "CapHeight" => metrics.cap_height,
        "StemV" => 80i64,
        "FontFile2" => file_id,
    }
}

/// Writes a JPEG image XObject.
pub fn write_image<W: Write>(
    writer: &mut StreamingPdfWriter<W>,
    image: &ImageData,
) -> io::Result<ObjectId> {
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => image.width_px as i64,
        "Height" => image.height_px as i64,
        "ColorSpace" => image.color_space.pdf_name(),
        "BitsPerComponent" => image.bits_per_component as i64,
        "Filter" => "DCTDecode",
    };
    if image.color_space == folio_layout::ColorSpace::Cmyk {
        // Adobe CMYK JPEGs are stored inverted.
        let decode: Vec<Object> = (0..4)
            .flat_map(|_| [Object::Integer(1), Object::Integer(0)])
            .collect();
        dict.set("Decode", decode);
    }
    let stream = Stream::new(dict, image.data.as_ref().clone()).with_compression(false);
    writer.write_object(Object::Stream(stream))
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_layout::{FontRegistry, StandardFont};

    #[test]
    fn test_standard_font_is_type1() {
        let registry = FontRegistry::standard();
        let (_, font) = registry.resolve("Helvetica", true, false).unwrap();
        let mut writer = StreamingPdfWriter::new(Vec::new(), "1.7").unwrap();

        let dict = font_dictionary(&mut writer, &font).unwrap();
        assert_eq!(dict.get(b"Subtype").unwrap().as_name().unwrap(), b"Type1");
        assert_eq!(dict.get(b"BaseFont").unwrap().as_name().unwrap(), b"Helvetica-Bold");
        assert!(matches!(font.program, FontProgram::Standard(StandardFont::HelveticaBold)));
    }

    #[test]
    fn test_descriptor_flags() {
        let registry = FontRegistry::standard();
        let (_, font) = registry.resolve("Courier", false, true).unwrap();
        let descriptor = font_descriptor(&font, (10, 0));
        let flags = descriptor.get(b"Flags").unwrap().as_i64().unwrap();
        assert_eq!(flags, FIXED_PITCH | NONSYMBOLIC | ITALIC);
    }
}
