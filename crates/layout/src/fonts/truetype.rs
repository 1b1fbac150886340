use super::{FontError, FontMetrics, FontProgram, LoadedFont};
use crate::encoding;
use folio_traits::SharedResourceData;

/// Parses a TrueType/OpenType file and extracts the metrics the layout and
/// the PDF font descriptor need.
pub(super) fn load(path: &str, data: SharedResourceData) -> Result<LoadedFont, FontError> {
    let invalid = |reason: String| FontError::InvalidFont {
        path: path.to_string(),
        reason,
    };

    let mut db = fontdb::Database::new();
    db.load_font_data(data.as_ref().clone());
    let (postscript_name, index) = db
        .faces()
        .next()
        .map(|face| (face.post_script_name.clone(), face.index))
        .ok_or_else(|| invalid("no font face found".to_string()))?;

    let face = ttf_parser::Face::parse(&data, index).map_err(|e| invalid(e.to_string()))?;
    let metrics = extract_metrics(&face);

    let postscript_name = if postscript_name.is_empty() {
        log::warn!("Font '{}' has no PostScript name, deriving one from the path", path);
        name_from_path(path)
    } else {
        postscript_name
    };

    Ok(LoadedFont {
        postscript_name,
        program: FontProgram::TrueType(data),
        metrics,
    })
}

fn extract_metrics(face: &ttf_parser::Face<'_>) -> FontMetrics {
    let scale = 1000.0 / face.units_per_em() as f32;
    let scaled = |v: i16| (v as f32 * scale).round();

    let fallback = face
        .glyph_hor_advance(ttf_parser::GlyphId(0))
        .map(|w| (w as f32 * scale).round() as u16)
        .unwrap_or(500);
    let mut widths = [fallback; 256];
    for (code, width) in widths.iter_mut().enumerate() {
        let advance = encoding::decode_byte(code as u8)
            .and_then(|c| face.glyph_index(c))
            .and_then(|glyph| face.glyph_hor_advance(glyph));
        if let Some(advance) = advance {
            *width = (advance as f32 * scale).round() as u16;
        }
    }

    let bbox = face.global_bounding_box();
    let ascent = scaled(face.ascender());
    FontMetrics {
        widths,
        ascent,
        descent: scaled(face.descender()),
        cap_height: face.capital_height().map(scaled).unwrap_or(ascent),
        italic_angle: if face.is_italic() { -12.0 } else { 0.0 },
        bbox: [
            scaled(bbox.x_min),
            scaled(bbox.y_min),
            scaled(bbox.x_max),
            scaled(bbox.y_max),
        ],
        fixed_pitch: face.is_monospaced(),
    }
}

fn name_from_path(path: &str) -> String {
    let stem = path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(path)
        .split('.')
        .next()
        .unwrap_or(path);
    stem.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '-').collect()
}
