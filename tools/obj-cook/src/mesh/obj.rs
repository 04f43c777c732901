//! OBJ parsing
//!
//! Handles the subset of Wavefront OBJ a cooked mesh needs:
//!
//! | Record | Fields              | Effect                                  |
//! |--------|---------------------|-----------------------------------------|
//! | `v`    | 3 floats            | position                                |
//! | `vt`   | 2 floats            | texture coordinate, stored as `(u, 1-v)` |
//! | `vn`   | 3 floats            | normal                                  |
//! | `f`    | 3 or 4 `p/t/n` refs | 1 triangle, or 2 for a quad             |
//!
//! Any other record (comments, groups, materials, ...) is skipped, whatever
//! its encoding. Face sub-indices may be separated by `/` or whitespace, but
//! all three are required: `p`, `p/t` and `p//n` are rejected, as are
//! negative (relative) indices.

use glam::{Vec2, Vec3};
use std::io::BufRead;
use std::str::SplitWhitespace;

use super::builder::{MeshBuilder, VertexKey};
use super::error::{Attribute, ParseError};
use cooked_mesh::{Mesh, Vertex};

/// Fan split of a quad `a b c d` into `(a, b, c)` and `(a, c, d)`
pub const QUAD_SPLIT: [[usize; 3]; 2] = [[0, 1, 2], [0, 2, 3]];

const RECORDS: [&str; 4] = ["v", "vt", "vn", "f"];

/// Parse a complete OBJ source into a deduplicated mesh
pub fn parse_obj<R: BufRead>(mut reader: R) -> Result<Mesh, ParseError> {
    let mut parser = ObjParser::new();
    let mut buf = Vec::new();
    let mut line = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line += 1;
        parser.parse_raw_line(line, &buf)?;
    }
    Ok(parser.finish())
}

/// Line-at-a-time OBJ parser
///
/// Owns the raw attribute arrays for the duration of the parse; only the
/// finished [`Mesh`] outlives it.
#[derive(Debug, Default)]
pub struct ObjParser {
    positions: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
    normals: Vec<Vec3>,
    builder: MeshBuilder,
}

impl ObjParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one undecoded source line.
    ///
    /// Skipped records may use any encoding; `v`, `vt`, `vn` and `f` must be UTF-8.
    pub fn parse_raw_line(&mut self, line: usize, bytes: &[u8]) -> Result<(), ParseError> {
        if let Ok(text) = std::str::from_utf8(bytes) {
            return self.parse_line(line, text);
        }

        let text = String::from_utf8_lossy(bytes);
        match text.split_whitespace().next() {
            Some(record) if RECORDS.contains(&record) => Err(ParseError::malformed(
                line,
                format!("{record:?} record is not valid UTF-8"),
            )),
            _ => {
                tracing::debug!("line {}: skipping non-UTF-8 line", line);
                Ok(())
            }
        }
    }

    /// Parse one source line. `line` is the 1-based number used in errors.
    pub fn parse_line(&mut self, line: usize, text: &str) -> Result<(), ParseError> {
        let mut tokens = Tokens {
            iter: text.split_whitespace(),
            line,
        };

        let Some(record) = tokens.iter.next() else {
            return Ok(());
        };

        match record {
            "v" => {
                let p = tokens.vec3("position")?;
                self.positions.push(p);
            }
            "vt" => {
                let u = tokens.float("texture coordinate u")?;
                let v = tokens.float("texture coordinate v")?;
                self.tex_coords.push(Vec2::new(u, 1.0 - v));
            }
            "vn" => {
                let n = tokens.vec3("normal")?;
                self.normals.push(n);
            }
            "f" => self.parse_face(line, &mut tokens)?,
            other if other.starts_with('#') => {}
            other => tracing::debug!("line {}: skipping {:?} record", line, other),
        }

        Ok(())
    }

    fn parse_face(&mut self, line: usize, tokens: &mut Tokens<'_>) -> Result<(), ParseError> {
        // Empty components (`1//1`) stay in the stream and fail as missing indices
        let mut components = tokens.iter.by_ref().flat_map(|t| t.split('/')).peekable();

        let mut corners = [0u32; 4];
        for corner in corners.iter_mut().take(3) {
            *corner = self.resolve(line, &mut components)?;
        }

        if components.peek().is_none() {
            self.builder.push_face([corners[0], corners[1], corners[2]]);
            return Ok(());
        }

        corners[3] = self.resolve(line, &mut components)?;
        for split in QUAD_SPLIT {
            self.builder.push_face(split.map(|i| corners[i]));
        }

        let ignored = components.count();
        if ignored > 0 {
            tracing::warn!(
                "line {}: ignoring {} index components beyond the fourth face vertex",
                line,
                ignored
            );
        }

        Ok(())
    }

    /// Resolve the next `p t n` triple to an output vertex index
    fn resolve<'a>(
        &mut self,
        line: usize,
        components: &mut impl Iterator<Item = &'a str>,
    ) -> Result<u32, ParseError> {
        let key = VertexKey {
            position: attribute_index(
                line,
                components.next(),
                Attribute::Position,
                self.positions.len(),
            )?,
            tex_coord: attribute_index(
                line,
                components.next(),
                Attribute::TexCoord,
                self.tex_coords.len(),
            )?,
            normal: attribute_index(
                line,
                components.next(),
                Attribute::Normal,
                self.normals.len(),
            )?,
        };

        let vertex = Vertex::new(
            self.positions[key.position],
            self.tex_coords[key.tex_coord],
            self.normals[key.normal],
        );

        Ok(self.builder.push(key, vertex))
    }

    pub fn finish(self) -> Mesh {
        self.builder.finish()
    }
}

/// Convert a 1-based OBJ index into a checked array index
fn attribute_index(
    line: usize,
    raw: Option<&str>,
    attribute: Attribute,
    len: usize,
) -> Result<usize, ParseError> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => {
            return Err(ParseError::malformed(
                line,
                format!("face vertex is missing its {attribute} index"),
            ));
        }
    };

    let index: i64 = raw
        .parse()
        .map_err(|_| ParseError::malformed(line, format!("invalid {attribute} index {raw:?}")))?;

    usize::try_from(index)
        .ok()
        .filter(|&i| i >= 1 && i <= len)
        .map(|i| i - 1)
        .ok_or(ParseError::IndexOutOfRange {
            line,
            attribute,
            index,
            len,
        })
}

/// Whitespace tokens of one line, with errors tagged by line number
struct Tokens<'a> {
    iter: SplitWhitespace<'a>,
    line: usize,
}

impl<'a> Tokens<'a> {
    fn next(&mut self, what: &str) -> Result<&'a str, ParseError> {
        self.iter
            .next()
            .ok_or_else(|| ParseError::malformed(self.line, format!("missing {what}")))
    }

    fn float(&mut self, what: &str) -> Result<f32, ParseError> {
        let token = self.next(what)?;
        token
            .parse()
            .map_err(|_| ParseError::malformed(self.line, format!("invalid {what} {token:?}")))
    }

    fn vec3(&mut self, what: &str) -> Result<Vec3, ParseError> {
        Ok(Vec3::new(
            self.float(&format!("{what} x"))?,
            self.float(&format!("{what} y"))?,
            self.float(&format!("{what} z"))?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cooked_mesh::Face;

    const TRIANGLE_ATTRIBUTES: &str = "\
v 1 0 0
v -1 0 0
v 0 2 0
vt 0 0
vt 1 0
vt 0.3 0.25
vn 0 0 1
";

    fn parse(src: &str) -> Result<Mesh, ParseError> {
        parse_obj(src.as_bytes())
    }

    #[test]
    fn test_single_triangle() {
        let src = format!("{TRIANGLE_ATTRIBUTES}f 1/1/1 2/2/1 3/3/1\n");
        let mesh = parse(&src).unwrap();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(mesh.faces(), &[Face::new(0, 1, 2)]);
        assert_eq!(mesh.vertices()[0].position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.vertices()[0].normal, Vec3::Z);
    }

    #[test]
    fn test_uv_v_is_flipped() {
        let src = format!("{TRIANGLE_ATTRIBUTES}f 1/3/1 2/2/1 3/1/1\n");
        let mesh = parse(&src).unwrap();

        assert_eq!(mesh.vertices()[0].uv, Vec2::new(0.3, 0.75));
        assert_eq!(mesh.vertices()[2].uv, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_quad_splits_into_fan() {
        let src = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vn 0 0 1
f 1/1/1 2/1/1 3/1/1 4/1/1
";
        let mesh = parse(src).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.faces(), &[Face::new(0, 1, 2), Face::new(0, 2, 3)]);
        assert_eq!(mesh.index_count(), 6);
    }

    #[test]
    fn test_quad_split_order_follows_corners_not_indices() {
        let src = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vn 0 0 1
f 1/1/1 2/1/1 3/1/1
f 4/1/1 3/1/1 2/1/1 1/1/1
";
        let mesh = parse(src).unwrap();

        // a=3 b=2 c=1 d=0 -> (a,b,c), (a,c,d)
        assert_eq!(
            mesh.faces(),
            &[Face::new(0, 1, 2), Face::new(3, 2, 1), Face::new(3, 1, 0)]
        );
    }

    #[test]
    fn test_shared_corners_deduplicate() {
        let src = format!("{TRIANGLE_ATTRIBUTES}f 1/1/1 2/2/1 3/3/1\nf 3/3/1 2/2/1 1/1/1\n");
        let mesh = parse(&src).unwrap();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.faces(), &[Face::new(0, 1, 2), Face::new(2, 1, 0)]);
    }

    #[test]
    fn test_one_component_difference_is_new_vertex() {
        let src = format!("{TRIANGLE_ATTRIBUTES}vn 0 1 0\nf 1/1/1 2/2/1 3/3/1\nf 1/1/2 2/2/1 3/3/1\n");
        let mesh = parse(&src).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.faces()[1], Face::new(3, 1, 2));
    }

    #[test]
    fn test_identical_values_declared_twice_stay_distinct() {
        let src = format!("{TRIANGLE_ATTRIBUTES}v 1 0 0\nf 1/1/1 2/2/1 3/3/1\nf 4/1/1 2/2/1 3/3/1\n");
        let mesh = parse(&src).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.vertices()[0], mesh.vertices()[3]);
    }

    #[test]
    fn test_indices_assigned_in_encounter_order() {
        let src = format!("{TRIANGLE_ATTRIBUTES}f 3/3/1 1/1/1 2/2/1\n");
        let mesh = parse(&src).unwrap();

        assert_eq!(mesh.faces(), &[Face::new(0, 1, 2)]);
        assert_eq!(mesh.vertices()[0].position, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_bounds_only_cover_referenced_positions() {
        let src = format!("{TRIANGLE_ATTRIBUTES}v 100 -100 50\nf 1/1/1 2/2/1 3/3/1\n");
        let mesh = parse(&src).unwrap();

        assert_eq!(mesh.bounds().max, Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(mesh.bounds().min, Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_no_faces_keeps_sentinel_bounds() {
        let mesh = parse(TRIANGLE_ATTRIBUTES).unwrap();

        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.index_count(), 0);
        assert!(mesh.bounds().is_empty());
    }

    #[test]
    fn test_unrecognized_records_are_skipped() {
        let src = format!(
            "# exported\nmtllib crate.mtl\no Crate\n{TRIANGLE_ATTRIBUTES}g side\nusemtl wood\ns off\n\n   \nf 1/1/1 2/2/1 3/3/1\n"
        );
        let mesh = parse(&src).unwrap();
        assert_eq!(mesh.index_count(), 3);
    }

    #[test]
    fn test_missing_uv_index_is_malformed() {
        let src = format!("{TRIANGLE_ATTRIBUTES}f 1//1 2//1 3//1\n");
        let err = parse(&src).unwrap_err();

        assert!(matches!(err, ParseError::MalformedInput { line: 8, .. }), "{err}");
    }

    #[test]
    fn test_space_delimited_components() {
        let slashed = parse(&format!("{TRIANGLE_ATTRIBUTES}f 1/1/1 2/2/1 3/3/1\n")).unwrap();
        for face in ["f 1 1 1 2 2 1 3 3 1", "f 1/1 1 2 2/1 3/3/1"] {
            let mesh = parse(&format!("{TRIANGLE_ATTRIBUTES}{face}\n")).unwrap();
            assert_eq!(mesh, slashed, "{face}");
        }
    }

    #[test]
    fn test_short_component_stream_is_malformed() {
        let src = format!("{TRIANGLE_ATTRIBUTES}f 1/1/1 2/2/1 3/3\n");
        assert!(matches!(
            parse(&src).unwrap_err(),
            ParseError::MalformedInput { line: 8, .. }
        ));
    }

    #[test]
    fn test_out_of_range_position() {
        let src = format!("{TRIANGLE_ATTRIBUTES}f 99/1/1 2/2/1 3/3/1\n");
        let err = parse(&src).unwrap_err();

        match err {
            ParseError::IndexOutOfRange {
                line,
                attribute,
                index,
                len,
            } => {
                assert_eq!(line, 8);
                assert_eq!(attribute, Attribute::Position);
                assert_eq!(index, 99);
                assert_eq!(len, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_and_negative_indices_out_of_range() {
        for face in ["f 0/1/1 2/2/1 3/3/1", "f -1/1/1 2/2/1 3/3/1", "f 1/1/-2 2/2/1 3/3/1"] {
            let src = format!("{TRIANGLE_ATTRIBUTES}{face}\n");
            assert!(
                matches!(parse(&src).unwrap_err(), ParseError::IndexOutOfRange { .. }),
                "{face}"
            );
        }
    }

    #[test]
    fn test_forward_reference_out_of_range() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf 1/1/1 2/1/1 3/1/1\nvn 0 0 1\n";
        let err = parse(src).unwrap_err();
        assert!(matches!(
            err,
            ParseError::IndexOutOfRange {
                attribute: Attribute::Normal,
                line: 5,
                ..
            }
        ));
    }

    #[test]
    fn test_bad_float_is_malformed() {
        let err = parse("v 1 abc 0\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedInput { line: 1, .. }));
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn test_missing_token_is_malformed() {
        for src in ["v 1 2\n", "vt 0.5\n", "vn\n"] {
            assert!(
                matches!(parse(src).unwrap_err(), ParseError::MalformedInput { .. }),
                "{src:?}"
            );
        }
    }

    #[test]
    fn test_short_face_is_malformed() {
        let src = format!("{TRIANGLE_ATTRIBUTES}f 1/1/1 2/2/1\n");
        assert!(matches!(
            parse(&src).unwrap_err(),
            ParseError::MalformedInput { line: 8, .. }
        ));
    }

    #[test]
    fn test_extra_face_refs_are_ignored() {
        let src = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vn 0 0 1
f 1/1/1 2/1/1 3/1/1 4/1/1 9/9/9
";
        let mesh = parse(src).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 4);
    }

    #[test]
    fn test_malformed_line_aborts_whole_parse() {
        let src = format!("{TRIANGLE_ATTRIBUTES}f 1/1/1 2/2/1 3/3/1\nv 1 2 x\nf 1/1/1 2/2/1 3/3/1\n");
        assert!(parse(&src).is_err());
    }

    #[test]
    fn test_index_invariants() {
        let src = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 1
vt 0 0
vt 1 1
vn 0 0 1
vn 0 1 0
f 1/1/1 2/1/1 3/2/1 4/2/1
f 1/1/2 2/1/2 5/2/2
f 5/2/2 4/2/1 3/2/1
";
        let mesh = parse(src).unwrap();
        assert_eq!(mesh.index_count(), 3 * mesh.triangle_count());
        assert!(mesh.indices().all(|i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn test_line_at_a_time() {
        let mut parser = ObjParser::new();
        for (i, line) in TRIANGLE_ATTRIBUTES.lines().enumerate() {
            parser.parse_line(i + 1, line).unwrap();
        }
        parser.parse_line(8, "f 1/1/1 2/2/1 3/3/1").unwrap();

        let mesh = parser.finish();
        assert_eq!(mesh.faces(), &[Face::new(0, 1, 2)]);
    }

    #[test]
    fn test_non_utf8_skipped_records() {
        let mut src = b"# W\xfcrfel\no W\xfcrfel\ng \xff\n".to_vec();
        src.extend_from_slice(TRIANGLE_ATTRIBUTES.as_bytes());
        src.extend_from_slice(b"f 1/1/1 2/2/1 3/3/1\n");

        let mesh = parse_obj(&src[..]).unwrap();
        assert_eq!(mesh.index_count(), 3);
    }

    #[test]
    fn test_non_utf8_record_is_malformed() {
        for bad in [&b"v 1 \xff 0\n"[..], &b"f 1/1/1 2/2/1 3/\xe9/1\n"[..]] {
            let mut src = TRIANGLE_ATTRIBUTES.as_bytes().to_vec();
            src.extend_from_slice(bad);

            let err = parse_obj(&src[..]).unwrap_err();
            assert!(matches!(err, ParseError::MalformedInput { line: 8, .. }), "{err}");
        }
    }

    #[test]
    fn test_nan_position_poisons_bounds() {
        let src = format!("{TRIANGLE_ATTRIBUTES}v nan 0 0\nf 4/1/1 2/2/1 3/3/1\n");
        let mesh = parse(&src).unwrap();

        assert!(mesh.bounds().max.x.is_nan());
        assert!(mesh.bounds().min.x.is_nan());
        assert_eq!(mesh.bounds().max.y, 2.0);
    }
}
