use crate::ir::{DataPoint, PointCloud, Selection};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("invalid point cloud document: {0}")]
    Syntax(String),
    #[error("line {line}: {message}")]
    Tsv { line: usize, message: String },
    #[error("{field} index {index} is out of range for {len} points")]
    IndexOutOfRange {
        field: &'static str,
        index: usize,
        len: usize,
    },
    #[error("point {index} ({label:?}) has a non-finite coordinate")]
    NonFinite { index: usize, label: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointCloudFile {
    #[serde(default)]
    points: Vec<DataPoint>,
    #[serde(default)]
    hover: Option<usize>,
    #[serde(default)]
    checked: Vec<usize>,
    #[serde(default)]
    query_result: Vec<usize>,
    #[serde(default)]
    neighbors: Vec<usize>,
}

/// Parses a point cloud from either a JSON/JSON5 document or a
/// tab-separated `x<TAB>y<TAB>label` listing.
pub fn parse_point_cloud(input: &str) -> Result<PointCloud, ParseError> {
    let cloud = if input.trim_start().starts_with('{') {
        parse_document(input)?
    } else {
        parse_tsv(input)?
    };
    validate(&cloud)?;
    Ok(cloud)
}

fn parse_document(input: &str) -> Result<PointCloud, ParseError> {
    let file: PointCloudFile =
        json5::from_str(input).map_err(|err| ParseError::Syntax(err.to_string()))?;
    Ok(PointCloud {
        points: file.points,
        selection: Selection {
            hover: file.hover,
            checked: file.checked,
            query_result: file.query_result,
            neighbors: file.neighbors,
        },
    })
}

fn parse_tsv(input: &str) -> Result<PointCloud, ParseError> {
    let mut cloud = PointCloud::new();
    let mut seen_row = false;
    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.splitn(3, '\t');
        let x = fields.next().unwrap_or("").trim();
        let y = fields.next().unwrap_or("").trim();
        let label = fields.next().unwrap_or("").trim();
        match (x.parse::<f32>(), y.parse::<f32>()) {
            (Ok(x), Ok(y)) => {
                cloud.push(x, y, label);
            }
            // A leading non-numeric row is a header.
            _ if !seen_row => {}
            _ => {
                return Err(ParseError::Tsv {
                    line: idx + 1,
                    message: format!("expected numeric x and y, got {x:?} and {y:?}"),
                });
            }
        }
        seen_row = true;
    }
    Ok(cloud)
}

fn validate(cloud: &PointCloud) -> Result<(), ParseError> {
    for (index, point) in cloud.points.iter().enumerate() {
        if !point.x.is_finite() || !point.y.is_finite() {
            return Err(ParseError::NonFinite {
                index,
                label: point.label.clone(),
            });
        }
    }

    let len = cloud.points.len();
    let selection = &cloud.selection;
    let groups: [(&'static str, &[usize]); 4] = [
        ("hover", selection.hover.as_slice()),
        ("checked", &selection.checked),
        ("queryResult", &selection.query_result),
        ("neighbors", &selection.neighbors),
    ];
    for (field, indices) in groups {
        if let Some(&index) = indices.iter().find(|&&index| index >= len) {
            return Err(ParseError::IndexOutOfRange { field, index, len });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_json_document() {
        let input = r#"{
            "points": [
                {"x": 0.0, "y": 1.0, "label": "cat"},
                {"x": 2.5, "y": -1.0, "label": "dog"},
                {"x": -1.0, "y": 0.0}
            ],
            "hover": 1,
            "checked": [0],
            "queryResult": [0, 2],
            "neighbors": [2]
        }"#;
        let cloud = parse_point_cloud(input).unwrap();
        assert_eq!(cloud.points.len(), 3);
        assert_eq!(cloud.points[1].label, "dog");
        assert_eq!(cloud.points[2].label, "");
        assert_eq!(cloud.selection.hover, Some(1));
        assert_eq!(cloud.selection.query_result, vec![0, 2]);
    }

    #[test]
    fn parse_json5_with_comments() {
        let input = "{\n  // two points\n  points: [{x: 1, y: 2, label: 'a'}, {x: 3, y: 4, label: 'b',},],\n}";
        let cloud = parse_point_cloud(input).unwrap();
        assert_eq!(cloud.points.len(), 2);
        assert!(cloud.selection.is_empty());
    }

    #[test]
    fn parse_tsv_with_header() {
        let input = "x\ty\tlabel\n0.5\t1.5\tapple\n# skipped\n\n2\t3\tbanana split\n";
        let cloud = parse_point_cloud(input).unwrap();
        assert_eq!(cloud.points.len(), 2);
        assert_eq!(cloud.points[0].x, 0.5);
        assert_eq!(cloud.points[1].label, "banana split");
    }

    #[test]
    fn tsv_reports_bad_rows() {
        let input = "1\t2\ta\nnope\t3\tb\n";
        let err = parse_point_cloud(input).unwrap_err();
        assert_eq!(
            err,
            ParseError::Tsv {
                line: 2,
                message: "expected numeric x and y, got \"nope\" and \"3\"".to_string()
            }
        );
    }

    #[test]
    fn rejects_out_of_range_selection() {
        let input = r#"{"points": [{"x": 0, "y": 0, "label": "a"}], "neighbors": [0, 4]}"#;
        let err = parse_point_cloud(input).unwrap_err();
        assert_eq!(
            err,
            ParseError::IndexOutOfRange {
                field: "neighbors",
                index: 4,
                len: 1
            }
        );
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        let input = "0\t0\tok\ninf\t1\tbad\n";
        assert!(matches!(
            parse_point_cloud(input),
            Err(ParseError::NonFinite { index: 1, .. })
        ));
    }

    #[test]
    fn syntax_errors_are_reported() {
        let err = parse_point_cloud("{ points: [ }").unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_)));
    }

    #[test]
    fn empty_input_is_an_empty_cloud() {
        let cloud = parse_point_cloud("").unwrap();
        assert!(cloud.is_empty());
    }
}
