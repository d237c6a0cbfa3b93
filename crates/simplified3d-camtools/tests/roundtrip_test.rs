//! Emitted motion lines must read back to the coordinates that produced them.

use proptest::prelude::*;
use simplified3d_camtools::print_block::{
    BLOCK_EDGE_TEETH, BLOCK_HEIGHT, BLOCK_TOOTH_AMPLITUDE, BLOCK_WIDTH,
};
use simplified3d_camtools::print_zigzag::ZIGZAG_SEGMENTS;
use simplified3d_camtools::rotate::ROTATE_OFFSET_RADIUS;
use simplified3d_camtools::waveform::{generate_segment, WaveformKind};
use simplified3d_camtools::*;
use simplified3d_core::Point;
use simplified3d_parser::{get_x, get_y, get_z};

fn motion_lines(lines: &[String]) -> Vec<&String> {
    lines
        .iter()
        .filter(|l| l.starts_with("G1 X") || l.starts_with("G0 X"))
        .collect()
}

fn assert_close(line: &str, point: Point, z: f64) -> Result<(), TestCaseError> {
    prop_assert!((get_x(line) - point.x).abs() <= 1e-3, "{} vs {:?}", line, point);
    prop_assert!((get_y(line) - point.y).abs() <= 1e-3, "{} vs {:?}", line, point);
    prop_assert!((get_z(line) - z).abs() <= 1e-3, "{} vs z {}", line, z);
    Ok(())
}

fn assert_xy(line: &str, point: Point) -> Result<(), TestCaseError> {
    prop_assert!((get_x(line) - point.x).abs() <= 1e-3, "{} vs {:?}", line, point);
    prop_assert!((get_y(line) - point.y).abs() <= 1e-3, "{} vs {:?}", line, point);
    Ok(())
}

fn assert_three_decimals(lines: &[String]) -> Result<(), TestCaseError> {
    for line in lines.iter().filter(|l| !l.starts_with(';')) {
        for word in line.split_whitespace().skip(1) {
            if let Some((_, decimals)) = word.split_once('.') {
                prop_assert!(decimals.len() <= 3, "unrounded value in {}", line);
            }
        }
    }
    Ok(())
}

fn patterned_kind() -> impl Strategy<Value = WaveformKind> {
    prop_oneof![Just(WaveformKind::Sawtooth), Just(WaveformKind::Square)]
}

fn waveform_kind() -> impl Strategy<Value = WaveformKind> {
    prop_oneof![
        Just(WaveformKind::Default),
        Just(WaveformKind::Sawtooth),
        Just(WaveformKind::Square),
    ]
}

proptest! {
    #[test]
    fn prop_cylinder_roundtrip(
        x in -100.0f64..100.0,
        y in -100.0f64..100.0,
        z in 0.0f64..10.0,
        radius in 0.0f64..50.0,
        segments in 1usize..64,
        kind in waveform_kind(),
    ) {
        let generator = PrintCylinderGenerator::new(PrintCylinderParameters {
            x_center: x,
            y_center: y,
            z_value: z,
            radius,
            segments,
            feedrate: 1200.0,
            waveform: kind.name().to_string(),
        });
        let mut lines: Vec<String> = Vec::new();
        generator.generate(&mut lines).unwrap();

        let expected = generator.ring_points(kind);
        let moves = motion_lines(&lines);
        prop_assert_eq!(moves.len(), expected.len());
        for (line, point) in moves.iter().zip(expected) {
            assert_close(line, point, z)?;
        }
    }

    #[test]
    fn prop_layer0_roundtrip(
        x0 in -100.0f64..100.0,
        y0 in -100.0f64..100.0,
        x1 in -100.0f64..100.0,
        y1 in -100.0f64..100.0,
        z in 0.0f64..10.0,
        kind in waveform_kind(),
    ) {
        let mut lines: Vec<String> = Vec::new();
        PrintLayer0Generator::new(PrintLayer0Parameters {
            x_start: x0,
            y_start: y0,
            x_end: x1,
            y_end: y1,
            z_value: z,
            feedrate: 1000.0,
            waveform: kind.name().to_string(),
            amplitude: 0.5,
        })
        .generate(&mut lines)
        .unwrap();

        let line_kind = if kind == WaveformKind::Square { WaveformKind::Default } else { kind };
        let start = Point::new(x0, y0);
        let mut expected = vec![start];
        expected.extend(generate_segment(start, Point::new(x1, y1), line_kind, 0.5, print_layer0::LAYER0_TEETH));

        let moves = motion_lines(&lines);
        prop_assert_eq!(moves.len(), expected.len());
        for (line, point) in moves.iter().zip(expected) {
            assert_close(line, point, z)?;
        }
    }

    #[test]
    fn prop_waveform_segments_end_on_anchor(
        x0 in -100.0f64..100.0,
        y0 in -100.0f64..100.0,
        x1 in -100.0f64..100.0,
        y1 in -100.0f64..100.0,
        amplitude in -5.0f64..5.0,
        subdivisions in 0usize..40,
        kind in waveform_kind(),
    ) {
        let (start, end) = (Point::new(x0, y0), Point::new(x1, y1));
        let first = generate_segment(start, end, kind, amplitude, subdivisions);
        let second = generate_segment(start, end, kind, amplitude, subdivisions);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.last().copied(), Some(end));
    }

    #[test]
    fn prop_zigzag_roundtrip(
        x_start in -50.0f64..50.0,
        x_end in -50.0f64..50.0,
        y in -50.0f64..50.0,
        z in 0.0f64..10.0,
        passes in 0usize..6,
        row_spacing in 0.05f64..2.0,
        amplitude in 0.0f64..2.0,
        kind in waveform_kind(),
    ) {
        let generator = PrintZigZagGenerator::new(PrintZigZagParameters {
            x_start,
            x_end,
            y_value: y,
            z_value: z,
            passes,
            feedrate: 1000.0,
            waveform: kind.name().to_string(),
            row_spacing,
            amplitude,
        });
        let mut lines: Vec<String> = Vec::new();
        generator.generate(&mut lines).unwrap();

        let mut expected = Vec::new();
        for i in 0..passes {
            let (start, end) = generator.row(i);
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            expected.push(start);
            expected.extend(generate_segment(start, end, kind, amplitude * sign, ZIGZAG_SEGMENTS));
            if kind == WaveformKind::Sawtooth && i + 1 < passes {
                expected.extend(generate_segment(end, start, kind, -amplitude * sign, ZIGZAG_SEGMENTS));
            }
        }

        let moves = motion_lines(&lines);
        prop_assert_eq!(moves.len(), expected.len());
        for (line, point) in moves.iter().zip(expected) {
            assert_close(line, point, z)?;
        }
    }

    #[test]
    fn prop_block_outline_roundtrip(
        x in -100.0f64..100.0,
        y in -100.0f64..100.0,
        deposition in any::<bool>(),
        kind in patterned_kind(),
    ) {
        let mut lines: Vec<String> = Vec::new();
        PrintBlockGenerator::new(PrintBlockParameters {
            x_value: x,
            y_value: y,
            deposition,
            waveform: kind.name().to_string(),
            ..Default::default()
        })
        .generate(&mut lines, UltrasoundState::OFF)
        .unwrap();

        let center = Point::new(x, y);
        let (hw, hh) = (BLOCK_WIDTH / 2.0, BLOCK_HEIGHT / 2.0);
        let corners = [
            center.offset(-hw, -hh),
            center.offset(hw, -hh),
            center.offset(hw, hh),
            center.offset(-hw, hh),
        ];
        let (edge_kind, amplitude) = match kind {
            WaveformKind::Sawtooth => (WaveformKind::Sawtooth, BLOCK_TOOTH_AMPLITUDE),
            _ => (WaveformKind::Default, 0.0),
        };
        let mut expected = vec![corners[0]];
        for (i, sign) in [-1.0, 1.0, -1.0, 1.0].iter().enumerate() {
            expected.extend(generate_segment(
                corners[i],
                corners[(i + 1) % 4],
                edge_kind,
                amplitude * sign,
                BLOCK_EDGE_TEETH,
            ));
        }

        let moves = motion_lines(&lines);
        prop_assert_eq!(moves.len(), expected.len());
        for (line, point) in moves.iter().zip(expected) {
            assert_xy(line, point)?;
        }
    }

    #[test]
    fn prop_rotate_waypoint_roundtrip(
        x in -100.0f64..100.0,
        y in -100.0f64..100.0,
        z in 0.0f64..10.0,
        current in -360.0f64..360.0,
        by in -360.0f64..360.0,
    ) {
        let mut lines: Vec<String> = Vec::new();
        RotateGenerator::new(RotateParameters {
            current_angle: current,
            rotate_by: by,
            x_value: x,
            y_value: y,
            z_value: z,
            feedrate: 1200.0,
        })
        .generate(&mut lines)
        .unwrap();

        let theta = (current + by).to_radians();
        let expected = [
            Point::new(x, y),
            Point::new(
                x + ROTATE_OFFSET_RADIUS * theta.cos(),
                y + ROTATE_OFFSET_RADIUS * theta.sin(),
            ),
        ];
        let moves = motion_lines(&lines);
        prop_assert_eq!(moves.len(), expected.len());
        for (line, point) in moves.iter().zip(expected) {
            assert_close(line, point, z)?;
        }
    }

    #[test]
    fn prop_clean_sweep_roundtrip(
        x0 in -100.0f64..100.0,
        y0 in -100.0f64..100.0,
        x1 in -100.0f64..100.0,
        y1 in -100.0f64..100.0,
        z in 0.0f64..10.0,
        amplitude in 0.0f64..2.0,
        subdivisions in 0usize..20,
        with_tool in any::<bool>(),
        kind in waveform_kind(),
    ) {
        let params = CleanBlockParameters {
            x_value: x0,
            y_value: y0,
            z_value: z,
            ..Default::default()
        }
        .with_sweep(CleanSweep {
            x_end: x1,
            y_end: y1,
            feedrate: 1200.0,
            waveform: kind.name().to_string(),
            amplitude,
            subdivisions,
        });
        let generator = if with_tool {
            CleanBlockGenerator::new(params)
        } else {
            CleanBlockGenerator::without_tool(params)
        };
        let mut lines: Vec<String> = Vec::new();
        generator.generate(&mut lines).unwrap();

        let start = Point::new(x0, y0);
        let mut expected = vec![start];
        expected.extend(generate_segment(start, Point::new(x1, y1), kind, amplitude, subdivisions));

        let moves = motion_lines(&lines);
        prop_assert_eq!(moves.len(), expected.len());
        for (line, point) in moves.iter().zip(expected) {
            assert_close(line, point, z)?;
        }
    }

    #[test]
    fn prop_slicer_roundtrip(
        z_height in 0.0f64..2.0,
        layer_thickness in 0.05f64..0.5,
        x_min in -50.0f64..50.0,
        x_max in -50.0f64..50.0,
        y_min in -50.0f64..50.0,
        kind in waveform_kind(),
    ) {
        let mut lines: Vec<String> = Vec::new();
        let layers = SlicerGenerator::new(SlicerParameters {
            z_height,
            layer_thickness,
            x_min,
            x_max,
            y_min,
            waveform: kind.name().to_string(),
            ..Default::default()
        })
        .generate(&mut lines)
        .unwrap();
        prop_assert_eq!(layers, layer_count(z_height, layer_thickness));
        assert_three_decimals(&lines)?;

        let line_kind = if kind == WaveformKind::Square { WaveformKind::Default } else { kind };
        let start = Point::new(x_min, y_min);
        let end = Point::new(x_max, y_min);
        let per_layer = {
            let mut points = vec![start];
            points.extend(generate_segment(start, end, line_kind, 0.5, print_layer0::LAYER0_TEETH));
            points
        };

        let moves = motion_lines(&lines);
        prop_assert_eq!(moves.len(), layers * per_layer.len());
        for (layer, chunk) in moves.chunks(per_layer.len()).enumerate() {
            let z = (layer + 1) as f64 * layer_thickness;
            for (line, point) in chunk.iter().zip(&per_layer) {
                assert_close(line, *point, z)?;
            }
        }
    }
}
