//! An unknown waveform tag must produce the default output plus one warning.

use simplified3d_camtools::*;

/// Run `render` with an unknown and the default tag and compare the output
/// with the warning and waveform names removed.
fn assert_falls_back(render: impl Fn(&str, &mut Vec<String>)) {
    let mut unknown: Vec<String> = Vec::new();
    let mut default: Vec<String> = Vec::new();
    render("triangle", &mut unknown);
    render("default", &mut default);

    let warnings: Vec<&String> = unknown.iter().filter(|l| l.contains("Warning")).collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0],
        "; Warning: Unknown waveform 'triangle', using default path"
    );

    let without_warning: Vec<&String> = unknown.iter().filter(|l| !l.contains("Warning")).collect();
    assert_eq!(without_warning.len(), default.len());
    for (a, b) in without_warning.iter().zip(default.iter()) {
        assert_eq!(*a, b);
    }
}

#[test]
fn test_clean_block_fallback() {
    let sweep = |tag: &str| CleanSweep {
        x_end: 10.0,
        y_end: 0.0,
        feedrate: 800.0,
        waveform: tag.to_string(),
        amplitude: 0.5,
        subdivisions: 4,
    };
    assert_falls_back(|tag, out| {
        CleanBlockGenerator::new(CleanBlockParameters::default().with_sweep(sweep(tag)))
            .generate(out)
            .unwrap();
    });
    assert_falls_back(|tag, out| {
        CleanBlockGenerator::without_tool(CleanBlockParameters::default().with_sweep(sweep(tag)))
            .generate(out)
            .unwrap();
    });
}

#[test]
fn test_print_block_fallback() {
    assert_falls_back(|tag, out| {
        let params = PrintBlockParameters {
            waveform: tag.to_string(),
            ..Default::default()
        };
        PrintBlockGenerator::new(params)
            .generate(out, UltrasoundState::ON)
            .unwrap();
    });
}

#[test]
fn test_print_cylinder_fallback() {
    assert_falls_back(|tag, out| {
        let params = PrintCylinderParameters {
            waveform: tag.to_string(),
            ..Default::default()
        };
        PrintCylinderGenerator::new(params).generate(out).unwrap();
    });
}

#[test]
fn test_print_layer0_fallback() {
    assert_falls_back(|tag, out| {
        let params = PrintLayer0Parameters {
            waveform: tag.to_string(),
            ..Default::default()
        };
        PrintLayer0Generator::new(params).generate(out).unwrap();
    });
}

#[test]
fn test_print_zigzag_fallback() {
    assert_falls_back(|tag, out| {
        let params = PrintZigZagParameters {
            waveform: tag.to_string(),
            ..Default::default()
        };
        PrintZigZagGenerator::new(params).generate(out).unwrap();
    });
}

#[test]
fn test_rotate_axis_fallback() {
    assert_falls_back(|tag, out| {
        let params = RotateAxisParameters {
            waveform: tag.to_string(),
            ..Default::default()
        };
        RotateAxisGenerator::new(params).generate(out).unwrap();
    });
}

#[test]
fn test_slicer_fallback() {
    assert_falls_back(|tag, out| {
        let params = SlicerParameters {
            waveform: tag.to_string(),
            ..Default::default()
        };
        SlicerGenerator::new(params).generate(out).unwrap();
    });
}

#[test]
fn test_no_tool_clean_never_deposits() {
    for tag in ["default", "sawtooth", "square"] {
        let params = CleanBlockParameters::default().with_sweep(CleanSweep {
            x_end: 10.0,
            y_end: 5.0,
            feedrate: 800.0,
            waveform: tag.to_string(),
            amplitude: 0.5,
            subdivisions: 6,
        });
        let mut lines: Vec<String> = Vec::new();
        CleanBlockGenerator::without_tool(params).generate(&mut lines).unwrap();
        assert!(lines.iter().all(|l| !l.starts_with("G1")), "{}", tag);
        assert!(lines.iter().filter(|l| l.starts_with("G0")).count() > 1);
    }
}
