use proptest::prelude::*;

use eyetype::blink::BlinkDetector;
use eyetype::calibration::GazeCalibrator;
use eyetype::ear::EarCalculator;
use eyetype::geometry::Point;
use eyetype::grid::GazeGridSelector;
use eyetype::landmarks::EyeLandmarks;
use eyetype::morse::{lookup, MORSE_TABLE, UNKNOWN_SYMBOL};

fn eye_from_coords(coords: [f64; 12]) -> EyeLandmarks {
    let mut points = [Point::new(0.0, 0.0); 6];
    for (i, point) in points.iter_mut().enumerate() {
        *point = Point::new(coords[i * 2], coords[i * 2 + 1]);
    }
    EyeLandmarks { points }
}

proptest! {
    #[test]
    fn pt_ear_is_never_negative(coords in prop::array::uniform12(-100.0f64..100.0)) {
        let ear = EarCalculator::eye_ear(&eye_from_coords(coords));
        prop_assert!(ear >= 0.0);
        prop_assert!(ear.is_finite());
    }

    #[test]
    fn pt_degenerate_horizontal_reads_closed(
        x in -50.0f64..50.0,
        y in -50.0f64..50.0,
        vertical in 0.0f64..10.0,
    ) {
        // p1 == p4 leaves the denominator at zero; the EAR must fail
        // safe to "closed" instead of dividing.
        let eye = EyeLandmarks {
            points: [
                Point::new(x, y),
                Point::new(x + 1.0, y - vertical),
                Point::new(x + 2.0, y - vertical),
                Point::new(x, y),
                Point::new(x + 2.0, y + vertical),
                Point::new(x + 1.0, y + vertical),
            ],
        };
        prop_assert_eq!(EarCalculator::eye_ear(&eye), 0.0);
    }

    #[test]
    fn pt_undebounced_blinks_match_completed_closed_runs(
        pattern in prop::collection::vec(any::<bool>(), 1..200),
    ) {
        let mut detector = BlinkDetector::new(0.22, 1);
        let mut events = 0usize;
        for (i, &closed) in pattern.iter().enumerate() {
            let ear = if closed { 0.05 } else { 0.3 };
            if detector.update(ear, i as f64 * 33.0).is_some() {
                events += 1;
            }
        }

        // A closed run only completes when an open frame follows it.
        let mut completed_runs = 0usize;
        for window in pattern.windows(2) {
            if window[0] && !window[1] {
                completed_runs += 1;
            }
        }
        prop_assert_eq!(events, completed_runs);
    }

    #[test]
    fn pt_calibrated_mapping_stays_inside_frame(
        corners in prop::array::uniform8(0.0f64..1.0),
        raw_x in 0.0f64..1.0,
        raw_y in 0.0f64..1.0,
    ) {
        let mut cal = GazeCalibrator::new();
        for i in 0..4 {
            cal.capture(Point::new(corners[i * 2], corners[i * 2 + 1]));
        }
        let mapped = cal.rect().unwrap().map(Point::new(raw_x, raw_y), 900.0, 300.0);
        prop_assert!((0.0..=899.0).contains(&mapped.x));
        prop_assert!((0.0..=299.0).contains(&mapped.y));
    }

    #[test]
    fn pt_smoothed_gaze_stays_inside_sample_hull(
        samples in prop::collection::vec((0.0f64..900.0, 0.0f64..300.0), 1..20),
    ) {
        let mut selector = GazeGridSelector::new(3, 9, samples.len());
        for &(x, y) in &samples {
            selector.push_gaze(Point::new(x, y));
        }
        let smoothed = selector.smoothed().unwrap();
        let min_x = samples.iter().map(|s| s.0).fold(f64::INFINITY, f64::min);
        let max_x = samples.iter().map(|s| s.0).fold(f64::NEG_INFINITY, f64::max);
        let min_y = samples.iter().map(|s| s.1).fold(f64::INFINITY, f64::min);
        let max_y = samples.iter().map(|s| s.1).fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(smoothed.x >= min_x - 1e-9 && smoothed.x <= max_x + 1e-9);
        prop_assert!(smoothed.y >= min_y - 1e-9 && smoothed.y <= max_y + 1e-9);
    }

    #[test]
    fn pt_grid_cell_is_always_in_bounds(
        x in 0.0f64..900.0,
        y in 0.0f64..300.0,
    ) {
        let selector = GazeGridSelector::new(3, 9, 5);
        let cell = selector.cell_at(Point::new(x, y), 900.0, 300.0);
        prop_assert!(cell.row < 3);
        prop_assert!(cell.col < 9);
        // Any in-range linear index resolves to a letter; only the
        // spare 27th cell may come back empty.
        let index = cell.row * 9 + cell.col;
        prop_assert_eq!(selector.letter(cell).is_some(), index < 26);
    }

    #[test]
    fn pt_morse_lookup_is_total(sequence in "[.-]{0,8}") {
        let decoded = lookup(&sequence);
        match MORSE_TABLE.get(sequence.as_str()) {
            Some(&ch) => prop_assert_eq!(decoded, ch),
            None => prop_assert_eq!(decoded, UNKNOWN_SYMBOL),
        }
    }
}
