/**
 * Place the onset offsets of a pattern on the host timeline.
 * The pattern starts on the first beat boundary at or after `anchor_ppq`.
 */
pub fn project(offsets: &[f64], anchor_ppq: f64, positions: &mut Vec<f64>) {
    let anchor = anchor_ppq.ceil();
    positions.clear();
    positions.extend(offsets.iter().map(|offset| anchor + offset));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_start_on_the_next_beat() {
        let mut positions = Vec::new();
        project(&[0.0, 0.25, 0.75], 3.2, &mut positions);
        assert_eq!(positions, vec![4.0, 4.25, 4.75]);
    }

    #[test]
    fn a_beat_boundary_anchors_to_itself() {
        let mut positions = Vec::new();
        project(&[0.0, 0.5], 2.0, &mut positions);
        assert_eq!(positions, vec![2.0, 2.5]);

        project(&[0.5], 0.0, &mut positions);
        assert_eq!(positions, vec![0.5]);
    }

    #[test]
    fn projection_replaces_previous_positions() {
        let mut positions = vec![1.0, 1.5, 1.75];
        project(&[0.2], 7.9, &mut positions);
        assert_eq!(positions.len(), 1);
        assert!((positions[0] - 8.2).abs() < 1e-12);
    }
}
