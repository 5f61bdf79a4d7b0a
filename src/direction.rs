#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FlickDirection {
    Center = 0,
    North = 1,
    South = 2,
    West = 3,
    East = 4,
}

impl FlickDirection {
    pub const COUNT: usize = 5;

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::Center => Self::Center,
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }
}

/// Classify the net movement of a session as a tap or a four-way flick.
///
/// Both axis magnitudes below `threshold` is a tap (Center). The vertical
/// branch requires strict `|dy| > |dx|`, so an exact diagonal resolves
/// horizontal. Negative dy is North (toward the top edge of the domain).
pub fn classify(dx: i32, dy: i32, threshold: u16) -> FlickDirection {
    let adx = dx.unsigned_abs();
    let ady = dy.unsigned_abs();
    let threshold = threshold as u32;

    if adx < threshold && ady < threshold {
        FlickDirection::Center
    } else if ady > adx {
        if dy < 0 {
            FlickDirection::North
        } else {
            FlickDirection::South
        }
    } else if dx < 0 {
        FlickDirection::West
    } else {
        FlickDirection::East
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_motion_is_center() {
        assert_eq!(classify(0, 0, 50), FlickDirection::Center);
        assert_eq!(classify(49, -49, 50), FlickDirection::Center);
        assert_eq!(classify(-30, 10, 50), FlickDirection::Center);
    }

    #[test]
    fn dominant_axis_wins() {
        assert_eq!(classify(10, -200, 50), FlickDirection::North);
        assert_eq!(classify(-10, 200, 50), FlickDirection::South);
        assert_eq!(classify(-200, 10, 50), FlickDirection::West);
        assert_eq!(classify(200, -10, 50), FlickDirection::East);
    }

    #[test]
    fn one_axis_past_threshold_is_enough() {
        // Only dy clears the threshold; classification is still directional.
        assert_eq!(classify(5, 80, 50), FlickDirection::South);
        assert_eq!(classify(80, 5, 50), FlickDirection::East);
    }

    #[test]
    fn exact_diagonal_resolves_horizontal() {
        for d in [50_i32, 51, 400, 1024] {
            assert_eq!(classify(d, d, 50), FlickDirection::East);
            assert_eq!(classify(d, -d, 50), FlickDirection::East);
            assert_eq!(classify(-d, d, 50), FlickDirection::West);
            assert_eq!(classify(-d, -d, 50), FlickDirection::West);
        }
    }

    #[test]
    fn negation_flips_every_non_center_direction() {
        let samples = [
            (120, 3),
            (3, 120),
            (-77, 400),
            (400, -77),
            (90, 90),
            (-1024, 1),
            (1, -1024),
        ];
        for (dx, dy) in samples {
            let forward = classify(dx, dy, 50);
            let backward = classify(-dx, -dy, 50);
            assert_eq!(backward, forward.opposite(), "dx={dx} dy={dy}");
        }
    }

    #[test]
    fn zero_threshold_never_yields_center() {
        assert_ne!(classify(1, 0, 0), FlickDirection::Center);
        assert_ne!(classify(0, -1, 0), FlickDirection::Center);
    }
}
