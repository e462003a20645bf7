//! Horizontal alignment of the floating view.

/// Horizontal alignment policy for a floating view within its region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gravity {
    /// Keep the natural left position of the floating view.
    #[default]
    Start,
    /// Center the floating view in the available width.
    Center,
    /// Align the floating view to the right edge of the available width.
    End,
}

impl std::str::FromStr for Gravity {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "start" | "Start" | "left" | "Left" => Self::Start,
            "center" | "Center" | "center_horizontal" => Self::Center,
            "end" | "End" | "right" | "Right" => Self::End,
            _ => return Err(()),
        })
    }
}

impl Gravity {
    /// Parses the integer encoding used by layout declarations.
    ///
    /// `0` is `Start`, `1` is `Center` and `2` is `End`.
    pub const fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Gravity::Start),
            1 => Some(Gravity::Center),
            2 => Some(Gravity::End),
            _ => None,
        }
    }

    /// Returns the left position for a floating view of width `floating`.
    ///
    /// `natural_left` is where the view would be without any alignment, and
    /// `available` is the width of the region.
    ///
    /// The result is negative when the floating view is wider than the
    /// region and is not aligned to the start.
    pub const fn left(&self, natural_left: i32, available: i32, floating: i32) -> i32 {
        match *self {
            Gravity::Start => natural_left,
            Gravity::Center => (available - floating) / 2,
            Gravity::End => available - floating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Gravity;

    #[test]
    fn left_positions() {
        assert_eq!(Gravity::Start.left(3, 80, 20), 3);
        assert_eq!(Gravity::Center.left(3, 80, 20), 30);
        assert_eq!(Gravity::End.left(3, 80, 20), 60);

        // Odd leftovers round towards the start.
        assert_eq!(Gravity::Center.left(0, 81, 20), 30);
    }

    #[test]
    fn wider_than_region() {
        assert_eq!(Gravity::Start.left(0, 10, 14), 0);
        assert_eq!(Gravity::Center.left(0, 10, 14), -2);
        assert_eq!(Gravity::End.left(0, 10, 14), -4);
    }

    #[test]
    fn parse() {
        assert_eq!("left".parse::<Gravity>(), Ok(Gravity::Start));
        assert_eq!("center_horizontal".parse::<Gravity>(), Ok(Gravity::Center));
        assert_eq!("End".parse::<Gravity>(), Ok(Gravity::End));
        assert_eq!("middle".parse::<Gravity>(), Err(()));

        assert_eq!(Gravity::from_index(1), Some(Gravity::Center));
        assert_eq!(Gravity::from_index(3), None);
        assert_eq!(Gravity::default(), Gravity::Start);
    }
}
