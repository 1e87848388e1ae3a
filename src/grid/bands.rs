/// Converts a cell's average rating into an overlay color.
///
/// | Range        | Color     |
/// |--------------|-----------|
/// | >= 4.5       | `#00FF00` |
/// | [4.0, 4.5)   | `#7FFF00` |
/// | [3.5, 4.0)   | `#FFFF00` |
/// | [3.25, 3.5)  | `#FFD700` |
/// | [3.0, 3.25)  | `#FFA500` |
/// | [2.5, 3.0)   | `#FF8C00` |
/// | < 2.5        | `#FF0000` |
///
/// Bands are evaluated in descending order with inclusive lower bounds, so a
/// rating on an exact boundary resolves to the higher band.
pub fn color_for(avg_rating: f64) -> &'static str {
    match avg_rating {
        r if r >= 4.5 => "#00FF00",
        r if r >= 4.0 => "#7FFF00",
        r if r >= 3.5 => "#FFFF00",
        r if r >= 3.25 => "#FFD700",
        r if r >= 3.0 => "#FFA500",
        r if r >= 2.5 => "#FF8C00",
        _ => "#FF0000",
    }
}
