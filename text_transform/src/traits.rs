//! Core traits for coordinate mapping layers.

/// Trait for coordinate transformation between two coordinate spaces.
///
/// # Invariants
///
/// Implementations must maintain these invariants:
///
/// 1. **Clamping**: If a coordinate is out of range, conversion clamps to the nearest valid
///    position rather than panicking.
///
/// 2. **Consistency**: For any coordinate `c` outside a transformed region, converting forward
///    then backward returns `c`. Inside a transformed region the backward conversion snaps to the
///    start of that region.
///
/// 3. **Ordering preservation**: If `a < b` in input space, then `to_coords(a) <= to_coords(b)`.
pub trait CoordinateTransform<From, To> {
    /// Convert from input coordinate to output coordinate.
    fn to_coords(&self, point: From) -> To;

    /// Convert from output coordinate back to input coordinate.
    ///
    /// If the output coordinate lands inside a transformed region, this snaps to the
    /// start of that region.
    fn from_coords(&self, point: To) -> From;
}
