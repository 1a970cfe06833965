/// Points that can be folded into a running cluster mean.
///
/// `identity` is the empty accumulator for a cluster shaped like `self`;
/// folding every member into it with `absorb` yields the centroid.
pub trait Absorb: Clone {
    fn identity(&self) -> Self;
    fn absorb(self, other: &Self) -> Self;
}
