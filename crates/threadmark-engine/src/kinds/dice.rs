use rand::Rng;

/// A `##NdM##` dice expression: roll `count` dice with `max` sides each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dice {
    pub count: u32,
    pub max: u32,
}

impl Dice {
    /// Delimiter on both sides of the expression.
    pub const FENCE: &'static str = "##";
    /// Separator between count and sides.
    pub const SEPARATOR: char = 'd';
    /// Upper bound implied by the two-digit count.
    pub const MAX_COUNT: u32 = 99;
    /// Upper bound implied by the four-digit side count.
    pub const MAX_SIDES: u32 = 9999;

    /// Returns `None` for expressions that cannot be rolled (zero dice,
    /// zero sides, or values beyond the accepted digit counts).
    pub fn new(count: u32, max: u32) -> Option<Self> {
        if !(1..=Self::MAX_COUNT).contains(&count) || !(1..=Self::MAX_SIDES).contains(&max) {
            return None;
        }
        Some(Self { count, max })
    }

    /// Rolls `count` independent values, each uniform in `[1, max]`.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<u32> {
        (0..self.count).map(|_| rng.gen_range(1..=self.max)).collect()
    }
}
