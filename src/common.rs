/// Position of a team in its division, in input order.
pub type TeamIdx = usize;

/// Edge capacities and flow amounts. Signed, since a team that is already
/// out of reach yields a negative sink capacity.
pub type Capacity = i64;

/// Stands in for an unbounded edge. Far above any sum of game counts while
/// leaving headroom for additions without overflow.
pub const INFINITE: Capacity = Capacity::MAX / 4;
