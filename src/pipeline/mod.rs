// End-to-end pipeline stages: tune (sweep candidate k) and fit (one k).
//
// Each stage takes the previous stage's output and returns a new value;
// nothing is mutated in place.

pub mod fit;
pub mod tune;
