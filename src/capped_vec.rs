mod cmp;
mod inner;
mod scratch;
mod vec;

#[cfg(test)]
mod tests;

pub use vec::CappedVec;
