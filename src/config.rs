#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Repair {
    Worklist,
    Rescan,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub max_variables: usize,
    pub repair: Repair,
    /// Seeds a shuffled visiting order for `Repair::Rescan`.
    pub shuffle: Option<u64>,
    /// A world raised past this rank is pinned to infinity instead.
    pub rank_limit: u32,
}

impl Config {
    pub const MAX_VARIABLES: usize = (usize::BITS - 1) as usize;
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_variables: 20,
            repair: Repair::Worklist,
            shuffle: None,
            rank_limit: 1024,
        }
    }
}
