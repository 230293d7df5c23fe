#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Width(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Height(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct CellsCount(pub usize);

/// Side length, in cells, of the square chunks a grid is partitioned into.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct ChunkSize(pub usize);
